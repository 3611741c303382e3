//! CLI application for invoice extraction and vendor validation.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, validate, vendors};

/// Invoice validation - extract invoice fields and check them against registered vendors
#[derive(Parser)]
#[command(name = "invval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract labeled fields from an invoice text file
    Extract(extract::ExtractArgs),

    /// Validate a single invoice against the vendor store
    Validate(validate::ValidateArgs),

    /// Validate multiple invoice files
    Batch(batch::BatchArgs),

    /// Inspect the vendor store
    Vendors(vendors::VendorsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Validate(args) => validate::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Vendors(args) => vendors::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
