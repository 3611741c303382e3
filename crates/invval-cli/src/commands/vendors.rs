//! Vendors command - inspect the vendor store.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use invval_core::validation::{match_vendor, VendorMatch};
use invval_core::VendorProfile;

use super::{load_config, load_store};

/// Arguments for the vendors command.
#[derive(Args)]
pub struct VendorsArgs {
    /// Vendor store (JSON array of vendor profiles)
    #[arg(long, global = true)]
    vendors: Option<PathBuf>,

    #[command(subcommand)]
    command: VendorsCommand,
}

#[derive(Subcommand)]
enum VendorsCommand {
    /// List registered vendors
    List,

    /// Look up a vendor the way the validator matches invoice names
    Lookup {
        /// Vendor name as written on the invoice
        name: String,
    },
}

pub async fn run(args: VendorsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = load_store(args.vendors.as_deref(), &config)?;

    match args.command {
        VendorsCommand::List => {
            println!(
                "{:<12} {:<36} {:<10} {:>10} {:>9}",
                "ID", "NAME", "STATUS", "RATE", "VARIANCE"
            );
            for vendor in store.vendors() {
                print_row(vendor);
            }
            println!();
            println!("{} {} vendors", style("ℹ").blue(), store.len());
        }
        VendorsCommand::Lookup { name } => match match_vendor(&store, &name) {
            VendorMatch::Matched(vendor) => {
                println!("{}", serde_json::to_string_pretty(vendor)?);
            }
            VendorMatch::NotFound => {
                anyhow::bail!("Vendor not found in database: {}", name);
            }
        },
    }

    Ok(())
}

fn print_row(vendor: &VendorProfile) {
    let status = if vendor.is_active() {
        style("active").green()
    } else {
        style("inactive").yellow()
    };
    let rate = vendor
        .hourly_rate
        .map(|r| r.normalize().to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{:<12} {:<36} {:<10} {:>10} {:>8}%",
        vendor.id,
        vendor.name,
        status,
        rate,
        vendor.allowed_variance_percent().normalize()
    );
}
