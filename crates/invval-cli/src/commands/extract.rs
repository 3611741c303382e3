//! Extract command - scan an invoice text file for labeled fields.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use invval_core::invoice::{quick_summary, KeyValuePair};
use invval_core::validation::InMemoryVendorStore;
use invval_core::{InvoicePipeline, InvoiceRecord, QuickSummary};

use super::{load_config, load_store, read_input};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Invoice text file, one line per text line
    #[arg(required = true)]
    input: PathBuf,

    /// Vendor store whose names anchor the company line (optional)
    #[arg(long)]
    vendors: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: ExtractFormat,

    /// Also run the quick headline scan
    #[arg(long)]
    summary: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ExtractFormat {
    /// JSON output
    Json,
    /// `key: value` lines
    Text,
}

#[derive(Serialize)]
struct ExtractOutput<'a> {
    pairs: &'a [KeyValuePair],
    invoice: &'a InvoiceRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a QuickSummary>,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let text = read_input(&args.input)?;
    info!("Extracting fields from {}", args.input.display());

    let store = if args.vendors.is_some() || config.vendors.store_path.is_some() {
        load_store(args.vendors.as_deref(), &config)?
    } else {
        InMemoryVendorStore::default()
    };

    let pipeline = InvoicePipeline::new(store, &config);
    let (pairs, invoice) = pipeline.extract_text(&text);
    let summary = args.summary.then(|| quick_summary(&text));

    match args.format {
        ExtractFormat::Json => {
            let output = ExtractOutput {
                pairs: &pairs,
                invoice: &invoice,
                summary: summary.as_ref(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        ExtractFormat::Text => {
            for pair in &pairs {
                println!("{}: {}", style(&pair.key).bold(), pair.value);
            }
            if let Some(summary) = &summary {
                println!();
                print_summary(summary);
            }
        }
    }

    let missing = invoice.missing_fields();
    if !missing.is_empty() {
        eprintln!(
            "{} Not found: {}",
            style("ℹ").blue(),
            missing.join(", ")
        );
    }

    debug!("Extraction took {:?}", start.elapsed());
    Ok(())
}

fn print_summary(summary: &QuickSummary) {
    let field = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

    println!("{}", style("Summary:").cyan());
    println!("  Invoice: {}", field(summary.invoice_number.clone()));
    println!("  Date:    {}", field(summary.date.clone()));
    println!("  Amount:  {}", field(summary.amount.map(|a| a.to_string())));
    println!("  Vendor:  {}", field(summary.vendor_name.clone()));
}
