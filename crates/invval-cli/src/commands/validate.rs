//! Validate command - check a single invoice against the vendor store.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use invval_core::{InvoicePipeline, ProcessOutcome, ValidationResult};

use super::{load_config, load_store, read_input};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Invoice text file, or a JSON payload with --structured
    #[arg(required = true)]
    input: PathBuf,

    /// Vendor store (JSON array of vendor profiles)
    #[arg(long)]
    vendors: Option<PathBuf>,

    /// Treat the input as a structured JSON payload
    #[arg(long)]
    structured: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Exit with an error when the invoice is invalid
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// One CSV row per finding
    Csv,
    /// Plain text report
    Text,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let store = load_store(args.vendors.as_deref(), &config)?;

    let content = read_input(&args.input)?;
    info!("Validating {}", args.input.display());

    let pipeline = InvoicePipeline::new(store, &config);
    let outcome = if args.structured {
        pipeline.process_structured(&content)?
    } else {
        pipeline.process_text(&content)
    };

    let output = format_outcome(&outcome, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    let validation = &outcome.validation;
    if args.strict && !validation.is_valid() {
        anyhow::bail!(
            "Invoice failed validation with {} error(s)",
            validation.errors().len()
        );
    }

    Ok(())
}

pub fn format_outcome(outcome: &ProcessOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Csv => format_csv(&outcome.validation),
        OutputFormat::Text => Ok(format_text(outcome)),
    }
}

fn format_csv(result: &ValidationResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["severity", "kind", "field", "expected", "received", "message"])?;

    for error in result.errors() {
        wtr.write_record([
            "error",
            error.kind.as_str(),
            &error.field,
            &error.expected,
            &error.received,
            &error.message,
        ])?;
    }
    for warning in result.warnings() {
        wtr.write_record([
            "warning",
            warning.kind.as_str(),
            &warning.field,
            "",
            "",
            &warning.message,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(outcome: &ProcessOutcome) -> String {
    let invoice = &outcome.invoice;
    let result = &outcome.validation;
    let mut output = String::new();

    output.push_str(&format!("Vendor:  {}\n", invoice.vendor.name));
    output.push_str(&format!("Invoice: {}\n", invoice.invoice_details.number));
    match invoice.issue_date() {
        Some(date) => output.push_str(&format!("Date:    {}\n", date)),
        None => output.push_str(&format!("Date:    {}\n", invoice.invoice_details.date)),
    }
    output.push_str(&format!("Total:   {}\n", invoice.total));
    output.push('\n');

    if result.is_valid() {
        output.push_str(&format!("{} Valid\n", style("✓").green()));
    } else {
        output.push_str(&format!("{} Invalid\n", style("✗").red()));
    }

    for error in result.errors() {
        output.push_str(&format!(
            "  {} {}: {} (expected {}, received {})\n",
            style("error").red(),
            error.field,
            error.message,
            error.expected,
            error.received
        ));
    }
    for warning in result.warnings() {
        output.push_str(&format!(
            "  {} {}: {}\n",
            style("warning").yellow(),
            warning.field,
            warning.message
        ));
    }

    output
}
