//! Batch command - validate many invoice files against one vendor store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use invval_core::invoice::rules::normalize_date;
use invval_core::validation::InMemoryVendorStore;
use invval_core::{InvoicePipeline, ProcessOutcome};

use super::{load_config, load_store};

type SharedPipeline = Arc<InvoicePipeline<Arc<InMemoryVendorStore>>>;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching invoice files
    #[arg(required = true)]
    input: String,

    /// Vendor store (JSON array of vendor profiles)
    #[arg(long)]
    vendors: Option<PathBuf>,

    /// Treat inputs as structured JSON payloads
    #[arg(long)]
    structured: bool,

    /// Write one JSON outcome per input into this directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write a summary CSV to this path
    #[arg(long)]
    summary_csv: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    outcome: Option<ProcessOutcome>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let store = Arc::new(load_store(args.vendors.as_deref(), &config)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline: SharedPipeline = Arc::new(InvoicePipeline::new(store, &config));
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let pipeline = Arc::clone(&pipeline);
        let permits = Arc::clone(&permits);
        let structured = args.structured;

        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let handle =
                tokio::task::spawn_blocking(move || process_file(path, &pipeline, structured));
            Ok::<FileResult, anyhow::Error>(handle.await?)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await??;
        pb.inc(1);

        if let Some(message) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                error!("Failed to process {}: {}", result.path.display(), message);
                pb.abandon();
                anyhow::bail!("Processing failed: {}", message);
            }
        }
        results.push(result);
    }

    pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(outcome) = &result.outcome {
                let output_path = output_dir.join(format!("{}.json", file_stem(&result.path)));
                fs::write(&output_path, serde_json::to_string_pretty(outcome)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if let Some(summary_path) = &args.summary_csv {
        write_summary(summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let processed: Vec<_> = results.iter().filter_map(|r| r.outcome.as_ref()).collect();
    let valid = processed.iter().filter(|o| o.validation.is_valid()).count();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} valid, {} invalid, {} failed",
        style(valid).green(),
        style(processed.len() - valid).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_file(path: PathBuf, pipeline: &SharedPipeline, structured: bool) -> FileResult {
    let file_start = Instant::now();

    let outcome = fs::read_to_string(&path)
        .map_err(anyhow::Error::from)
        .and_then(|content| {
            if structured {
                Ok(pipeline.process_structured(&content)?)
            } else {
                Ok(pipeline.process_text(&content))
            }
        });

    let processing_time_ms = file_start.elapsed().as_millis() as u64;
    match outcome {
        Ok(outcome) => FileResult {
            path,
            outcome: Some(outcome),
            error: None,
            processing_time_ms,
        },
        Err(e) => FileResult {
            path,
            outcome: None,
            error: Some(e.to_string()),
            processing_time_ms,
        },
    }
}

fn file_stem(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("invoice")
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "vendor",
        "invoice_number",
        "issue_date",
        "total",
        "is_valid",
        "errors",
        "warnings",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(outcome) = &result.outcome {
            let invoice = &outcome.invoice;
            let validation = &outcome.validation;
            wtr.write_record([
                filename,
                "success",
                &invoice.vendor.name,
                &invoice.invoice_details.number,
                &normalize_date(&invoice.invoice_details.date).unwrap_or_default(),
                &invoice.total,
                &validation.is_valid().to_string(),
                &validation.errors().len().to_string(),
                &validation.warnings().len().to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
