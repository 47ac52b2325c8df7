//! floorscan: size every folder at a given depth below a path.
//!
//! Thin binary entry point. All scanning logic lives in `floorscan-core`.

mod cli;

use clap::Parser;
use cli::CliArgs;
use floorscan_core::export::{export_to_file, render_table, ExportFormat};
use floorscan_core::model::format_count;
use floorscan_core::platform::default_signal;
use floorscan_core::scanner::{start_scan, ScanProgress};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Initialise structured logging. Results go to stdout, logs to stderr.
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config = args.to_config()?;
    tracing::info!("floorscan starting on {}", config.base_path.display());

    let handle = start_scan(config, default_signal())?;
    for message in handle.progress_rx.clone().iter() {
        match message {
            ScanProgress::Discovered { targets, batches } => {
                eprintln!(
                    "Found {} entries to measure in {} batches",
                    format_count(targets as u64),
                    batches
                );
            }
            ScanProgress::BatchStarted {
                index,
                total,
                size,
                workers,
            } => {
                eprintln!(
                    "Batch {}/{}: {} entries, {} workers",
                    index + 1,
                    total,
                    size,
                    workers
                );
            }
            ScanProgress::ItemResolved { path, size_bytes } => {
                eprintln!("  {} bytes  {}", format_count(size_bytes), path);
            }
            ScanProgress::Error { path, message } => {
                tracing::debug!("Skipped {}: {}", path, message);
            }
            ScanProgress::Complete { .. }
            | ScanProgress::Cancelled
            | ScanProgress::Failed { .. } => {}
        }
    }

    let report = handle.wait()?;

    if report.is_empty() {
        tracing::warn!(
            "No entries matched under {} with the given floor and filters",
            report.base_path.display()
        );
    } else {
        print!("{}", render_table(&report.entries));
    }

    if report.error_count() > 0 {
        tracing::warn!(
            "{} entries could not be read and were counted as 0 bytes",
            format_count(report.error_count() as u64)
        );
    }

    if let Some(path) = &args.output {
        export_to_file(path, ExportFormat::from_path(path), &report.entries)?;
    }

    tracing::info!(
        "Done: {} of {} entries shown, {:?}",
        report.entries.len(),
        report.targets_discovered,
        report.duration
    );
    Ok(())
}
