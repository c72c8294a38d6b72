//! Split command implementation
//!
//! Loads the layered configuration, discovers inputs, splits them
//! concurrently and prints a human or JSON report. A failing input is
//! reported and the remaining inputs still run.

use super::shared::{RunStats, create_progress_bar, setup_logging};
use crate::cli::args::{ReportFormat, SplitArgs};
use crate::error::{Result, SplitError};
use crate::processor::discovery::InputDiscovery;
use crate::processor::{FileReport, FileSplitter};

use anyhow::Context;
use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::HumanDuration;
use std::path::PathBuf;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Split command runner
///
/// After cancellation no new input is started; inputs already writing finish
/// before the run reports `Interrupted`.
pub async fn run_split(
    args: SplitArgs,
    cancellation_token: CancellationToken,
) -> anyhow::Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet);
    info!("Starting extract splitter");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config = args.load_config()?;
    let split_config = config.split_config()?;
    debug!("Loaded configuration: {:?}", config);
    info!("Split mode: {}", split_config.mode);

    let inputs = InputDiscovery::new().discover(&args.inputs)?;
    if inputs.is_empty() {
        return Err(SplitError::configuration("No input files found").into());
    }
    info!("Splitting {} input files", inputs.len());

    let splitter = FileSplitter::new(split_config, config.output.clone())
        .with_dry_run(args.dry_run)
        .with_cancellation(cancellation_token);
    let results = split_all(&splitter, &inputs, args.jobs(), args.show_progress()).await;

    let mut stats = RunStats::default();
    let mut reports = Vec::with_capacity(results.len());
    for (input, result) in results {
        match result {
            Ok(report) => {
                stats.files_processed += 1;
                stats.outputs_produced += report.outputs.len();
                stats.records_written += report.total_records();
                stats.warnings += report.stats.warning_count();
                reports.push(report);
            }
            Err(e) => {
                error!("Failed to split {}: {}", input.display(), e);
                if e.is_critical() {
                    return Err(e.into());
                }
                stats.record_failure(input, &e);
            }
        }
    }
    stats.processing_time = start_time.elapsed();

    match args.report {
        ReportFormat::Human => generate_human_report(&reports, &stats, args.dry_run),
        ReportFormat::Json => generate_json_report(&reports, &stats, args.dry_run)?,
    }

    Ok(stats)
}

/// Split every input with at most `jobs` running at once, results in input order
async fn split_all(
    splitter: &FileSplitter,
    inputs: &[PathBuf],
    jobs: usize,
    show_progress: bool,
) -> Vec<(PathBuf, Result<FileReport>)> {
    let progress = (show_progress && inputs.len() > 1)
        .then(|| create_progress_bar(inputs.len() as u64, "Splitting"));

    let results = stream::iter(inputs.iter().cloned())
        .map(|input| {
            let progress = progress.clone();
            async move {
                let result = splitter.process(&input).await;
                if let Some(pb) = &progress {
                    pb.inc(1);
                }
                (input, result)
            }
        })
        .buffered(jobs)
        .collect::<Vec<_>>()
        .await;

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    results
}

/// Generate human-readable report
fn generate_human_report(reports: &[FileReport], stats: &RunStats, dry_run: bool) {
    let verb = if dry_run { "Would write" } else { "Wrote" };

    for report in reports {
        println!(
            "\n{} {}",
            "Input:".bright_cyan(),
            report.input.display().to_string().bold()
        );
        println!(
            "   • {} detail records in {} groups ({})",
            report.stats.detail_records, report.group_count, report.strategy
        );

        for output in &report.outputs {
            println!(
                "   • {} {}: {} records, {} groups, control sum {}",
                verb,
                output.name.bright_white(),
                output.record_count,
                output.group_count,
                output.control_sum
            );
        }
        if report.outputs.is_empty() {
            println!("   • {}", "No detail records, nothing to split".yellow());
        }
        for path in &report.written {
            println!("   • {} {}", "Saved".bright_green(), path.display());
        }

        if report.stats.has_warnings() {
            println!(
                "   {} {} field warnings",
                "⚠".yellow(),
                report.stats.warning_count()
            );
            for warning in report.stats.warnings.iter().take(5) {
                println!("     - {}", warning);
            }
        }
    }

    println!("\n{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".dimmed());
    println!(
        "{} {} inputs, {} outputs, {} records in {}",
        (if dry_run { "Planned" } else { "Split" })
            .bright_green()
            .bold(),
        stats.files_processed,
        stats.outputs_produced,
        stats.records_written,
        HumanDuration(stats.processing_time)
    );

    if !stats.is_success() {
        println!(
            "{} {} inputs failed:",
            "✗".red().bold(),
            stats.files_failed()
        );
        for (input, message) in &stats.failures {
            println!("   • {}: {}", input.display(), message.red());
        }
    }
    println!();
}

/// Generate JSON report for machine consumption
fn generate_json_report(
    reports: &[FileReport],
    stats: &RunStats,
    dry_run: bool,
) -> anyhow::Result<()> {
    let json_report = serde_json::json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "dry_run": dry_run,
        "files_processed": stats.files_processed,
        "files_failed": stats.files_failed(),
        "outputs_produced": stats.outputs_produced,
        "records_written": stats.records_written,
        "field_warnings": stats.warnings,
        "processing_time_seconds": stats.processing_time.as_secs_f64(),
        "files": reports,
        "failures": stats.failures.iter().map(|(input, message)| {
            serde_json::json!({
                "input": input,
                "error": message,
            })
        }).collect::<Vec<_>>(),
    });

    let rendered =
        serde_json::to_string_pretty(&json_report).context("Failed to render JSON report")?;
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::record_parser::tests::compact_layout;
    use crate::config::{OutputFormat, OutputSettings, SplitConfig, SplitMode};
    use std::fs;
    use tempfile::TempDir;

    fn compact_splitter(directory: &std::path::Path, dry_run: bool) -> FileSplitter {
        let config = SplitConfig::new(SplitMode::MaxLines(2)).with_layout(compact_layout());
        let output = OutputSettings {
            format: OutputFormat::Zip,
            directory: Some(directory.to_path_buf()),
            force: false,
        };
        FileSplitter::new(config, output).with_dry_run(dry_run)
    }

    fn write_inputs(temp_dir: &TempDir) -> Vec<PathBuf> {
        let good = temp_dir.path().join("good.dat");
        fs::write(&good, "EXTRACT|H|0|0\nDETAIL|1|A|1.00\nDETAIL|2|B|2.00\nDETAIL|3|C|3.00").unwrap();
        let broken = temp_dir.path().join("broken.dat");
        fs::write(&broken, "DETAIL|1|A|1.00").unwrap();
        let other = temp_dir.path().join("other.dat");
        fs::write(&other, "EXTRACT|H|0|0\nDETAIL|1|A|5.00").unwrap();
        vec![good, broken, other]
    }

    #[tokio::test]
    async fn test_split_all_keeps_input_order_and_continues_after_failure() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = write_inputs(&temp_dir);
        let out_dir = temp_dir.path().join("out");

        let results = split_all(&compact_splitter(&out_dir, false), &inputs, 2, false).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, inputs[0]);
        assert_eq!(results[0].1.as_ref().unwrap().outputs.len(), 2);
        assert!(matches!(
            results[1].1,
            Err(SplitError::MissingHeader { .. })
        ));
        assert!(results[2].1.is_ok());
        assert!(out_dir.join("good_split.zip").exists());
        assert!(out_dir.join("other_split.zip").exists());
        assert!(!out_dir.join("broken_split.zip").exists());
    }

    #[tokio::test]
    async fn test_generate_reports() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = write_inputs(&temp_dir);
        let out_dir = temp_dir.path().join("out");

        let results = split_all(&compact_splitter(&out_dir, true), &inputs, 1, false).await;
        let mut stats = RunStats::default();
        let mut reports = Vec::new();
        for (input, result) in results {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => stats.record_failure(input, &e),
            }
        }

        // Should not panic
        generate_human_report(&reports, &stats, true);
        let result = generate_json_report(&reports, &stats, true);
        assert!(result.is_ok());
        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn test_split_all_after_cancellation_starts_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = write_inputs(&temp_dir);
        let out_dir = temp_dir.path().join("out");

        let token = CancellationToken::new();
        token.cancel();
        let splitter = compact_splitter(&out_dir, false).with_cancellation(token);
        let results = split_all(&splitter, &inputs, 2, false).await;

        assert_eq!(results.len(), 3);
        for (_, result) in &results {
            assert!(matches!(result, Err(SplitError::Interrupted { .. })));
        }
        assert!(!out_dir.exists());
    }
}
