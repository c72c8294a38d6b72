//! Inspect command implementation
//!
//! Parses and groups one extract without writing anything. Useful to check
//! field positions before a split, and to preview the outputs a split mode
//! would produce.

use super::shared::{RunStats, setup_logging};
use crate::app::services::grouping::GroupIndex;
use crate::app::services::header_rebuilder::format_control_sum;
use crate::app::services::output_assembler::{OutputAssembler, OutputNaming};
use crate::app::services::partitioning::strategy_for;
use crate::app::services::record_parser::RecordParser;
use crate::cli::args::{InspectArgs, ReportFormat};
use crate::config::{RecordLayout, SplitMode};
use crate::error::{Result, SplitError};
use crate::models::ParseStats;
use crate::processor::OutputSummary;

use anyhow::Context;
use colored::*;
use serde::Serialize;
use std::time::Instant;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// One group in the largest-groups listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub records: usize,
    pub amount_total: String,
}

/// Outputs a split mode would produce
#[derive(Debug, Clone, Serialize)]
pub struct SplitPlan {
    pub mode: String,
    pub strategy: &'static str,
    pub outputs: Vec<OutputSummary>,
    /// Set when the mode cannot be applied, e.g. more files than groups
    pub error: Option<String>,
}

/// Everything `inspect` reports about one file
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub source_name: String,
    pub delimiter: char,
    pub header_line_number: usize,
    pub header_fields: Vec<String>,
    pub stats: ParseStats,
    pub group_count: usize,
    pub missing_key_records: usize,
    pub largest_groups: Vec<GroupSummary>,
    pub plan: Option<SplitPlan>,
}

impl InspectReport {
    /// Header record as it appears in the input
    pub fn header_line(&self) -> String {
        self.header_fields.join(&self.delimiter.to_string())
    }
}

/// Inspect the text of an extract
///
/// Structural errors (no header, short header) fail as they would for a
/// split. A plan that cannot be built is reported in [`SplitPlan::error`].
pub fn inspect_text(
    text: &str,
    source_name: &str,
    layout: &RecordLayout,
    top: usize,
    mode: Option<SplitMode>,
) -> Result<InspectReport> {
    let parsed = RecordParser::new(layout).parse(text.lines(), source_name)?;
    let header_fields = parsed.header.fields.iter().map(|f| f.to_string()).collect();
    let groups = GroupIndex::build(parsed.details);

    let missing_key_records = groups
        .iter()
        .filter(|group| group.key.is_missing())
        .map(|group| group.len())
        .sum();

    // Stable sort keeps first-seen order among equal sizes
    let mut by_size: Vec<_> = groups.iter().collect();
    by_size.sort_by(|a, b| b.len().cmp(&a.len()));
    let largest_groups = by_size
        .into_iter()
        .take(top)
        .map(|group| GroupSummary {
            key: group.key.to_string(),
            records: group.len(),
            amount_total: group
                .checked_amount_total()
                .map(format_control_sum)
                .unwrap_or_else(|| "overflow".to_string()),
        })
        .collect();

    let plan = mode.map(|mode| {
        let strategy = strategy_for(mode);
        let naming = OutputNaming::from_file_name(source_name);
        let outputs = strategy.partition(&groups.sizes()).and_then(|partitions| {
            OutputAssembler::new(layout, &naming).assemble(&parsed.header, &groups, &partitions)
        });

        match outputs {
            Ok(files) => SplitPlan {
                mode: mode.to_string(),
                strategy: strategy.name(),
                outputs: files.iter().map(OutputSummary::from).collect(),
                error: None,
            },
            Err(e) => SplitPlan {
                mode: mode.to_string(),
                strategy: strategy.name(),
                outputs: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    });

    Ok(InspectReport {
        source_name: source_name.to_string(),
        delimiter: layout.delimiter,
        header_line_number: parsed.header.line_number,
        header_fields,
        stats: parsed.stats,
        group_count: groups.len(),
        missing_key_records,
        largest_groups,
        plan,
    })
}

/// Inspect command runner
///
/// The plan uses `--max-lines`/`--files` when given, else a split mode set in
/// the configuration file. With neither, no plan is shown.
pub async fn run_inspect(
    args: InspectArgs,
    cancellation_token: CancellationToken,
) -> anyhow::Result<RunStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), false);
    info!("Inspecting {}", args.input.display());

    args.validate()?;
    let config = args.load_config()?;
    debug!("Loaded configuration: {:?}", config);

    let text = tokio::fs::read_to_string(&args.input)
        .await
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let source_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let layout = config.layout.clone();
    let top = args.top;
    let mode = config.split.configured_mode()?;
    let inspection =
        task::spawn_blocking(move || inspect_text(&text, &source_name, &layout, top, mode));

    // Nothing is written, so the blocking task can simply be abandoned
    let report = tokio::select! {
        report = inspection => report.context("Inspection task failed")??,
        _ = cancellation_token.cancelled() => {
            return Err(SplitError::Interrupted {
                reason: "Processing interrupted by user".to_string(),
            }
            .into());
        }
    };

    match args.report {
        ReportFormat::Human => print_human_report(&report),
        ReportFormat::Json => {
            let rendered = serde_json::to_string_pretty(&report)
                .context("Failed to render JSON report")?;
            println!("{}", rendered);
        }
    }

    Ok(RunStats {
        files_processed: 1,
        outputs_produced: report.plan.as_ref().map_or(0, |plan| plan.outputs.len()),
        records_written: 0,
        warnings: report.stats.warning_count(),
        processing_time: start_time.elapsed(),
        ..Default::default()
    })
}

fn print_human_report(report: &InspectReport) {
    println!(
        "\n{} {}",
        "File:".bright_cyan(),
        report.source_name.bold()
    );
    println!(
        "{} line {}: {}",
        "Header:".bright_cyan(),
        report.header_line_number,
        report.header_line()
    );

    let stats = &report.stats;
    println!("{}", "Records:".bright_cyan());
    println!("   • Lines: {}", stats.total_lines);
    println!("   • Detail records: {}", stats.detail_records);
    println!("   • Ignored lines: {}", stats.ignored_lines);
    if stats.header_lines > 1 {
        println!(
            "   • {} header records, only the first is used",
            stats.header_lines.to_string().yellow()
        );
    }
    println!("   • Distinct groups: {}", report.group_count);
    if report.missing_key_records > 0 {
        println!(
            "   • Records without a grouping key: {}",
            report.missing_key_records.to_string().yellow()
        );
    }

    if !report.largest_groups.is_empty() {
        println!("{}", "Largest groups:".bright_cyan());
        for group in &report.largest_groups {
            println!(
                "   • {}: {} records, total {}",
                group.key.bright_white(),
                group.records,
                group.amount_total
            );
        }
    }

    if stats.has_warnings() {
        println!(
            "{} {} field warnings",
            "⚠".yellow(),
            stats.warning_count()
        );
        for warning in stats.warnings.iter().take(10) {
            println!("   - {}", warning);
        }
    }

    if let Some(plan) = &report.plan {
        println!("{} {} ({})", "Plan:".bright_cyan(), plan.mode, plan.strategy);
        match &plan.error {
            Some(message) => println!("   {} {}", "✗".red().bold(), message.red()),
            None => {
                for output in &plan.outputs {
                    println!(
                        "   • {}: {} records, {} groups, control sum {}",
                        output.name.bright_white(),
                        output.record_count,
                        output.group_count,
                        output.control_sum
                    );
                }
            }
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::record_parser::tests::compact_layout;
    use crate::error::SplitError;

    const INPUT: &str = "EXTRACT|H|0|0.0000\n\
                         DETAIL|1|K1|60.00\n\
                         DETAIL|2|K1|40.00\n\
                         DETAIL|3|K2|50.00\n\
                         DETAIL|4\n\
                         DETAIL|5|K3|25.00\n\
                         DETAIL|6|K3|50.00\n\
                         DETAIL|7|K3|1.00";

    #[test]
    fn test_inspect_counts_and_largest_groups() {
        let report = inspect_text(INPUT, "extract.dat", &compact_layout(), 2, None).unwrap();

        assert_eq!(report.header_fields, vec!["EXTRACT", "H", "0", "0.0000"]);
        assert_eq!(report.stats.detail_records, 7);
        assert_eq!(report.group_count, 4);
        assert_eq!(report.missing_key_records, 1);
        assert_eq!(
            report.largest_groups,
            vec![
                GroupSummary {
                    key: "K3".to_string(),
                    records: 3,
                    amount_total: "76.0000".to_string(),
                },
                GroupSummary {
                    key: "K1".to_string(),
                    records: 2,
                    amount_total: "100.0000".to_string(),
                },
            ]
        );
        assert!(report.plan.is_none());
    }

    #[test]
    fn test_inspect_with_plan() {
        let report = inspect_text(
            INPUT,
            "extract.dat",
            &compact_layout(),
            10,
            Some(SplitMode::ExactCount(2)),
        )
        .unwrap();

        let plan = report.plan.unwrap();
        assert_eq!(plan.strategy, "exact-count");
        assert!(plan.error.is_none());
        assert_eq!(plan.outputs.len(), 2);
        let records: usize = plan.outputs.iter().map(|o| o.record_count).sum();
        assert_eq!(records, 7);
    }

    #[test]
    fn test_impossible_plan_reported_not_fatal() {
        let report = inspect_text(
            INPUT,
            "extract.dat",
            &compact_layout(),
            10,
            Some(SplitMode::ExactCount(9)),
        )
        .unwrap();

        let plan = report.plan.unwrap();
        assert!(plan.outputs.is_empty());
        assert!(plan.error.unwrap().contains("Cannot create 9 partitions"));
    }

    #[test]
    fn test_missing_header_is_fatal() {
        let result = inspect_text("DETAIL|1|K1|1", "x.dat", &compact_layout(), 10, None);
        assert!(matches!(result, Err(SplitError::MissingHeader { .. })));
    }

    #[test]
    fn test_print_human_report() {
        let report = inspect_text(
            INPUT,
            "extract.dat",
            &compact_layout(),
            10,
            Some(SplitMode::MaxLines(3)),
        )
        .unwrap();

        // Should not panic
        print_human_report(&report);
    }

    #[test]
    fn test_header_line_uses_configured_delimiter() {
        let layout = compact_layout().with_delimiter(';');
        let input = "EXTRACT;H;0;0.0000\nDETAIL;1;K1;2.00";

        let report = inspect_text(input, "extract.dat", &layout, 10, None).unwrap();

        assert_eq!(report.header_fields, vec!["EXTRACT", "H", "0", "0.0000"]);
        assert_eq!(report.header_line(), "EXTRACT;H;0;0.0000");
    }
}
