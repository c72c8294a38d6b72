//! End-to-end split of one in-memory extract
//!
//! Parse, group, partition and assemble, with no filesystem access. The
//! processor layer wraps this with reading, archiving and atomic writes.

use crate::app::services::grouping::GroupIndex;
use crate::app::services::output_assembler::{OutputAssembler, OutputNaming};
use crate::app::services::partitioning::strategy_for;
use crate::app::services::record_parser::RecordParser;
use crate::config::SplitConfig;
use crate::error::Result;
use crate::models::SplitOutput;
use tracing::{debug, info};

/// Split the text of an extract file
///
/// `source_name` is the input file name; output names are derived from it.
pub fn split_text(text: &str, source_name: &str, config: &SplitConfig) -> Result<SplitOutput> {
    split_lines(text.lines(), source_name, config)
}

/// Split an extract given as lines
pub fn split_lines<'a, I>(lines: I, source_name: &str, config: &SplitConfig) -> Result<SplitOutput>
where
    I: IntoIterator<Item = &'a str>,
{
    config.validate()?;

    let parsed = RecordParser::new(&config.layout).parse(lines, source_name)?;
    let stats = parsed.stats;
    let groups = GroupIndex::build(parsed.details);
    let sizes = groups.sizes();
    debug!(
        "{}: {} detail records in {} groups",
        source_name,
        groups.total_records(),
        groups.len()
    );

    let strategy = strategy_for(config.mode);
    let partitions = strategy.partition(&sizes)?;

    let naming = OutputNaming::from_file_name(source_name);
    let files = OutputAssembler::new(&config.layout, &naming).assemble(
        &parsed.header,
        &groups,
        &partitions,
    )?;

    info!(
        "{}: {} records, {} groups -> {} files ({})",
        source_name,
        stats.detail_records,
        groups.len(),
        files.len(),
        strategy.name()
    );

    Ok(SplitOutput {
        files,
        stats,
        group_count: groups.len(),
        strategy: strategy.name(),
    })
}
