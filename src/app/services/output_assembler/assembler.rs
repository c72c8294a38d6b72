//! Serialization of partitions into output text

use super::naming::OutputNaming;
use crate::app::services::grouping::GroupIndex;
use crate::app::services::header_rebuilder::rebuild_header;
use crate::config::RecordLayout;
use crate::constants::LETTER_SUFFIX_LIMIT;
use crate::error::{Result, SplitError};
use crate::models::{HeaderRecord, OutputFile, Partition};
use rust_decimal::Decimal;
use tracing::debug;

/// Turns partitions into named output files with rebuilt headers
#[derive(Debug, Clone, Copy)]
pub struct OutputAssembler<'c> {
    layout: &'c RecordLayout,
    naming: &'c OutputNaming,
}

impl<'c> OutputAssembler<'c> {
    pub fn new(layout: &'c RecordLayout, naming: &'c OutputNaming) -> Self {
        Self { layout, naming }
    }

    /// Serialize every partition in index order
    pub fn assemble(
        &self,
        header: &HeaderRecord<'_>,
        groups: &GroupIndex<'_>,
        partitions: &[Partition],
    ) -> Result<Vec<OutputFile>> {
        if partitions.len() > LETTER_SUFFIX_LIMIT {
            debug!(
                "{} partitions exceed the letter suffixes, using numeric names",
                partitions.len()
            );
        }

        partitions
            .iter()
            .enumerate()
            .map(|(index, partition)| {
                self.assemble_partition(header, groups, partition, index, partitions.len())
            })
            .collect()
    }

    fn assemble_partition(
        &self,
        header: &HeaderRecord<'_>,
        groups: &GroupIndex<'_>,
        partition: &Partition,
        index: usize,
        total: usize,
    ) -> Result<OutputFile> {
        let mut detail_lines: Vec<&str> = Vec::with_capacity(partition.line_count);
        let mut control_sum = Decimal::ZERO;

        for &position in &partition.groups {
            let group = groups.group_at(position).ok_or_else(|| {
                SplitError::configuration(format!(
                    "Partition {} refers to unknown group {}",
                    index, position
                ))
            })?;

            for record in &group.records {
                if let Some(amount) = record.amount {
                    control_sum = control_sum
                        .checked_add(amount)
                        .ok_or(SplitError::ControlSumOverflow { partition: index })?;
                }
                detail_lines.push(record.line);
            }
        }

        let record_count = detail_lines.len();
        let header_line = rebuild_header(header, self.layout, record_count, control_sum);

        let mut contents = String::with_capacity(
            header_line.len() + detail_lines.iter().map(|line| line.len() + 1).sum::<usize>(),
        );
        contents.push_str(&header_line);
        for line in &detail_lines {
            contents.push('\n');
            contents.push_str(line);
        }

        let name = self.naming.partition_file_name(index, total);
        debug!(
            "{}: {} groups, {} records, control sum {}",
            name,
            partition.groups.len(),
            record_count,
            control_sum
        );

        Ok(OutputFile {
            name,
            contents,
            record_count,
            group_count: partition.groups.len(),
            control_sum,
        })
    }
}
