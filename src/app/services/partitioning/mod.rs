//! Partitioning strategies assigning whole groups to output files
//!
//! Both strategies see only the group sizes in first-seen order and return
//! partitions as lists of group positions, so a group can never be split.
//!
//! - [`max_lines`] - greedy sequential batching bounded by a line count
//! - [`exact_count`] - a fixed number of files, largest group first onto
//!   the least-loaded file

pub mod exact_count;
pub mod max_lines;

#[cfg(test)]
pub mod tests;

pub use exact_count::ExactCountStrategy;
pub use max_lines::MaxLinesStrategy;

use crate::config::SplitMode;
use crate::error::Result;
use crate::models::Partition;
use std::fmt::Debug;

/// Assigns whole groups to partitions
pub trait PartitionStrategy: Debug + Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Partition groups given their sizes in first-seen order
    ///
    /// Every group position appears in exactly one returned partition.
    fn partition(&self, group_sizes: &[usize]) -> Result<Vec<Partition>>;
}

/// Strategy implementing a split mode
pub fn strategy_for(mode: SplitMode) -> Box<dyn PartitionStrategy> {
    match mode {
        SplitMode::MaxLines(max_lines) => Box::new(MaxLinesStrategy::new(max_lines)),
        SplitMode::ExactCount(count) => Box::new(ExactCountStrategy::new(count)),
    }
}
