//! Load-balanced batching into an exact number of partitions

use super::PartitionStrategy;
use crate::error::{Result, SplitError};
use crate::models::Partition;
use tracing::debug;

/// Produces exactly `count` partitions balanced by line count
///
/// Groups are taken largest first (ties in first-seen order) and each is
/// placed on the partition with the fewest lines so far (ties to the lowest
/// index). This greedy rule is not an optimal bin packing, but downstream
/// reconciliation depends on the exact assignment it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactCountStrategy {
    count: usize,
}

impl ExactCountStrategy {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl PartitionStrategy for ExactCountStrategy {
    fn name(&self) -> &'static str {
        "exact-count"
    }

    /// Fails with [`SplitError::TooManyPartitions`] when `count` exceeds the
    /// number of groups. An input without groups yields no partitions.
    fn partition(&self, group_sizes: &[usize]) -> Result<Vec<Partition>> {
        if group_sizes.is_empty() {
            debug!("exact-count({}): no groups, nothing to partition", self.count);
            return Ok(Vec::new());
        }

        if self.count > group_sizes.len() {
            return Err(SplitError::TooManyPartitions {
                requested: self.count,
                groups: group_sizes.len(),
            });
        }

        // Stable sort keeps first-seen order among equal sizes
        let mut order: Vec<usize> = (0..group_sizes.len()).collect();
        order.sort_by(|&a, &b| group_sizes[b].cmp(&group_sizes[a]));

        let mut partitions = vec![Partition::default(); self.count];
        for group in order {
            let target = least_loaded(&partitions);
            partitions[target].push(group, group_sizes[group]);
        }

        debug!(
            "exact-count({}): partition sizes {:?}",
            self.count,
            partitions.iter().map(|p| p.line_count).collect::<Vec<_>>()
        );

        Ok(partitions)
    }
}

/// Index of the partition with the fewest lines, lowest index on ties
fn least_loaded(partitions: &[Partition]) -> usize {
    partitions
        .iter()
        .enumerate()
        .min_by_key(|(_, partition)| partition.line_count)
        .map(|(index, _)| index)
        .unwrap_or(0)
}
