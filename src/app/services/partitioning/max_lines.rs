//! Greedy batching bounded by a maximum line count

use super::PartitionStrategy;
use crate::error::Result;
use crate::models::Partition;
use tracing::debug;

/// Walks groups in first-seen order, starting a new partition whenever the
/// next group would push the current one over `max_lines`
///
/// A group larger than `max_lines` is never split; it ends up alone in an
/// oversized partition. The number of partitions depends on the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLinesStrategy {
    max_lines: usize,
}

impl MaxLinesStrategy {
    pub fn new(max_lines: usize) -> Self {
        Self { max_lines }
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }
}

impl PartitionStrategy for MaxLinesStrategy {
    fn name(&self) -> &'static str {
        "max-lines"
    }

    fn partition(&self, group_sizes: &[usize]) -> Result<Vec<Partition>> {
        let mut partitions = Vec::new();
        let mut current = Partition::default();

        for (group, &size) in group_sizes.iter().enumerate() {
            if current.line_count + size > self.max_lines && !current.is_empty() {
                partitions.push(std::mem::take(&mut current));
            }

            if size > self.max_lines {
                debug!(
                    "Group {} has {} lines, above the {} line limit; kept whole",
                    group, size, self.max_lines
                );
            }

            current.push(group, size);
        }

        if !current.is_empty() {
            partitions.push(current);
        }

        debug!(
            "max-lines({}): {} groups into {} partitions",
            self.max_lines,
            group_sizes.len(),
            partitions.len()
        );

        Ok(partitions)
    }
}
