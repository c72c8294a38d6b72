//! Tests for the partitioning strategies

use crate::models::Partition;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

mod max_lines_tests;

/// Group positions of each partition
pub fn group_lists(partitions: &[Partition]) -> Vec<Vec<usize>> {
    partitions.iter().map(|p| p.groups.clone()).collect()
}

/// Line count of each partition
pub fn line_counts(partitions: &[Partition]) -> Vec<usize> {
    partitions.iter().map(|p| p.line_count).collect()
}

/// Seeded random group sizes in `1..=max_size`
pub fn generated_sizes(seed: u64, groups: usize, max_size: usize) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..groups).map(|_| rng.gen_range(1..=max_size)).collect()
}
