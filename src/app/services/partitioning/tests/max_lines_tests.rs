//! Tests for greedy max-lines batching

use super::super::{MaxLinesStrategy, PartitionStrategy};
use super::{group_lists, line_counts};

#[test]
fn test_scenario_max_three_lines() {
    // K1 = 2 lines, K2 = 1 line, K3 = 2 lines
    let partitions = MaxLinesStrategy::new(3).partition(&[2, 1, 2]).unwrap();

    assert_eq!(group_lists(&partitions), vec![vec![0, 1], vec![2]]);
    assert_eq!(line_counts(&partitions), vec![3, 2]);
}

#[test]
fn test_exact_fit_does_not_start_new_partition() {
    let partitions = MaxLinesStrategy::new(4).partition(&[2, 2, 2, 2]).unwrap();

    assert_eq!(group_lists(&partitions), vec![vec![0, 1], vec![2, 3]]);
}

#[test]
fn test_oversized_group_sits_alone() {
    let partitions = MaxLinesStrategy::new(3).partition(&[1, 5, 1, 1]).unwrap();

    assert_eq!(group_lists(&partitions), vec![vec![0], vec![1], vec![2, 3]]);
    assert_eq!(line_counts(&partitions), vec![1, 5, 2]);
}

#[test]
fn test_oversized_first_group_does_not_leave_empty_partition() {
    let partitions = MaxLinesStrategy::new(2).partition(&[7, 1]).unwrap();

    assert_eq!(group_lists(&partitions), vec![vec![0], vec![1]]);
    assert!(partitions.iter().all(|p| !p.is_empty()));
}

#[test]
fn test_order_is_first_seen_not_size() {
    // A later small group never back-fills an earlier partition
    let partitions = MaxLinesStrategy::new(5).partition(&[3, 4, 1]).unwrap();

    assert_eq!(group_lists(&partitions), vec![vec![0], vec![1, 2]]);
}

#[test]
fn test_no_groups_no_partitions() {
    let partitions = MaxLinesStrategy::new(10).partition(&[]).unwrap();
    assert!(partitions.is_empty());
}

#[test]
fn test_everything_fits_in_one_partition() {
    let strategy = MaxLinesStrategy::new(810);
    let partitions = strategy.partition(&[10, 20, 30]).unwrap();

    assert_eq!(strategy.name(), "max-lines");
    assert_eq!(strategy.max_lines(), 810);
    assert_eq!(group_lists(&partitions), vec![vec![0, 1, 2]]);
}
