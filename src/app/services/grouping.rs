//! Grouping of detail records by grouping key.
//!
//! Groups are kept in an insertion-ordered map so the distinct keys
//! enumerate in first-seen order, which is the order both partitioning
//! strategies rely on for determinism.

use crate::models::{DetailRecord, GroupKey};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use tracing::debug;

/// All detail records sharing one grouping key, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a> {
    pub key: GroupKey<'a>,
    /// Position of the key in first-seen order
    pub first_seen: usize,
    pub records: Vec<DetailRecord<'a>>,
}

impl Group<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of parsable amounts; `None` on decimal overflow
    pub fn checked_amount_total(&self) -> Option<Decimal> {
        self.records
            .iter()
            .filter_map(|record| record.amount)
            .try_fold(Decimal::ZERO, |total, amount| total.checked_add(amount))
    }
}

/// Detail records grouped by key, keys in first-seen order
#[derive(Debug, Clone, Default)]
pub struct GroupIndex<'a> {
    groups: IndexMap<GroupKey<'a>, Group<'a>>,
}

impl<'a> GroupIndex<'a> {
    /// Group records by key; every record lands in exactly one group
    pub fn build(records: Vec<DetailRecord<'a>>) -> Self {
        let mut groups: IndexMap<GroupKey<'a>, Group<'a>> = IndexMap::new();

        for record in records {
            let key = record.key;
            let next_position = groups.len();
            groups
                .entry(key)
                .or_insert_with(|| Group {
                    key,
                    first_seen: next_position,
                    records: Vec::new(),
                })
                .records
                .push(record);
        }

        debug!("Grouped detail records into {} groups", groups.len());

        Self { groups }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &GroupKey<'a>) -> Option<&Group<'a>> {
        self.groups.get(key)
    }

    /// Group at a first-seen position
    pub fn group_at(&self, position: usize) -> Option<&Group<'a>> {
        self.groups.get_index(position).map(|(_, group)| group)
    }

    /// Groups in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &Group<'a>> {
        self.groups.values()
    }

    /// Record counts per group, in first-seen order
    pub fn sizes(&self) -> Vec<usize> {
        self.groups.values().map(Group::len).collect()
    }

    /// Total detail records across all groups
    pub fn total_records(&self) -> usize {
        self.groups.values().map(Group::len).sum()
    }
}
