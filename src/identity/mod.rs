//! Identity assignment for new anchor records
//!
//! Ids are issued by an explicit counter owned by whoever constructs records,
//! so independent sessions and tests never share state.

use crate::core::AnchorRecord;
use serde::{Deserialize, Serialize};

/// Something that produces values on demand
pub trait Factory<T> {
    /// Produce one element
    fn produce(&mut self) -> T;

    /// Produce `count` elements, in issuance order
    fn produce_many(&mut self, count: usize) -> Vec<T> {
        (0..count).map(|_| self.produce()).collect()
    }
}

/// Monotonic id counter. The first id issued is 1; 0 is never issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAssigner {
    last: u32,
}

impl IdAssigner {
    /// Counter whose first id is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter whose first id is `last + 1`
    pub fn starting_after(last: u32) -> Self {
        Self { last }
    }

    /// Counter continuing after the highest id among `records`
    pub fn seeded_from(records: &[AnchorRecord]) -> Self {
        let last = records.iter().map(AnchorRecord::id).max().unwrap_or(0);
        Self::starting_after(last)
    }

    /// The most recently issued id, or 0 if none has been issued
    pub fn last_issued(&self) -> u32 {
        self.last
    }
}

/// Where a session's id counter starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// Start at 1 on every process start; ids may collide with persisted ones
    ProcessScoped,
    /// Continue after the highest persisted id
    #[default]
    ContinueFromStore,
}

impl IdPolicy {
    /// Build the counter for this policy given the records already persisted
    pub fn assigner_for(self, persisted: &[AnchorRecord]) -> IdAssigner {
        match self {
            IdPolicy::ProcessScoped => IdAssigner::new(),
            IdPolicy::ContinueFromStore => IdAssigner::seeded_from(persisted),
        }
    }
}

impl Factory<u32> for IdAssigner {
    fn produce(&mut self) -> u32 {
        self.last += 1;
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one() {
        let mut ids = IdAssigner::new();
        assert_eq!(ids.last_issued(), 0);
        assert_eq!(ids.produce(), 1);
        assert_eq!(ids.last_issued(), 1);
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut ids = IdAssigner::new();
        let produced: Vec<u32> = (0..10).map(|_| ids.produce()).collect();
        assert_eq!(produced, (1..=10).collect::<Vec<u32>>());
    }

    #[test]
    fn test_produce_many_matches_sequential_produce() {
        let mut batch = IdAssigner::new();
        let mut single = IdAssigner::new();

        let many = batch.produce_many(5);
        let one_by_one: Vec<u32> = (0..5).map(|_| single.produce()).collect();

        assert_eq!(many, one_by_one);
        assert_eq!(batch.produce(), 6);
    }

    #[test]
    fn test_produce_many_zero() {
        let mut ids = IdAssigner::new();
        assert!(ids.produce_many(0).is_empty());
        assert_eq!(ids.produce(), 1);
    }

    #[test]
    fn test_independent_counters() {
        let mut a = IdAssigner::new();
        let mut b = IdAssigner::new();
        a.produce_many(3);
        assert_eq!(b.produce(), 1);
    }

    #[test]
    fn test_seeded_from_records() {
        let records = vec![
            AnchorRecord::with_id(4, "a", "a"),
            AnchorRecord::with_id(9, "b", "b"),
            AnchorRecord::with_id(2, "c", "c"),
        ];
        let mut ids = IdAssigner::seeded_from(&records);
        assert_eq!(ids.produce(), 10);

        let mut empty = IdAssigner::seeded_from(&[]);
        assert_eq!(empty.produce(), 1);
    }

    #[test]
    fn test_id_policy() {
        let records = vec![AnchorRecord::with_id(3, "a", "a")];
        assert_eq!(IdPolicy::ProcessScoped.assigner_for(&records).produce(), 1);
        assert_eq!(IdPolicy::ContinueFromStore.assigner_for(&records).produce(), 4);
        assert_eq!(IdPolicy::default(), IdPolicy::ContinueFromStore);
    }
}
