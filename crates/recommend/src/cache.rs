//! Derived-data cache
//!
//! Process-lifetime memoization of the three expensive derived artifacts:
//! reading lists and preference scores keyed by member id, peer sets keyed
//! by (member id, k). The cache is owned by the engine instance — never
//! process-global — and is shared across request workers. Population is
//! first-writer-wins; recomputing an entry under a concurrent cold start is
//! wasteful but idempotent, so no entry-level locking is needed.
//!
//! Entries have no TTL and no invalidation on underlying data change:
//! staleness within a process lifetime is an accepted tradeoff, with
//! [`EngineCache::clear`] as the only reset.

use crate::types::{PreferenceScores, ReadingLists};
use dashmap::DashMap;
use std::sync::Arc;

/// Shared memoization for derived per-member artifacts
#[derive(Default)]
pub struct EngineCache {
    reading_lists: DashMap<i64, Arc<ReadingLists>>,
    preferences: DashMap<i64, Arc<PreferenceScores>>,
    peers: DashMap<(i64, usize), Arc<Vec<i64>>>,
}

impl EngineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reading_lists(&self, member_id: i64) -> Option<Arc<ReadingLists>> {
        self.reading_lists.get(&member_id).map(|e| e.value().clone())
    }

    pub fn store_reading_lists(&self, member_id: i64, lists: Arc<ReadingLists>) {
        self.reading_lists.insert(member_id, lists);
    }

    pub fn preferences(&self, member_id: i64) -> Option<Arc<PreferenceScores>> {
        self.preferences.get(&member_id).map(|e| e.value().clone())
    }

    pub fn store_preferences(&self, member_id: i64, scores: Arc<PreferenceScores>) {
        self.preferences.insert(member_id, scores);
    }

    pub fn peers(&self, member_id: i64, k: usize) -> Option<Arc<Vec<i64>>> {
        self.peers.get(&(member_id, k)).map(|e| e.value().clone())
    }

    pub fn store_peers(&self, member_id: i64, k: usize, peers: Arc<Vec<i64>>) {
        self.peers.insert((member_id, k), peers);
    }

    /// Drop every cached entry
    pub fn clear(&self) {
        self.reading_lists.clear();
        self.preferences.clear();
        self.peers.clear();
    }

    /// Entry counts (reading lists, preferences, peer sets)
    pub fn stats(&self) -> (usize, usize, usize) {
        (
            self.reading_lists.len(),
            self.preferences.len(),
            self.peers.len(),
        )
    }
}
