//! Per-sport in-memory result cache

use crate::analysis::AnalysisResult;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Holds the last analysis result per sport
///
/// Results are shared as `Arc`s and replaced wholesale, so readers always see
/// either the previous or the new result in full. Entries are never evicted
/// by age; only [`OddsCache::remove`] and [`OddsCache::flush`] drop them.
#[derive(Debug, Default)]
pub struct OddsCache {
    entries: RwLock<HashMap<String, Arc<AnalysisResult>>>,
}

impl OddsCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Last stored result for a sport
    pub fn get(&self, sport: &str) -> Option<Arc<AnalysisResult>> {
        self.entries.read().get(sport).cloned()
    }

    /// Replace the stored result for a sport
    pub fn put(&self, sport: impl Into<String>, result: AnalysisResult) -> Arc<AnalysisResult> {
        let result = Arc::new(result);
        self.entries.write().insert(sport.into(), Arc::clone(&result));
        result
    }

    /// True iff a result exists and `now - fetched_at < ttl`
    pub fn is_fresh(&self, sport: &str, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.entries
            .read()
            .get(sport)
            .is_some_and(|result| now - result.fetched_at < ttl)
    }

    /// Drop one sport's entry
    pub fn remove(&self, sport: &str) -> Option<Arc<AnalysisResult>> {
        self.entries.write().remove(sport)
    }

    /// Drop every entry, returning how many were removed
    pub fn flush(&self) -> usize {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        count
    }

    /// Sports with a cached result, sorted
    pub fn sports(&self) -> Vec<String> {
        let mut sports: Vec<String> = self.entries.read().keys().cloned().collect();
        sports.sort();
        sports
    }
}
