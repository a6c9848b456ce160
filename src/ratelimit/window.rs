//! Fixed one-second hit buckets

use std::collections::BTreeMap;

/// Buckets older than `current - RETAINED_SECONDS` are pruned
const RETAINED_SECONDS: i64 = 2;

/// Hit counts for one identity, bucketed by epoch second
#[derive(Debug, Clone, Default)]
pub struct RateWindow {
    buckets: BTreeMap<i64, u32>,
}

impl RateWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit in `second` unless that bucket already holds `max_per_second`
    ///
    /// Stale buckets are pruned on every call, admitted or not.
    pub fn try_hit(&mut self, second: i64, max_per_second: u32) -> bool {
        self.prune(second);

        let hits = self.buckets.entry(second).or_insert(0);
        if *hits >= max_per_second {
            if *hits == 0 {
                self.buckets.remove(&second);
            }
            return false;
        }
        *hits += 1;
        true
    }

    /// Hits recorded in `second`
    pub fn hits(&self, second: i64) -> u32 {
        self.buckets.get(&second).copied().unwrap_or(0)
    }

    /// Drop buckets older than `second - 2`
    pub fn prune(&mut self, second: i64) {
        let cutoff = second - RETAINED_SECONDS;
        self.buckets = self.buckets.split_off(&cutoff);
    }

    /// Newest bucket with any hits
    pub fn latest_second(&self) -> Option<i64> {
        self.buckets.keys().next_back().copied()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
