//! Odds cache module
//!
//! In-memory per-sport result store plus the adaptive TTL policy

mod freshness;
mod store;

pub use freshness::{ttl_for, FreshnessPolicy};
pub use store::OddsCache;
