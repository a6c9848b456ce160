//! Snapshot persistence module
//!
//! Optional durable copy of the latest analysis result per sport. The cache
//! is rebuilt from upstream when snapshots are lost, so every failure here is
//! recoverable.

mod snapshot;

pub use snapshot::JsonSnapshotStore;

use crate::analysis::AnalysisResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Snapshot persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot encoding failed: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid sport key for snapshot: {0:?}")]
    InvalidKey(String),
}

/// Overview of one stored snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotSummary {
    pub sport: String,
    pub events: usize,
    pub value_signals: usize,
    pub arbitrages: usize,
    pub fetched_at: DateTime<Utc>,
}

/// Trait for analysis result persistence backends
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the stored result for a sport, `None` if nothing is stored
    async fn load(&self, sport: &str) -> Result<Option<AnalysisResult>, StoreError>;
    /// Persist a result under its sport key, replacing any previous one
    async fn store(&self, result: &AnalysisResult) -> Result<(), StoreError>;
}
