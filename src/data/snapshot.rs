//! JSON file snapshots of analysis results

use super::{SnapshotStore, SnapshotSummary, StoreError};
use crate::analysis::AnalysisResult;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name prefix for per-sport snapshots
const SNAPSHOT_PREFIX: &str = "odds_";

/// Stores one `odds_<sport>.json` file per sport in a directory
///
/// Writes go to a temporary file that is renamed into place, so a concurrent
/// reader sees either the previous snapshot or the new one.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    dir: PathBuf,
}

impl JsonSnapshotStore {
    /// Create a store rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the snapshot file for a sport
    pub fn snapshot_path(&self, sport: &str) -> Result<PathBuf, StoreError> {
        validate_sport_key(sport)?;
        Ok(self.dir.join(format!("{SNAPSHOT_PREFIX}{sport}.json")))
    }

    /// Summaries of every readable snapshot in the directory, sorted by sport
    ///
    /// Unreadable or corrupt files are skipped with a warning.
    pub async fn summaries(&self) -> Result<Vec<SnapshotSummary>, StoreError> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let file_name = entry.file_name();
            let Some(sport) = file_name
                .to_str()
                .and_then(|name| name.strip_prefix(SNAPSHOT_PREFIX))
                .and_then(|name| name.strip_suffix(".json"))
            else {
                continue;
            };

            match self.load(sport).await {
                Ok(Some(result)) => summaries.push(SnapshotSummary {
                    sport: result.sport.clone(),
                    events: result.events.len(),
                    value_signals: result.value_signal_count(),
                    arbitrages: result.arbitrage_count(),
                    fetched_at: result.fetched_at,
                }),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(sport, error = %e, "Skipping unreadable snapshot");
                }
            }
        }

        summaries.sort_by(|a, b| a.sport.cmp(&b.sport));
        Ok(summaries)
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn load(&self, sport: &str) -> Result<Option<AnalysisResult>, StoreError> {
        let path = self.snapshot_path(sport)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let result: AnalysisResult = serde_json::from_slice(&bytes)?;
        Ok(Some(result))
    }

    async fn store(&self, result: &AnalysisResult) -> Result<(), StoreError> {
        let path = self.snapshot_path(&result.sport)?;
        let tmp_path = path.with_extension("json.tmp");

        tokio::fs::create_dir_all(&self.dir).await?;

        let bytes = serde_json::to_vec(result)?;
        tokio::fs::write(&tmp_path, &bytes).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!(
            sport = %result.sport,
            path = %path.display(),
            bytes = bytes.len(),
            "Wrote snapshot"
        );
        Ok(())
    }
}

/// Sport keys become file names; only allow `[A-Za-z0-9_-]`
fn validate_sport_key(sport: &str) -> Result<(), StoreError> {
    let valid = !sport.is_empty()
        && sport
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(sport.to_string()))
    }
}
