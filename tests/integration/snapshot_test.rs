//! Integration tests for snapshot persistence

use crate::support::{derby, surebet};
use chrono::{TimeZone, Utc};
use odds_engine::analysis::{AnalysisResult, MarketAnalyzer};
use odds_engine::data::{JsonSnapshotStore, SnapshotStore, StoreError};

#[test]
fn test_summaries_list_every_sport() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSnapshotStore::new(dir.path());
    let fetched = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
    let analyzer = MarketAnalyzer::default();

    let summaries = tokio_test::block_on(async {
        store
            .store(&AnalysisResult::new("soccer_epl", analyzer.analyze(&[derby(), surebet()]), fetched))
            .await
            .unwrap();
        store
            .store(&AnalysisResult::new("basketball_nba", vec![], fetched))
            .await
            .unwrap();
        store.summaries().await.unwrap()
    });

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].sport, "basketball_nba");
    assert_eq!(summaries[0].events, 0);
    assert_eq!(summaries[1].sport, "soccer_epl");
    assert_eq!(summaries[1].events, 2);
    assert_eq!(summaries[1].arbitrages, 1);
    assert_eq!(summaries[1].fetched_at, fetched);
}

#[tokio::test]
async fn test_round_trip_preserves_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSnapshotStore::new(dir.path());
    let result = AnalysisResult::new(
        "soccer_epl",
        MarketAnalyzer::default().analyze(&[derby(), surebet()]),
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap(),
    );

    store.store(&result).await.unwrap();
    assert_eq!(store.load("soccer_epl").await.unwrap(), Some(result));
}

#[tokio::test]
async fn test_path_traversal_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSnapshotStore::new(dir.path());

    assert!(matches!(
        store.load("../etc/passwd").await,
        Err(StoreError::InvalidKey(_))
    ));
}
