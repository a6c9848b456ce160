//! Integration tests for the aggregation service

use crate::support::{derby, surebet, FakeFeed};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use odds_engine::alert::{AlertSink, SurebetAlert};
use odds_engine::analysis::MarketAnalyzer;
use odds_engine::cache::FreshnessPolicy;
use odds_engine::data::{JsonSnapshotStore, SnapshotStore};
use odds_engine::feed::UpstreamError;
use odds_engine::service::{AggregationService, ResponseOrigin, ServiceConfig, SportState};
use parking_lot::Mutex;
use std::sync::Arc;

fn service(feed: Arc<FakeFeed>) -> AggregationService {
    AggregationService::new(
        feed,
        MarketAnalyzer::default(),
        FreshnessPolicy::default(),
        ServiceConfig::default(),
    )
}

#[derive(Default)]
struct RecordingSink {
    alerts: Mutex<Vec<SurebetAlert>>,
    fail: bool,
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn notify(&self, alert: &SurebetAlert) -> anyhow::Result<()> {
        if self.fail {
            return Err(anyhow!("sink down"));
        }
        self.alerts.lock().push(alert.clone());
        Ok(())
    }
}

#[tokio::test]
async fn test_stale_fallback_keeps_serving_last_result() {
    let feed = Arc::new(FakeFeed::new(vec![
        Ok(vec![derby()]),
        Err(UpstreamError::Transport("connection reset".to_string())),
        Err(UpstreamError::Timeout),
    ]));
    let svc = service(feed.clone());
    let t0 = Utc::now();

    let first = svc.request_at("soccer_epl", t0).await;
    assert!(first.fresh);
    assert_eq!(first.events().len(), 1);

    for minutes in [6, 30] {
        let now = t0 + Duration::minutes(minutes);
        assert_eq!(svc.state("soccer_epl", now), SportState::Stale);

        let response = svc.request_at("soccer_epl", now).await;
        assert!(!response.fresh);
        assert_eq!(response.origin, ResponseOrigin::StaleFallback);
        assert_eq!(response.events()[0].id, "e1");
        assert_eq!(response.fetched_at(), Some(t0));
    }
    assert_eq!(feed.calls(), 3);
}

#[tokio::test]
async fn test_cold_failure_then_recovery() {
    let feed = Arc::new(FakeFeed::new(vec![
        Err(UpstreamError::Status {
            status: 401,
            body: "invalid key".to_string(),
        }),
        Ok(vec![derby()]),
    ]));
    let svc = service(feed);
    let now = Utc::now();

    let failed = svc.request_at("soccer_epl", now).await;
    assert!(!failed.fresh);
    assert!(failed.is_unavailable());
    assert!(failed.events().is_empty());
    assert_eq!(svc.state("soccer_epl", now), SportState::Cold);

    let recovered = svc.request_at("soccer_epl", now).await;
    assert!(recovered.fresh);
    assert_eq!(recovered.origin, ResponseOrigin::Upstream);
    assert_eq!(recovered.events().len(), 1);
}

#[tokio::test]
async fn test_concurrent_misses_share_one_fetch() {
    let feed = Arc::new(
        FakeFeed::new(vec![Ok(vec![derby()])]).with_delay(std::time::Duration::from_millis(50)),
    );
    let svc = Arc::new(service(feed.clone()));
    let now = Utc::now();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let svc = Arc::clone(&svc);
        handles.push(tokio::spawn(
            async move { svc.request_at("soccer_epl", now).await },
        ));
    }

    let mut origins = Vec::new();
    for handle in handles {
        let response = handle.await.unwrap();
        assert!(response.fresh);
        assert_eq!(response.events().len(), 1);
        origins.push(response.origin);
    }

    assert_eq!(feed.calls(), 1);
    assert_eq!(
        origins
            .iter()
            .filter(|o| **o == ResponseOrigin::Upstream)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_results_are_shared_not_copied() {
    let feed = Arc::new(FakeFeed::new(vec![Ok(vec![derby()])]));
    let svc = service(feed);
    let now = Utc::now();

    let a = svc.request_at("soccer_epl", now).await;
    let b = svc.request_at("soccer_epl", now + Duration::seconds(1)).await;
    assert!(Arc::ptr_eq(a.result.as_ref().unwrap(), b.result.as_ref().unwrap()));
}

#[tokio::test]
async fn test_snapshot_written_and_hydrated() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonSnapshotStore::new(dir.path()));
    let t0 = Utc::now();

    let writer = service(Arc::new(FakeFeed::new(vec![Ok(vec![derby()])]))).with_store(store.clone());
    writer.request_at("soccer_epl", t0).await;
    assert!(store.load("soccer_epl").await.unwrap().is_some());

    // A new process with a dead upstream serves the snapshot
    let feed = Arc::new(FakeFeed::new(vec![]));
    let reader = service(feed.clone()).with_store(store);

    let warm = reader.request_at("soccer_epl", t0 + Duration::seconds(30)).await;
    assert!(warm.fresh);
    assert_eq!(warm.origin, ResponseOrigin::Cache);
    assert_eq!(feed.calls(), 0);

    let stale = reader.request_at("soccer_epl", t0 + Duration::minutes(10)).await;
    assert_eq!(stale.origin, ResponseOrigin::StaleFallback);
    assert_eq!(stale.events().len(), 1);
}

#[tokio::test]
async fn test_alerts_only_on_fresh_fetch() {
    let feed = Arc::new(FakeFeed::new(vec![Ok(vec![derby(), surebet()])]));
    let sink = Arc::new(RecordingSink::default());
    let svc = service(feed).with_alerts(sink.clone());
    let t0 = Utc::now();

    svc.request_at("soccer_epl", t0).await;
    svc.flush_alerts().await;
    {
        let alerts = sink.alerts.lock();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].sport, "soccer_epl");
        assert_eq!(alerts[0].event.id, "arb");
    }

    // Cache hit and stale fallback never re-alert
    svc.request_at("soccer_epl", t0 + Duration::seconds(10)).await;
    svc.request_at("soccer_epl", t0 + Duration::minutes(10)).await;
    svc.flush_alerts().await;
    assert_eq!(sink.alerts.lock().len(), 1);
}

#[tokio::test]
async fn test_failing_sink_does_not_affect_response() {
    let feed = Arc::new(FakeFeed::new(vec![Ok(vec![surebet()])]));
    let sink = Arc::new(RecordingSink {
        fail: true,
        ..RecordingSink::default()
    });
    let svc = service(feed).with_alerts(sink);

    let response = svc.request_at("soccer_epl", Utc::now()).await;
    svc.flush_alerts().await;
    assert!(response.fresh);
    assert!(response.events()[0].arbitrage.is_some());
}

#[tokio::test]
async fn test_flush_forces_refetch() {
    let feed = Arc::new(FakeFeed::new(vec![Ok(vec![derby()]), Ok(vec![])]));
    let svc = service(feed.clone());
    let now = Utc::now();

    svc.request_at("soccer_epl", now).await;
    assert_eq!(svc.cache().flush(), 1);
    assert_eq!(svc.state("soccer_epl", now), SportState::Cold);

    let response = svc.request_at("soccer_epl", now).await;
    assert_eq!(response.origin, ResponseOrigin::Upstream);
    assert!(response.events().is_empty());
    assert!(!response.is_unavailable());
    assert_eq!(feed.calls(), 2);
}

#[tokio::test]
async fn test_finished_alert_tasks_are_reaped() {
    let feed = Arc::new(FakeFeed::new((0..5).map(|_| Ok(vec![surebet()])).collect()));
    let sink = Arc::new(RecordingSink::default());
    let config = ServiceConfig {
        cache_ttl: Duration::zero(),
        ..ServiceConfig::default()
    };
    let svc = AggregationService::new(
        feed,
        MarketAnalyzer::default(),
        FreshnessPolicy::default(),
        config,
    )
    .with_alerts(sink.clone());
    let t0 = Utc::now();

    for i in 0..5 {
        svc.request_at("soccer_epl", t0 + Duration::seconds(i)).await;
        // Let the delivery task run to completion
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(svc.pending_alerts() <= 1);
    }

    svc.flush_alerts().await;
    assert_eq!(svc.pending_alerts(), 0);
    assert_eq!(sink.alerts.lock().len(), 5);
}
