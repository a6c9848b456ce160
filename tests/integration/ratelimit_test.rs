//! Integration tests for the rate limiter

use chrono::{Duration, TimeZone, Utc};
use odds_engine::ratelimit::RateLimiter;
use std::sync::Arc;

#[test]
fn test_identities_are_independent() {
    let limiter = RateLimiter::new();
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();

    assert!(limiter.allow("10.0.0.1", 1, now));
    assert!(!limiter.allow("10.0.0.1", 1, now));
    assert!(limiter.allow("10.0.0.2", 1, now));
    assert!(limiter.allow("10.0.0.1", 1, now + Duration::seconds(1)));
}

#[test]
fn test_sweep_drops_idle_identities() {
    let limiter = RateLimiter::new();
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();

    for i in 0..100 {
        assert!(limiter.allow(&format!("client-{i}"), 5, now));
    }
    assert_eq!(limiter.len(), 100);

    assert!(limiter.allow("client-0", 5, now + Duration::seconds(10)));
    assert_eq!(limiter.sweep(now + Duration::seconds(10)), 99);
    assert_eq!(limiter.len(), 1);
}

#[test]
fn test_shared_limiter_across_threads() {
    let limiter = Arc::new(RateLimiter::new());
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            std::thread::spawn(move || (0..50).filter(|_| limiter.allow("shared", 10, now)).count())
        })
        .collect();

    let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(admitted, 10);
}
