//! odds-engine: odds aggregation with value-bet and surebet detection
//!
//! This library provides the core components for:
//! - Fetching bookmaker odds per sport from The Odds API
//! - Value-bet and arbitrage (surebet) detection
//! - Per-sport result caching with adaptive advisory TTLs
//! - Request-driven refresh with stale fallback
//! - Fixed-window rate limiting
//! - JSON snapshot persistence
//! - Surebet webhook alerts
//! - Logging and Prometheus metrics

pub mod alert;
pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod feed;
pub mod ratelimit;
pub mod service;
pub mod telemetry;
