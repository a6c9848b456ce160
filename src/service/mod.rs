//! Aggregation service module
//!
//! Ties the feed, analyzer, cache and freshness policy together behind a
//! single request operation.

mod aggregator;
mod types;

pub use aggregator::AggregationService;
pub use types::{OddsResponse, ResponseOrigin, ServiceConfig, SportState};
