//! Rate limiting module
//!
//! Fixed-window, per-second admission control. Used by request adapters to
//! reject abusive callers and by the aggregation service to cap upstream
//! fetches.

mod limiter;
mod window;

pub use limiter::RateLimiter;
pub use window::RateWindow;
