//! Resilience policies.
//!
//! Primary calls go through [`RetryPolicy`]; optional stages use
//! [`FallbackExt::or_fallback`] to substitute a deterministic default.

mod fallback;
mod retry;

pub use fallback::FallbackExt;
pub use retry::{RetryConfig, RetryOn, RetryPolicy};
