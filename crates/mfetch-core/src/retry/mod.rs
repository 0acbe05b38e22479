//! Retry and backoff policy.
//!
//! Error classification (transient vs permanent) and fuzzed exponential
//! backoff, shared by every request the engine sends. Attempts of one
//! logical request are strictly sequential.

mod classify;
mod policy;
mod run;

pub use classify::classify;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, run_with_retry_stats, RetryStats};
