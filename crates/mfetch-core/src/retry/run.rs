//! Retry loop: run an async operation until success or the policy says stop.

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::abort::AbortSignal;
use crate::error::Error;
use std::future::Future;
use std::time::Duration;

/// Attempts made and time spent backing off by one retry loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryStats {
    pub attempts: u32,
    pub total_delay: Duration,
}

/// Runs `op` until it succeeds or the retry policy says to stop.
///
/// `op` receives the 1-based attempt number. On retryable failure, sleeps for
/// the backoff duration then tries again; attempt N+1 never starts before
/// attempt N has finished. `abort` is checked before every attempt: once it
/// has fired no attempt starts and the last error is returned unchanged, or
/// `HttpError` for `uri` when nothing was attempted.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    uri: &str,
    abort: &AbortSignal,
    op: F,
) -> Result<T, Error>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    run_with_retry_stats(policy, uri, abort, op).await.0
}

/// [`run_with_retry`], also reporting how many attempts were made.
pub async fn run_with_retry_stats<T, F, Fut>(
    policy: &RetryPolicy,
    uri: &str,
    abort: &AbortSignal,
    mut op: F,
) -> (Result<T, Error>, RetryStats)
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let mut stats = RetryStats::default();
    let mut last_err: Option<Error> = None;
    let mut attempt = 1u32;
    loop {
        if abort.is_aborted() {
            tracing::debug!(uri, attempt, "aborted before attempt");
            let err = last_err.unwrap_or_else(|| Error::HttpError {
                uri: uri.to_string(),
            });
            return (Err(err), stats);
        }

        stats.attempts = attempt;
        let err = match op(attempt).await {
            Ok(v) => {
                if attempt > 1 {
                    tracing::debug!(uri, attempt, "succeeded after retry");
                }
                return (Ok(v), stats);
            }
            Err(e) => e,
        };

        if abort.is_aborted() {
            tracing::debug!(uri, attempt, "aborted, not retrying: {}", err);
            return (Err(err), stats);
        }

        let delay = match policy.decide(attempt, classify(&err)) {
            RetryDecision::NoRetry => {
                tracing::debug!(uri, attempt, max_attempts = policy.max_attempts, "giving up: {}", err);
                return (Err(err), stats);
            }
            RetryDecision::RetryAfter(d) => d,
        };

        tracing::warn!(
            uri,
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, retrying: {}",
            err
        );

        // Abort is polled first so a signal that lands with the timer wins.
        tokio::select! {
            biased;
            _ = abort.aborted() => {
                tracing::debug!(uri, attempt, "aborted during backoff");
                return (Err(err), stats);
            }
            _ = tokio::time::sleep(delay) => {}
        }
        stats.total_delay += delay;
        last_err = Some(err);
        attempt += 1;
    }
}
