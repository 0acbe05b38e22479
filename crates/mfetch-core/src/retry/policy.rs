use crate::config::RetryParameters;
use rand::Rng;
use std::time::Duration;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Worth another attempt (bad status, timeout, connection failure).
    Transient,
    /// Retrying cannot help.
    Permanent,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff with random fuzz and an optional cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    pub backoff_factor: f64,
    /// Randomization range as a fraction of the delay.
    pub fuzz_factor: f64,
    /// Upper bound on backoff delay.
    pub max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryParameters::default())
    }
}

impl From<&RetryParameters> for RetryPolicy {
    fn from(p: &RetryParameters) -> Self {
        Self {
            max_attempts: p.max_attempts.max(1),
            base_delay: Duration::from_millis(p.base_delay_ms),
            backoff_factor: p.backoff_factor.max(1.0),
            fuzz_factor: p.fuzz_factor.clamp(0.0, 1.0),
            max_delay: p.max_delay_ms.map(Duration::from_millis),
        }
    }
}

impl RetryPolicy {
    /// Backoff before attempt `attempt + 1`, without fuzz:
    /// `base_delay * backoff_factor^(attempt - 1)`, capped at `max_delay`.
    pub fn nominal_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.base_delay.as_secs_f64() * self.backoff_factor.powi(exp);
        self.cap(secs)
    }

    /// `attempt` is 1-based (1 = first attempt). Returns `RetryDecision::NoRetry`
    /// when we should stop retrying.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }

        match kind {
            ErrorKind::Permanent => RetryDecision::NoRetry,
            ErrorKind::Transient => {
                let nominal = self.nominal_delay(attempt).as_secs_f64();
                let fuzz = if self.fuzz_factor > 0.0 {
                    rand::rng().random_range(1.0 - self.fuzz_factor..=1.0 + self.fuzz_factor)
                } else {
                    1.0
                };
                RetryDecision::RetryAfter(self.cap(nominal * fuzz))
            }
        }
    }

    fn cap(&self, secs: f64) -> Duration {
        // Huge exponents overflow to inf; Duration::from_secs_f64 would panic.
        let d = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX);
        match self.max_delay {
            Some(max) => d.min(max),
            None => d,
        }
    }
}
