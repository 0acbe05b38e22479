//! Abort signal shared between a caller, the retry loop and the transport.
//!
//! The caller (or a [`PendingRequest`](crate::engine::PendingRequest)) fires
//! the signal; the retry loop stops scheduling attempts and the curl progress
//! callback aborts the in-flight exchange.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    aborted: AtomicBool,
    notify: Notify,
}

/// Cloneable abort flag. Aborting any clone aborts all of them; it cannot be reset.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    inner: Arc<Inner>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal and wake every task waiting in [`aborted`](Self::aborted).
    pub fn abort(&self) {
        if !self.inner.aborted.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.inner.aborted.load(Ordering::SeqCst)
    }

    /// Completes once the signal has fired (immediately if it already has).
    pub async fn aborted(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register before re-checking the flag so a concurrent abort() is not missed.
            notified.as_mut().enable();
            if self.is_aborted() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn new_signal_is_not_aborted() {
        assert!(!AbortSignal::new().is_aborted());
    }

    #[test]
    fn clones_share_state() {
        let a = AbortSignal::new();
        let b = a.clone();
        b.abort();
        assert!(a.is_aborted());
        // Idempotent.
        a.abort();
        assert!(b.is_aborted());
    }

    #[tokio::test]
    async fn aborted_returns_immediately_when_already_fired() {
        let signal = AbortSignal::new();
        signal.abort();
        tokio::time::timeout(Duration::from_secs(1), signal.aborted())
            .await
            .expect("should not wait");
    }

    #[tokio::test]
    async fn aborted_wakes_waiting_task() {
        let signal = AbortSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.aborted().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        signal.abort();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
    }
}
