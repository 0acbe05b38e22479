//! Networking engine: the retry policy wrapped around the dispatcher.
//!
//! [`NetworkingEngine::send`] is the awaitable form. [`NetworkingEngine::request`]
//! starts the work on the runtime right away and returns a [`PendingRequest`]
//! handle that can be awaited or abandoned.

use crate::abort::AbortSignal;
use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::registry::SchemeRegistry;
use crate::request::{Request, Response};
use crate::retry::{run_with_retry, RetryPolicy};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default)]
pub struct NetworkingEngine {
    dispatcher: Dispatcher,
}

impl NetworkingEngine {
    /// Engine over the process-wide scheme registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine over a private registry.
    pub fn with_registry(registry: Arc<SchemeRegistry>) -> Self {
        Self {
            dispatcher: Dispatcher::with_registry(registry),
        }
    }

    /// Send `request`, retrying transient failures per `request.retry_parameters`.
    pub async fn send(&self, uri: &str, request: &Request) -> Result<Response, Error> {
        self.send_with_abort(uri, request, &AbortSignal::new()).await
    }

    /// [`send`](Self::send) with a caller-owned abort signal.
    pub async fn send_with_abort(
        &self,
        uri: &str,
        request: &Request,
        abort: &AbortSignal,
    ) -> Result<Response, Error> {
        let policy = RetryPolicy::from(&request.retry_parameters);
        let dispatcher = &self.dispatcher;
        run_with_retry(&policy, uri, abort, move |attempt| {
            tracing::debug!(uri, attempt, "sending request");
            dispatcher.send(uri, request, abort)
        })
        .await
    }

    /// Start sending `request` on the tokio runtime and return a handle to it.
    ///
    /// Must be called from within a runtime.
    pub fn request(&self, uri: impl Into<String>, request: Request) -> PendingRequest {
        let uri = uri.into();
        let signal = AbortSignal::new();
        let engine = self.clone();
        let task_uri = uri.clone();
        let task_signal = signal.clone();
        let handle = tokio::spawn(async move {
            engine
                .send_with_abort(&task_uri, &request, &task_signal)
                .await
        });
        PendingRequest {
            uri,
            handle,
            signal,
            finished: false,
        }
    }
}

/// Handle to a request started with [`NetworkingEngine::request`].
///
/// Await it for the outcome, or call [`abort`](Self::abort) to abandon it.
/// Dropping an unfinished handle aborts the request too.
#[derive(Debug)]
pub struct PendingRequest {
    uri: String,
    handle: JoinHandle<Result<Response, Error>>,
    signal: AbortSignal,
    finished: bool,
}

impl PendingRequest {
    /// Abandon the request: no further attempt starts, an in-flight transfer
    /// is aborted and the outcome is discarded.
    pub fn abort(self) {
        tracing::debug!(uri = %self.uri, "request abandoned");
        self.cancel();
    }

    /// Fire the signal for transports that watch it, and cancel the task so
    /// a plugin that does not is dropped at its next await.
    fn cancel(&self) {
        self.signal.abort();
        self.handle.abort();
    }

    /// The signal this request watches; aborting it has the same effect as
    /// [`abort`](Self::abort) except that the handle stays usable.
    pub fn abort_signal(&self) -> &AbortSignal {
        &self.signal
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Future for PendingRequest {
    type Output = Result<Response, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let joined = match Pin::new(&mut self.handle).poll(cx) {
            Poll::Pending => return Poll::Pending,
            Poll::Ready(joined) => joined,
        };
        self.finished = true;
        Poll::Ready(match joined {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::warn!(uri = %self.uri, "request task cancelled: {}", e);
                Err(Error::HttpError {
                    uri: self.uri.clone(),
                })
            }
        })
    }
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        if !self.finished {
            self.cancel();
        }
    }
}
