//! Pluggable request dispatch for media streaming clients.
//!
//! Requests are routed by URI scheme to a [`SchemePlugin`] (HTTP(S) over
//! libcurl and `data:` URIs are built in), retried by [`retry`] according to
//! per-request [`RetryParameters`], and fail with a categorized [`Error`].

pub mod abort;
pub mod config;
pub mod data_uri;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod http;
pub mod logging;
pub mod registry;
pub mod request;
pub mod retry;
pub mod text;

pub use abort::AbortSignal;
pub use config::{PlayerConfig, RequestType, RetryParameters};
pub use dispatch::Dispatcher;
pub use engine::{NetworkingEngine, PendingRequest};
pub use error::{Category, Code, Error, ErrorData};
pub use registry::{clear, register_scheme, resolve, unregister_scheme, SchemePlugin, SchemeRegistry};
pub use request::{Request, Response};
