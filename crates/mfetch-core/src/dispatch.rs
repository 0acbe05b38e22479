//! Routes a request to the plugin registered for its URI scheme.

use crate::abort::AbortSignal;
use crate::error::Error;
use crate::registry::{self, SchemePlugin, SchemeRegistry};
use crate::request::{Request, Response};
use std::sync::Arc;

/// Scheme of `uri`, lower-cased.
///
/// `data:` URIs have no `//`, so they are recognized by prefix. Anything
/// without `://` has no scheme and yields `""`.
pub fn scheme_of(uri: &str) -> String {
    if uri.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data:")) {
        return "data".to_string();
    }
    match uri.find("://") {
        Some(i) => uri[..i].to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Single-attempt dispatch; retries live in [`crate::retry`].
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    /// `None` uses the process-wide registry.
    registry: Option<Arc<SchemeRegistry>>,
}

impl Dispatcher {
    /// Dispatch through the process-wide registry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: Arc<SchemeRegistry>) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    fn resolve(&self, scheme: &str) -> Option<Arc<dyn SchemePlugin>> {
        match &self.registry {
            Some(r) => r.resolve(scheme),
            None => registry::resolve(scheme),
        }
    }

    /// Send one attempt of `request` to `uri`.
    ///
    /// Fails with [`Error::UnsupportedScheme`] when no plugin handles the
    /// scheme; otherwise the plugin's result is returned unchanged.
    pub async fn send(
        &self,
        uri: &str,
        request: &Request,
        abort: &AbortSignal,
    ) -> Result<Response, Error> {
        let scheme = scheme_of(uri);
        let Some(plugin) = self.resolve(&scheme) else {
            tracing::debug!(scheme = %scheme, uri, "no plugin for scheme");
            return Err(Error::UnsupportedScheme {
                uri: uri.to_string(),
            });
        };
        tracing::debug!(scheme = %scheme, uri, method = request.effective_method(), "dispatching");
        plugin.fetch(uri, request, abort).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn scheme_extraction() {
        assert_eq!(scheme_of("https://a/b"), "https");
        assert_eq!(scheme_of("HTTP://a/b"), "http");
        assert_eq!(scheme_of("data:text/plain,hi"), "data");
        assert_eq!(scheme_of("DATA:,x"), "data");
        assert_eq!(scheme_of("no-scheme/path"), "");
        assert_eq!(scheme_of(""), "");
        assert_eq!(scheme_of("dat\u{e9}://x"), "dat\u{e9}");
    }

    struct Counting(AtomicU32);

    #[async_trait]
    impl SchemePlugin for Counting {
        async fn fetch(
            &self,
            uri: &str,
            request: &Request,
            _abort: &AbortSignal,
        ) -> Result<Response, Error> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Response {
                uri: uri.to_string(),
                status: 200,
                data: request.body.clone().unwrap_or_default(),
                headers: HashMap::new(),
            })
        }
    }

    #[tokio::test]
    async fn unknown_scheme_is_unsupported() {
        let dispatcher = Dispatcher::with_registry(Arc::new(SchemeRegistry::new()));
        let err = dispatcher
            .send("ftp://host/file", &Request::get(), &AbortSignal::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedScheme {
                uri: "ftp://host/file".into()
            }
        );
    }

    #[tokio::test]
    async fn forwards_to_registered_plugin() {
        let registry = Arc::new(SchemeRegistry::new());
        let plugin = Arc::new(Counting(AtomicU32::new(0)));
        registry.register("foo", plugin.clone());
        let dispatcher = Dispatcher::with_registry(registry);
        let resp = dispatcher
            .send("FOO://x", &Request::get().with_body("abc"), &AbortSignal::new())
            .await
            .unwrap();
        assert_eq!(resp.data, b"abc");
        assert_eq!(resp.uri, "FOO://x");
        assert_eq!(plugin.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn replaced_plugin_is_used() {
        let registry = Arc::new(SchemeRegistry::new());
        let first = Arc::new(Counting(AtomicU32::new(0)));
        let second = Arc::new(Counting(AtomicU32::new(0)));
        registry.register("foo", first.clone());
        registry.register("foo", second.clone());
        Dispatcher::with_registry(registry)
            .send("foo://x", &Request::get(), &AbortSignal::new())
            .await
            .unwrap();
        assert_eq!(first.0.load(Ordering::SeqCst), 0);
        assert_eq!(second.0.load(Ordering::SeqCst), 1);
    }
}
