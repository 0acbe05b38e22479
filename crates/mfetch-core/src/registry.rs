//! Scheme registry: maps URI schemes to the plugins that fetch them.
//!
//! A process-wide registry is created on first use with the built-in plugins
//! (`http`, `https`, `data`) already registered. Callers may add, replace or
//! remove plugins at any time; the last registration for a scheme wins.
//! Components that need isolation hold their own [`SchemeRegistry`].

use crate::abort::AbortSignal;
use crate::data_uri::DataUriPlugin;
use crate::error::Error;
use crate::http::HttpPlugin;
use crate::request::{Request, Response};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// A fetcher for one or more URI schemes.
///
/// One call is one round trip; retries happen above the plugin. Every
/// transport failure must be mapped to an [`Error`] before returning.
#[async_trait]
pub trait SchemePlugin: Send + Sync {
    async fn fetch(&self, uri: &str, request: &Request, abort: &AbortSignal)
        -> Result<Response, Error>;
}

fn normalize(scheme: &str) -> String {
    scheme.trim().trim_end_matches(':').to_ascii_lowercase()
}

#[derive(Default)]
pub struct SchemeRegistry {
    plugins: RwLock<HashMap<String, Arc<dyn SchemePlugin>>>,
}

impl std::fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemeRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

impl SchemeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `http`, `https` and `data` registered.
    pub fn with_builtin_plugins() -> Self {
        let registry = Self::new();
        let http: Arc<dyn SchemePlugin> = Arc::new(HttpPlugin::new());
        registry.register("http", Arc::clone(&http));
        registry.register("https", http);
        registry.register("data", Arc::new(DataUriPlugin));
        registry
    }

    /// Associate `scheme` with `plugin`, replacing any previous plugin.
    /// The scheme is matched case-insensitively; a trailing `:` is ignored.
    pub fn register(&self, scheme: &str, plugin: Arc<dyn SchemePlugin>) {
        let scheme = normalize(scheme);
        tracing::debug!(scheme = %scheme, "registering scheme plugin");
        self.plugins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scheme, plugin);
    }

    pub fn resolve(&self, scheme: &str) -> Option<Arc<dyn SchemePlugin>> {
        self.plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&normalize(scheme))
            .cloned()
    }

    /// Remove the plugin for `scheme`. Returns whether one was registered.
    pub fn unregister(&self, scheme: &str) -> bool {
        self.plugins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&normalize(scheme))
            .is_some()
    }

    /// Remove every plugin, built-ins included.
    pub fn clear(&self) {
        self.plugins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<String> {
        let mut schemes: Vec<String> = self
            .plugins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        schemes.sort();
        schemes
    }
}

static GLOBAL: Lazy<SchemeRegistry> = Lazy::new(SchemeRegistry::with_builtin_plugins);

/// The process-wide registry.
pub fn global() -> &'static SchemeRegistry {
    &GLOBAL
}

pub fn register_scheme(scheme: &str, plugin: Arc<dyn SchemePlugin>) {
    GLOBAL.register(scheme, plugin);
}

pub fn resolve(scheme: &str) -> Option<Arc<dyn SchemePlugin>> {
    GLOBAL.resolve(scheme)
}

pub fn unregister_scheme(scheme: &str) -> bool {
    GLOBAL.unregister(scheme)
}

/// Remove every plugin from the process-wide registry.
pub fn clear() {
    GLOBAL.clear();
}
