//! Request and response values passed through the dispatcher.

use crate::config::RetryParameters;
use std::collections::HashMap;

/// Outbound request description. One per logical fetch; a retry re-sends the
/// same value.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method; empty is treated as `GET`.
    pub method: String,
    /// Sent verbatim. Names are case-insensitive by convention.
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    /// Forward credentials to other hosts (redirects) and keep cookies.
    pub allow_cross_site_credentials: bool,
    pub retry_parameters: RetryParameters,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            headers: HashMap::new(),
            body: None,
            allow_cross_site_credentials: false,
            retry_parameters: RetryParameters::default(),
        }
    }
}

impl Request {
    /// A GET with default retry parameters.
    pub fn get() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_credentials(mut self, allow: bool) -> Self {
        self.allow_cross_site_credentials = allow;
        self
    }

    pub fn with_retry_parameters(mut self, params: RetryParameters) -> Self {
        self.retry_parameters = params;
        self
    }

    /// Method to put on the wire (`GET` when unset).
    pub fn effective_method(&self) -> &str {
        let m = self.method.trim();
        if m.is_empty() {
            "GET"
        } else {
            m
        }
    }
}

/// Normalized plugin result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Final URI (after redirects, for plugins that follow them).
    pub uri: String,
    /// Transport status; non-HTTP plugins report 200.
    pub status: u16,
    /// Raw body bytes; may be empty.
    pub data: Vec<u8>,
    /// One value per header name.
    pub headers: HashMap<String, String>,
}

impl Response {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
