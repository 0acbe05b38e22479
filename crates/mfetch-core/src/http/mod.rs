//! HTTP(S) scheme plugin backed by libcurl.
//!
//! One `fetch` is one round trip: redirects are followed inside the transfer,
//! retries happen in the engine. The blocking transfer runs on tokio's
//! blocking pool and watches the abort signal from the progress callback.

mod headers;

pub use headers::parse_header_block;

use crate::abort::AbortSignal;
use crate::error::Error;
use crate::registry::SchemePlugin;
use crate::request::{Request, Response};
use async_trait::async_trait;
use headers::HeaderCollector;
use std::time::Duration;

const MAX_REDIRECTS: u32 = 10;

#[derive(Debug, Clone)]
pub struct HttpPlugin {
    max_redirects: u32,
}

impl Default for HttpPlugin {
    fn default() -> Self {
        Self {
            max_redirects: MAX_REDIRECTS,
        }
    }
}

impl HttpPlugin {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchemePlugin for HttpPlugin {
    async fn fetch(
        &self,
        uri: &str,
        request: &Request,
        abort: &AbortSignal,
    ) -> Result<Response, Error> {
        let plugin = self.clone();
        let owned_uri = uri.to_string();
        let request = request.clone();
        let abort = abort.clone();
        match tokio::task::spawn_blocking(move || plugin.perform(&owned_uri, &request, &abort))
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(uri, "http transfer task failed: {}", e);
                Err(Error::HttpError {
                    uri: uri.to_string(),
                })
            }
        }
    }
}

/// Map a libcurl failure onto the fetch taxonomy.
fn transport_error(uri: &str, e: &curl::Error) -> Error {
    if e.is_operation_timedout() {
        Error::Timeout {
            uri: uri.to_string(),
        }
    } else {
        Error::HttpError {
            uri: uri.to_string(),
        }
    }
}

/// Header line as libcurl expects it. `Name: ` would make libcurl drop the
/// header, so an empty value uses the `Name;` form.
fn header_line(name: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{};", name)
    } else {
        format!("{}: {}", name, value)
    }
}

/// Whole-attempt limit, connect phase included; `None` when `timeout_ms` is 0.
fn attempt_timeout(request: &Request) -> Option<Duration> {
    request.retry_parameters.timeout()
}

/// 2xx is success (an empty body included); anything else is a bad status.
fn check_status(
    uri: &str,
    final_uri: String,
    status: u16,
    data: Vec<u8>,
    raw_headers: &str,
) -> Result<Response, Error> {
    if !(200..=299).contains(&status) {
        return Err(Error::BadHttpStatus {
            uri: uri.to_string(),
            status,
        });
    }
    Ok(Response {
        uri: final_uri,
        status,
        data,
        headers: parse_header_block(raw_headers),
    })
}

impl HttpPlugin {
    /// Blocking transfer; call from `spawn_blocking`.
    fn perform(&self, uri: &str, request: &Request, abort: &AbortSignal) -> Result<Response, Error> {
        let fail = |e: curl::Error| {
            tracing::debug!(uri, "curl error: {}", e);
            transport_error(uri, &e)
        };

        let mut easy = curl::easy::Easy::new();
        easy.url(uri).map_err(fail)?;
        easy.follow_location(true).map_err(fail)?;
        easy.max_redirections(self.max_redirects).map_err(fail)?;
        if let Some(timeout) = attempt_timeout(request) {
            easy.connect_timeout(timeout).map_err(fail)?;
            easy.timeout(timeout).map_err(fail)?;
        }

        let method = request.effective_method();
        match method.to_ascii_uppercase().as_str() {
            "GET" if request.body.is_none() => easy.get(true).map_err(fail)?,
            "HEAD" => easy.nobody(true).map_err(fail)?,
            "POST" => easy
                .post_fields_copy(request.body.as_deref().unwrap_or_default())
                .map_err(fail)?,
            _ => {
                if let Some(body) = &request.body {
                    easy.post_fields_copy(body).map_err(fail)?;
                }
                easy.custom_request(method).map_err(fail)?;
            }
        }

        if request.allow_cross_site_credentials {
            // Keep auth on cross-host redirects and carry cookies between hops.
            easy.unrestricted_auth(true).map_err(fail)?;
            easy.cookie_file("").map_err(fail)?;
        }

        let mut list = curl::easy::List::new();
        for (k, v) in &request.headers {
            list.append(&header_line(k, v)).map_err(fail)?;
        }
        if !request.headers.is_empty() {
            easy.http_headers(list).map_err(fail)?;
        }
        easy.progress(true).map_err(fail)?;

        let mut body = Vec::new();
        let mut headers = HeaderCollector::default();
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(fail)?;
            transfer
                .header_function(|line| {
                    headers.push_line(line);
                    true
                })
                .map_err(fail)?;
            // Returning false aborts the transfer.
            transfer
                .progress_function(|_, _, _, _| !abort.is_aborted())
                .map_err(fail)?;
            if let Err(e) = transfer.perform() {
                if abort.is_aborted() {
                    tracing::debug!(uri, "transfer aborted");
                }
                return Err(fail(e));
            }
        }

        let code = easy.response_code().map_err(fail)?;
        let status = u16::try_from(code).unwrap_or(u16::MAX);
        let final_uri = easy
            .effective_url()
            .ok()
            .flatten()
            .unwrap_or(uri)
            .to_string();
        tracing::debug!(uri, status, bytes = body.len(), "http exchange finished");
        check_status(uri, final_uri, status, body, &headers.into_block())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        for status in [200, 204, 299] {
            let resp = check_status("u", "u".into(), status, Vec::new(), "").unwrap();
            assert_eq!(resp.status, status);
            assert!(resp.data.is_empty());
        }
        for status in [100, 199, 300, 304, 404, 500] {
            let err = check_status("u", "u".into(), status, Vec::new(), "").unwrap_err();
            assert_eq!(err, Error::BadHttpStatus { uri: "u".into(), status });
        }
    }

    #[test]
    fn response_keeps_final_uri_and_headers() {
        let resp = check_status(
            "http://a/old",
            "http://a/new".into(),
            200,
            b"hi".to_vec(),
            "content-type: text/plain",
        )
        .unwrap();
        assert_eq!(resp.uri, "http://a/new");
        assert_eq!(resp.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn header_lines_are_verbatim() {
        assert_eq!(header_line("X-Token", "abc"), "X-Token: abc");
        assert_eq!(header_line("X-Pad", " v "), "X-Pad:  v ");
        assert_eq!(header_line("X-Empty", ""), "X-Empty;");
    }

    #[test]
    fn zero_timeout_means_no_limit() {
        let mut request = Request::get();
        assert_eq!(attempt_timeout(&request), None);
        request.retry_parameters.timeout_ms = 750;
        assert_eq!(attempt_timeout(&request), Some(Duration::from_millis(750)));
    }
}
