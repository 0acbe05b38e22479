//! `data:` scheme plugin (RFC 2397).
//!
//! `data:[<mediatype>][;name=value]*[;base64],<payload>`. The payload is
//! percent-decoded, then base64-decoded when flagged. Nothing touches the
//! network, so the abort signal is ignored.

use crate::abort::AbortSignal;
use crate::error::Error;
use crate::registry::SchemePlugin;
use crate::request::{Request, Response};
use async_trait::async_trait;
use base64::Engine;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriPlugin;

/// Decoded contents of a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Media type with its parameters, e.g. `text/plain;charset=utf-8`.
    /// Empty when the URI names none.
    pub content_type: String,
    pub data: Vec<u8>,
}

pub fn parse(uri: &str) -> Result<DataUri, Error> {
    let malformed = || Error::MalformedDataUri {
        uri: uri.to_string(),
    };

    let rest = match uri.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("data:") => &uri[5..],
        _ => return Err(malformed()),
    };
    let (meta, payload) = rest.split_once(',').ok_or_else(malformed)?;

    let mut parts = meta.split(';');
    let media_type = parts.next().unwrap_or_default().trim();
    let mut params = Vec::new();
    let mut base64 = false;
    for part in parts {
        if part.eq_ignore_ascii_case("base64") {
            base64 = true;
        } else if part.contains('=') {
            params.push(part);
        } else {
            tracing::debug!(uri, parameter = part, "unknown data URI encoding");
            return Err(Error::UnknownDataUriEncoding {
                uri: uri.to_string(),
            });
        }
    }

    let decoded = urlencoding::decode_binary(payload.as_bytes());
    let data = if base64 {
        base64::engine::general_purpose::STANDARD
            .decode(decoded.as_ref())
            .map_err(|e| {
                tracing::debug!(uri, "bad base64 payload: {}", e);
                malformed()
            })?
    } else {
        decoded.into_owned()
    };

    let content_type = if media_type.is_empty() {
        String::new()
    } else {
        std::iter::once(media_type)
            .chain(params)
            .collect::<Vec<_>>()
            .join(";")
    };
    Ok(DataUri { content_type, data })
}

#[async_trait]
impl SchemePlugin for DataUriPlugin {
    async fn fetch(
        &self,
        uri: &str,
        _request: &Request,
        _abort: &AbortSignal,
    ) -> Result<Response, Error> {
        let parsed = parse(uri)?;
        let mut headers = HashMap::new();
        if !parsed.content_type.is_empty() {
            headers.insert("content-type".to_string(), parsed.content_type);
        }
        Ok(Response {
            uri: uri.to_string(),
            status: 200,
            data: parsed.data,
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Code;

    #[test]
    fn plain_payload_is_percent_decoded() {
        let d = parse("data:text/plain,hello%20world%21").unwrap();
        assert_eq!(d.content_type, "text/plain");
        assert_eq!(d.data, b"hello world!");
    }

    #[test]
    fn base64_payload() {
        let d = parse("data:application/octet-stream;base64,AAECAw==").unwrap();
        assert_eq!(d.data, vec![0, 1, 2, 3]);
    }

    #[test]
    fn parameters_are_kept_in_content_type() {
        let d = parse("data:text/plain;charset=utf-8;base64,SGk=").unwrap();
        assert_eq!(d.content_type, "text/plain;charset=utf-8");
        assert_eq!(d.data, b"Hi");
    }

    #[test]
    fn no_media_type() {
        let d = parse("DATA:,abc").unwrap();
        assert_eq!(d.content_type, "");
        assert_eq!(d.data, b"abc");
    }

    #[test]
    fn missing_comma_is_malformed() {
        assert_eq!(parse("data:text/plain").unwrap_err().code(), Code::MalformedDataUri);
        assert_eq!(parse("http://a,b").unwrap_err().code(), Code::MalformedDataUri);
    }

    #[test]
    fn unknown_encoding() {
        let err = parse("data:text/plain;gzip,abc").unwrap_err();
        assert_eq!(
            err,
            Error::UnknownDataUriEncoding {
                uri: "data:text/plain;gzip,abc".into()
            }
        );
    }

    #[test]
    fn bad_base64_is_malformed() {
        assert_eq!(parse("data:;base64,@@@").unwrap_err().code(), Code::MalformedDataUri);
    }

    #[tokio::test]
    async fn plugin_reports_content_type() {
        let resp = DataUriPlugin
            .fetch("data:text/vtt,WEBVTT", &Request::get(), &AbortSignal::new())
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.data, b"WEBVTT");
        assert_eq!(resp.header("content-type"), Some("text/vtt"));
    }
}
