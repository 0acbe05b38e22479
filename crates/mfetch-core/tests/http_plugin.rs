//! HTTP plugin against a local scripted server.

mod common;

use common::http_server::{self, Scripted};
use mfetch_core::http::HttpPlugin;
use mfetch_core::{AbortSignal, Category, Code, Error, Request, RetryParameters, SchemePlugin};
use std::time::{Duration, Instant};

fn single_attempt() -> Request {
    Request::get().with_retry_parameters(RetryParameters {
        max_attempts: 1,
        ..RetryParameters::default()
    })
}

#[tokio::test]
async fn ok_response_has_body_and_headers() {
    let server = http_server::start(vec![Scripted::ok(b"segment bytes")
        .header("Content-Type", "video/mp4")
        .header("X-Dup", "a")
        .header("x-dup", "b")]);
    let resp = HttpPlugin::new()
        .fetch(&server.url, &single_attempt(), &AbortSignal::new())
        .await
        .unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.data, b"segment bytes");
    assert_eq!(resp.headers.get("content-type").map(String::as_str), Some("video/mp4"));
    assert_eq!(resp.headers.get("x-dup").map(String::as_str), Some("a, b"));
    assert_eq!(resp.headers.get("content-length").map(String::as_str), Some("13"));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn empty_2xx_body_is_success() {
    let server = http_server::start(vec![Scripted::status(204)]);
    let resp = HttpPlugin::new()
        .fetch(&server.url, &single_attempt(), &AbortSignal::new())
        .await
        .unwrap();
    assert_eq!(resp.status, 204);
    assert!(resp.data.is_empty());
}

#[tokio::test]
async fn not_found_is_bad_http_status() {
    let server = http_server::start(vec![Scripted::status(404)]);
    let err = HttpPlugin::new()
        .fetch(&server.url, &single_attempt(), &AbortSignal::new())
        .await
        .unwrap_err();
    assert_eq!(err.category(), Category::Network);
    assert_eq!(err.code(), Code::BadHttpStatus);
    assert_eq!(
        err,
        Error::BadHttpStatus {
            uri: server.url.clone(),
            status: 404
        }
    );
}

#[tokio::test]
async fn connection_refused_is_http_error() {
    let url = http_server::refused_url();
    let err = HttpPlugin::new()
        .fetch(&url, &single_attempt(), &AbortSignal::new())
        .await
        .unwrap_err();
    assert_eq!(err, Error::HttpError { uri: url });
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = http_server::start(vec![Scripted::ok(b"late").delayed(Duration::from_secs(3))]);
    let mut request = single_attempt();
    request.retry_parameters.timeout_ms = 200;
    let err = HttpPlugin::new()
        .fetch(&server.url, &request, &AbortSignal::new())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Timeout);
    assert_eq!(err.uri(), Some(server.url.as_str()));
}

#[tokio::test]
async fn sends_method_headers_and_body() {
    let server = http_server::start(vec![Scripted::ok(b"license")]);
    let request = single_attempt()
        .with_method("POST")
        .with_header("X-Token", "secret")
        .with_body(vec![1u8, 2, 3, 4]);
    let resp = HttpPlugin::new()
        .fetch(&server.url, &request, &AbortSignal::new())
        .await
        .unwrap();
    assert_eq!(resp.data, b"license");
    let seen = server.received();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].header("x-token"), Some("secret"));
    assert_eq!(seen[0].body, vec![1u8, 2, 3, 4]);
}

#[tokio::test]
async fn custom_method_and_head() {
    let server = http_server::start(vec![Scripted::ok(b"body")]);
    HttpPlugin::new()
        .fetch(&server.url, &single_attempt().with_method("DELETE"), &AbortSignal::new())
        .await
        .unwrap();
    let resp = HttpPlugin::new()
        .fetch(&server.url, &single_attempt().with_method("HEAD"), &AbortSignal::new())
        .await
        .unwrap();
    assert!(resp.data.is_empty());
    let methods: Vec<String> = server.received().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec!["DELETE", "HEAD"]);
}

#[tokio::test]
async fn redirect_keeps_final_headers_only() {
    let server = http_server::start(vec![
        Scripted::status(302)
            .header("Location", "/final")
            .header("X-Hop", "first"),
        Scripted::ok(b"done").header("X-Final", "yes"),
    ]);
    let resp = HttpPlugin::new()
        .fetch(&server.url, &single_attempt(), &AbortSignal::new())
        .await
        .unwrap();
    assert_eq!(resp.data, b"done");
    assert!(resp.uri.ends_with("/final"), "{}", resp.uri);
    assert_eq!(resp.header("x-final"), Some("yes"));
    assert_eq!(resp.header("x-hop"), None);
    assert_eq!(server.hits(), 2);
    assert_eq!(server.received()[1].path, "/final");
}

#[tokio::test]
async fn abort_interrupts_in_flight_transfer() {
    let server = http_server::start(vec![Scripted::ok(b"never").delayed(Duration::from_secs(8))]);
    let abort = AbortSignal::new();
    {
        let abort = abort.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            abort.abort();
        });
    }
    let started = Instant::now();
    let err = HttpPlugin::new()
        .fetch(&server.url, &single_attempt(), &abort)
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::HttpError);
    assert!(started.elapsed() < Duration::from_secs(5), "{:?}", started.elapsed());
}

#[tokio::test]
async fn empty_header_value_is_sent() {
    let server = http_server::start(vec![Scripted::ok(b"")]);
    let request = single_attempt()
        .with_header("X-Empty", "")
        .with_header("X-Pad", "v");
    HttpPlugin::new()
        .fetch(&server.url, &request, &AbortSignal::new())
        .await
        .unwrap();
    let seen = server.received();
    assert_eq!(seen[0].header("x-empty"), Some(""));
    assert_eq!(seen[0].header("x-pad"), Some("v"));
}
