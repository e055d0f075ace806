//! Headless feed runs delivering to a mock collector at EOF.

mod common;

use common::{FailingReader, FixedHost};
use httpmock::Method::POST;
use httpmock::MockServer;
use interaction_recorder::commands::run_feed;
use interaction_recorder::{RecorderConfig, RecorderError};
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, BufReader};

fn config_for(server: &MockServer) -> RecorderConfig {
    RecorderConfig {
        endpoint: server.url("/collect"),
        // Far longer than any test run, so only the EOF flush delivers
        flush_interval_ms: 3_600_000,
        ..Default::default()
    }
}

fn host() -> Arc<FixedHost> {
    Arc::new(FixedHost::new("https://example.com/page", 1000))
}

#[tokio::test]
async fn test_eof_flush_delivers_fed_events() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/collect")
                .header("content-type", "application/json")
                .json_body(json!({
                    "events": [
                        {"type": "click", "timestamp": 1000, "x": 1, "y": 2},
                        {"type": "click", "timestamp": 1000, "x": 3, "y": 4}
                    ],
                    "url": "https://example.com/page"
                }));
            then.status(200);
        })
        .await;

    let mut input = b"{\"type\":\"click\",\"clientX\":1,\"clientY\":2}\n".to_vec();
    input.extend_from_slice(b"\xff\xfe garbage\n");
    input.extend_from_slice(b"{\"type\":\"click\",\"clientX\":3,\"clientY\":4}\n");

    let report = run_feed(input.as_slice(), &config_for(&server), host())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(report.summary.dispatched, 2);
    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.stats.batches_sent, 1);
}

#[tokio::test]
async fn test_empty_feed_sends_nothing() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/collect");
            then.status(200);
        })
        .await;

    let report = run_feed(&b"\n\n"[..], &config_for(&server), host())
        .await
        .unwrap();

    assert_eq!(mock.hits_async().await, 0);
    assert_eq!(report.stats.recorded, 0);
}

#[tokio::test]
async fn test_reader_failure_still_flushes_buffered_events() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/collect").json_body(json!({
                "events": [{"type": "mousemove", "timestamp": 1000, "x": 5, "y": 6}],
                "url": "https://example.com/page"
            }));
            then.status(200);
        })
        .await;

    let reader = BufReader::new(
        (&b"{\"type\":\"mousemove\",\"clientX\":5,\"clientY\":6}\n"[..]).chain(FailingReader),
    );

    let err = run_feed(reader, &config_for(&server), host())
        .await
        .unwrap_err();

    assert!(matches!(err, RecorderError::Io(_)));
    mock.assert_async().await;
}
