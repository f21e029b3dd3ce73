//! Scorer client behavior against a mock detector.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::Request;
use threatgate::net::ConnMeta;
use threatgate::scoring::{RequestSnapshot, ScorerClient, ThreatCache};

mod common;

fn snapshot_for(remote_ip: &str) -> RequestSnapshot {
    let (parts, _): (Parts, _) = Request::builder()
        .uri("http://app.test/login")
        .header("user-agent", "integration-test")
        .body(Body::empty())
        .unwrap()
        .into_parts();

    RequestSnapshot::capture(remote_ip, &parts, &ConnMeta::plaintext(), 1, b"", &[])
}

#[tokio::test]
async fn test_successful_score_overwrites_cache() {
    let detector_addr: SocketAddr = "127.0.0.1:28411".parse().unwrap();
    common::start_mock_backend(detector_addr, r#"{"threat": 0.42}"#).await;

    let cache = ThreatCache::new();
    let scorer = ScorerClient::new(&format!("http://{}", detector_addr), cache.clone());

    scorer.score(snapshot_for("203.0.113.7")).await;
    assert_eq!(cache.get("203.0.113.7"), 0.42);
}

#[tokio::test]
async fn test_completion_order_wins() {
    let detector_addr: SocketAddr = "127.0.0.1:28412".parse().unwrap();

    // First completion scores 0.2, second scores 0.8.
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    common::start_programmable_backend(detector_addr, move || {
        let counter = counter.clone();
        async move {
            let body = if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                r#"{"threat": 0.2}"#
            } else {
                r#"{"threat": 0.8}"#
            };
            (200, body.to_string())
        }
    })
    .await;

    let cache = ThreatCache::new();
    let scorer = ScorerClient::new(&format!("http://{}", detector_addr), cache.clone());

    scorer.score(snapshot_for("203.0.113.7")).await;
    scorer.score(snapshot_for("203.0.113.7")).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.get("203.0.113.7"), 0.8);
}

#[tokio::test]
async fn test_non_200_status_leaves_cache_untouched() {
    let detector_addr: SocketAddr = "127.0.0.1:28413".parse().unwrap();
    common::start_programmable_backend(detector_addr, || async {
        (503, "overloaded".to_string())
    })
    .await;

    let cache = ThreatCache::new();
    cache.put("203.0.113.7", 0.3);
    let scorer = ScorerClient::new(&format!("http://{}", detector_addr), cache.clone());

    scorer.score(snapshot_for("203.0.113.7")).await;
    assert_eq!(cache.get("203.0.113.7"), 0.3);
}

#[tokio::test]
async fn test_undecodable_body_leaves_cache_untouched() {
    let detector_addr: SocketAddr = "127.0.0.1:28414".parse().unwrap();
    common::start_mock_backend(detector_addr, "not json at all").await;

    let cache = ThreatCache::new();
    let scorer = ScorerClient::new(&format!("http://{}", detector_addr), cache.clone());

    scorer.score(snapshot_for("203.0.113.7")).await;
    assert_eq!(cache.get("203.0.113.7"), 0.0);
}

#[tokio::test]
async fn test_transport_failure_leaves_cache_untouched() {
    // Nothing listens here.
    let cache = ThreatCache::new();
    cache.put("203.0.113.7", 0.6);
    let scorer = ScorerClient::new("http://127.0.0.1:28499", cache.clone());

    scorer.score(snapshot_for("203.0.113.7")).await;
    assert_eq!(cache.get("203.0.113.7"), 0.6);
}
