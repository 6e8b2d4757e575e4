//! Integration Tests for API Endpoints
//!
//! Drives the full router for each endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use metrics_cache::{
    api::create_router,
    cache::{CacheStore, ManualClock},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let store = CacheStore::new(100, Duration::from_secs(300), Duration::from_secs(3600));
    create_router(AppState::new(store))
}

fn create_clocked_app(max_entries: usize, ttl_secs: u64) -> (Router, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
    ));
    let store = CacheStore::with_clock(
        max_entries,
        Duration::from_secs(ttl_secs),
        Duration::from_secs(3600),
        clock.clone(),
    );
    (create_router(AppState::new(store)), clock)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn record(app: &Router, namespace: &str, name: &str, cpu: f64) -> StatusCode {
    let body = format!(r#"{{"usage":{{"cpu":{}}}}}"#, cpu);
    app.clone()
        .oneshot(put_json(&format!("/metrics/{}/{}", namespace, name), &body))
        .await
        .unwrap()
        .status()
}

// == Record Endpoint Tests ==

#[tokio::test]
async fn test_record_sample_success() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json(
            "/metrics/prod/web-1",
            r#"{"usage":{"cpu":0.5,"memory":512.0}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "prod/web-1");
    assert!(json["message"].as_str().unwrap().contains("prod/web-1"));
}

#[tokio::test]
async fn test_record_sample_with_timestamp() {
    let app = create_test_app();

    let status = app
        .clone()
        .oneshot(put_json(
            "/metrics/prod/db",
            r#"{"timestamp":"2024-06-15T11:00:00+00:00","usage":{"disk":10.0}}"#,
        ))
        .await
        .unwrap()
        .status();
    assert_eq!(status, StatusCode::OK);

    let response = app.oneshot(get("/metrics/prod/db")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["current"]["timestamp"], "2024-06-15T11:00:00+00:00");
    assert_eq!(json["history"]["disk"][0]["value"], 10.0);
}

#[tokio::test]
async fn test_record_sample_empty_usage() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/metrics/prod/web", r#"{"usage":{}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("at least one"));
}

#[tokio::test]
async fn test_record_sample_negative_value() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/metrics/prod/web", r#"{"usage":{"cpu":-1.0}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_record_sample_bad_timestamp() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json(
            "/metrics/prod/web",
            r#"{"timestamp":"yesterday","usage":{"cpu":1.0}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_record_sample_unknown_resource() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json("/metrics/prod/web", r#"{"usage":{"gpu":1.0}}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// == Get Endpoint Tests ==

#[tokio::test]
async fn test_get_metrics_after_record() {
    let app = create_test_app();
    assert_eq!(record(&app, "prod", "web", 0.25).await, StatusCode::OK);
    assert_eq!(record(&app, "prod", "web", 0.75).await, StatusCode::OK);

    let response = app.oneshot(get("/metrics/prod/web")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["namespace"], "prod");
    assert_eq!(json["name"], "web");
    assert_eq!(json["current"]["usage"]["cpu"], 0.75);
    assert_eq!(json["history"]["cpu"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_metrics_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get("/metrics/prod/ghost")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("prod/ghost"));
}

#[tokio::test]
async fn test_get_metrics_expired() {
    let (app, clock) = create_clocked_app(10, 60);
    record(&app, "prod", "web", 1.0).await;

    clock.advance(chrono::Duration::seconds(61));

    let response = app.oneshot(get("/metrics/prod/web")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Eviction ==

#[tokio::test]
async fn test_capacity_evicts_least_recently_used() {
    let (app, _clock) = create_clocked_app(2, 300);
    record(&app, "ns", "a", 1.0).await;
    record(&app, "ns", "b", 1.0).await;

    // Touch a so b becomes the victim
    let status = app.clone().oneshot(get("/metrics/ns/a")).await.unwrap().status();
    assert_eq!(status, StatusCode::OK);
    record(&app, "ns", "c", 1.0).await;

    let b = app.clone().oneshot(get("/metrics/ns/b")).await.unwrap();
    assert_eq!(b.status(), StatusCode::NOT_FOUND);
    let a = app.clone().oneshot(get("/metrics/ns/a")).await.unwrap();
    assert_eq!(a.status(), StatusCode::OK);

    let stats = app.oneshot(get("/stats")).await.unwrap();
    let json = body_to_json(stats.into_body()).await;
    assert_eq!(json["evictions"], 1);
    assert_eq!(json["total_entries"], 2);
}

// == Clear and Cleanup ==

#[tokio::test]
async fn test_clear_endpoint() {
    let app = create_test_app();
    record(&app, "ns", "a", 1.0).await;
    record(&app, "ns", "b", 1.0).await;

    let response = app.clone().oneshot(empty("DELETE", "/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 2);

    let response = app.oneshot(get("/metrics/ns/a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cleanup_endpoint_removes_stale() {
    let (app, clock) = create_clocked_app(10, 60);
    record(&app, "ns", "old", 1.0).await;
    clock.advance(chrono::Duration::seconds(90));
    record(&app, "ns", "new", 1.0).await;

    let response = app.clone().oneshot(empty("POST", "/metrics/cleanup")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["removed"], 1);

    let stats = app.oneshot(get("/stats")).await.unwrap();
    let json = body_to_json(stats.into_body()).await;
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["expirations"], 1);
}

// == Config Endpoint Tests ==

#[tokio::test]
async fn test_get_config() {
    let app = create_test_app();

    let response = app.oneshot(get("/config")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["max_entries"], 100);
    assert_eq!(json["ttl_secs"], 300);
    assert_eq!(json["aggregation_interval_secs"], 3600);
}

#[tokio::test]
async fn test_update_config_shrinks_and_evicts() {
    let app = create_test_app();
    for name in ["p1", "p2", "p3", "p4", "p5"] {
        record(&app, "ns", name, 1.0).await;
    }

    let response = app
        .clone()
        .oneshot(put_json("/config", r#"{"max_entries":2}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["max_entries"], 2);

    for name in ["p1", "p2", "p3"] {
        let status = app
            .clone()
            .oneshot(get(&format!("/metrics/ns/{}", name)))
            .await
            .unwrap()
            .status();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    for name in ["p4", "p5"] {
        let status = app
            .clone()
            .oneshot(get(&format!("/metrics/ns/{}", name)))
            .await
            .unwrap()
            .status();
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_update_config_zero_uses_defaults() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json(
            "/config",
            r#"{"max_entries":0,"aggregation_interval_secs":0}"#,
        ))
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["max_entries"], 1000);
    assert_eq!(json["aggregation_interval_secs"], 3600);
}

#[tokio::test]
async fn test_update_config_negative_uses_defaults() {
    let app = create_test_app();

    let response = app
        .oneshot(put_json(
            "/config",
            r#"{"max_entries":-5,"aggregation_interval_secs":-1}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["max_entries"], 1000);
    assert_eq!(json["aggregation_interval_secs"], 3600);
}

// == Stats and Health ==

#[tokio::test]
async fn test_stats_track_hits_and_misses() {
    let app = create_test_app();
    record(&app, "ns", "a", 1.0).await;
    app.clone().oneshot(get("/metrics/ns/a")).await.unwrap();
    app.clone().oneshot(get("/metrics/ns/missing")).await.unwrap();

    let response = app.oneshot(get("/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["hit_rate"], 0.5);
    assert_eq!(json["aggregation_runs"], 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}
