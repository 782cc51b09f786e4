use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use loadgen::application::config_store::ConfigStore;
use loadgen::application::throughput::ThroughputMeter;
use loadgen::domain::LoadConfig;
use loadgen::infrastructure::observability::Metrics;
use loadgen::interfaces::http::{ControlState, router};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

fn state() -> ControlState {
    ControlState::new(
        ConfigStore::new(LoadConfig::new("http://initial", 1, 1)),
        Metrics::new().unwrap(),
        ThroughputMeter::new(Duration::from_secs(5)),
    )
}

async fn send(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_post_then_get_config_round_trip() {
    let state = state();
    let app = router(state.clone(), None);
    let body = json!({"Url": "http://x", "Clients": 5, "RequestsPerSecondTarget": 10});

    let (status, posted) = send(&app, Method::POST, "/api/config", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&posted).unwrap(), body);

    let (status, fetched) = send(&app, Method::GET, "/api/config", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&fetched).unwrap(), body);

    assert_eq!(state.config.get(), LoadConfig::new("http://x", 5, 10));
    assert_eq!(state.metrics.target_rate.get(), 10.0);
}

#[tokio::test]
async fn test_invalid_post_keeps_previous_config() {
    let state = state();
    let app = router(state.clone(), None);
    let valid = json!({"Url": "http://x", "Clients": 5, "RequestsPerSecondTarget": 10});
    send(&app, Method::POST, "/api/config", &valid.to_string()).await;

    let (status, message) = send(&app, Method::POST, "/api/config", "{not json").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!message.is_empty());

    let (status, message) =
        send(&app, Method::POST, "/api/config", r#"{"Clients": "many"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(message.contains("invalid type"), "{message}");

    let (_, fetched) = send(&app, Method::GET, "/api/config", "").await;
    assert_eq!(serde_json::from_str::<Value>(&fetched).unwrap(), valid);
    assert_eq!(state.metrics.target_rate.get(), 10.0);
}

#[tokio::test]
async fn test_partial_post_zeroes_missing_fields() {
    let state = state();
    let app = router(state.clone(), None);

    let (status, posted) = send(
        &app,
        Method::POST,
        "/api/config",
        r#"{"Url": "http://only-url", "Ignored": 1}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&posted).unwrap(),
        json!({"Url": "http://only-url", "Clients": 0, "RequestsPerSecondTarget": 0})
    );
    assert_eq!(state.config.desired_workers(), 0);
}

#[tokio::test]
async fn test_post_accepts_keys_in_any_case() {
    let state = state();
    let app = router(state.clone(), None);

    let (status, posted) = send(
        &app,
        Method::POST,
        "/api/config",
        r#"{"url": "http://x", "clients": 5, "requestsPerSecondTarget": 10}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&posted).unwrap(),
        json!({"Url": "http://x", "Clients": 5, "RequestsPerSecondTarget": 10})
    );
    assert_eq!(state.config.get(), LoadConfig::new("http://x", 5, 10));
    assert_eq!(state.metrics.target_rate.get(), 10.0);
}

#[tokio::test]
async fn test_post_null_field_decodes_as_zero() {
    let state = state();
    let app = router(state.clone(), None);

    let (status, posted) = send(
        &app,
        Method::POST,
        "/api/config",
        r#"{"Url": "http://x", "Clients": null, "RequestsPerSecondTarget": 3}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&posted).unwrap(),
        json!({"Url": "http://x", "Clients": 0, "RequestsPerSecondTarget": 3})
    );
    assert_eq!(state.config.get(), LoadConfig::new("http://x", 0, 3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_posts_leave_gauge_matching_config() {
    let state = state();
    let app = router(state.clone(), None);

    let mut posters = Vec::new();
    for rate in 1..=8u32 {
        let app = app.clone();
        posters.push(tokio::spawn(async move {
            let body = json!({"Url": "http://x", "Clients": 1, "RequestsPerSecondTarget": rate});
            for _ in 0..50 {
                let (status, _) = send(&app, Method::POST, "/api/config", &body.to_string()).await;
                assert_eq!(status, StatusCode::OK);
            }
        }));
    }
    for poster in posters {
        poster.await.unwrap();
    }

    assert_eq!(
        state.metrics.target_rate.get(),
        f64::from(state.config.target_rate())
    );
}

#[tokio::test]
async fn test_status_reports_target_and_current() {
    let state = state();
    let app = router(state.clone(), None);
    state.config.replace(LoadConfig::new("http://x", 2, 42));

    let (status, body) = send(&app, Method::GET, "/api/status", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"RequestPerSecondTarget": 42, "RequestPerSecondCurrent": 0})
    );
}

#[tokio::test]
async fn test_metrics_exposition() {
    let state = state();
    let app = router(state, None);
    let body = json!({"Url": "http://x", "Clients": 1, "RequestsPerSecondTarget": 7});
    send(&app, Method::POST, "/api/config", &body.to_string()).await;

    let (status, text) = send(&app, Method::GET, "/metrics", "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("requestsPerSecondTarget 7"), "{text}");
    assert!(text.contains("# TYPE requestCounter counter"), "{text}");
    assert!(text.contains("# TYPE runningClients gauge"), "{text}");
    assert!(text.contains("# TYPE requestDuration summary"), "{text}");
}

#[tokio::test]
async fn test_version() {
    let app = router(state(), None);
    let (status, text) = send(&app, Method::GET, "/version", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        text,
        format!("dynamic load generator {}", env!("CARGO_PKG_VERSION"))
    );
}

#[tokio::test]
async fn test_static_assets_fallback() {
    let dir = std::env::temp_dir().join(format!("loadgen-assets-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>load</h1>").unwrap();

    let app = router(state(), Some(dir.as_path()));
    let (status, body) = send(&app, Method::GET, "/index.html", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>load</h1>");

    let (status, _) = send(&app, Method::GET, "/missing.html", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // API routes still win over the fallback
    let (status, _) = send(&app, Method::GET, "/api/config", "").await;
    assert_eq!(status, StatusCode::OK);

    let _ = std::fs::remove_dir_all(&dir);
}
