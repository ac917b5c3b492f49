use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::{header::CONTENT_TYPE, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tower::ServiceExt;

use kiwidash::api::KiwiClient;
use kiwidash::models::{AppState, LookbackWindow};
use kiwidash::routes::build_router;
use kiwidash::services::{CredentialStore, MemoryStorage, Monitor, MonitorConfig};

/// Fake KiwiVM API counting every request it receives.
#[derive(Clone)]
struct Stub {
    hits: Arc<AtomicUsize>,
}

async fn stub_handler(State(stub): State<Stub>, uri: Uri) -> Response {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    match uri.path() {
        "/getLiveServiceInfo" => Json(live_info()).into_response(),
        "/getServiceInfo" => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
        "/start" => (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({"error": "Invalid API key"})),
        )
            .into_response(),
        "/stop" => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"status": "maintenance"})),
        )
            .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn live_info() -> serde_json::Value {
    serde_json::json!({
        "hostname": "vps1.example.com",
        "ve_status": "running",
        "suspended": false,
        "node_location": "US, Los Angeles",
        "plan_ram": 1073741824u64,
        "mem_available_kb": 524288u64,
    })
}

async fn spawn_upstream() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .fallback(stub_handler)
        .with_state(Stub { hits: hits.clone() });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), hits)
}

fn test_state(base_url: String) -> AppState {
    let client = KiwiClient::new(reqwest::Client::new(), base_url);
    let store = CredentialStore::open(Arc::new(MemoryStorage::default()));
    let monitor = Monitor::new(client, store, MonitorConfig::default());
    AppState {
        monitor,
        lookback: Arc::new(Mutex::new(LookbackWindow::default())),
        prefs_path: std::env::temp_dir()
            .join("kiwidash-test-prefs.json")
            .to_string_lossy()
            .into_owned(),
        flash_store: Arc::new(Mutex::new(Vec::new())),
        custom_css: None,
    }
}

async fn post_proxy(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/kiwivm")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn test_missing_credentials_rejected_before_upstream_call() {
    let (base, hits) = spawn_upstream().await;
    let app = build_router(test_state(base));

    let (status, body) = post_proxy(
        app,
        serde_json::json!({"veid": "", "api_key": "k", "action": "start"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VEID and API key are required");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_action_rejected_before_upstream_call() {
    let (base, hits) = spawn_upstream().await;
    let app = build_router(test_state(base));

    let (status, body) = post_proxy(
        app,
        serde_json::json!({"veid": "100", "api_key": "k", "action": "basicShell/exec"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid action specified");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_successful_response_relayed_unchanged() {
    let (base, hits) = spawn_upstream().await;
    let app = build_router(test_state(base));

    let (status, body) = post_proxy(
        app,
        serde_json::json!({"veid": "100", "api_key": "k", "action": "getLiveServiceInfo"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, live_info());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_non_json_upstream_error_wrapped_with_status_relayed() {
    let (base, _hits) = spawn_upstream().await;
    let app = build_router(test_state(base));

    // the stub answers getServiceInfo with a plain-text 500
    let (status, body) = post_proxy(
        app,
        serde_json::json!({"veid": "100", "api_key": "k", "action": "getServiceInfo"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let msg = body["error"].as_str().unwrap();
    assert!(msg.contains("internal error"), "got: {msg}");
}

#[tokio::test]
async fn test_structured_upstream_error_message_relayed() {
    let (base, _hits) = spawn_upstream().await;
    let app = build_router(test_state(base));

    let (status, body) = post_proxy(
        app,
        serde_json::json!({"veid": "100", "api_key": "bad", "action": "start"}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn test_structured_error_without_error_field_gets_generic_message() {
    let (base, _hits) = spawn_upstream().await;
    let app = build_router(test_state(base));

    let (status, body) = post_proxy(
        app,
        serde_json::json!({"veid": "100", "api_key": "k", "action": "stop"}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "KiwiVM API returned an error.");
}

#[tokio::test]
async fn test_action_defaults_to_get_service_info() {
    let (base, hits) = spawn_upstream().await;
    let app = build_router(test_state(base));

    let (status, _body) = post_proxy(
        app,
        serde_json::json!({"veid": "100", "api_key": "k"}),
    )
    .await;

    // the stub's getServiceInfo route answers 500, proving the default routed there
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transport_failure_yields_server_error_envelope() {
    // nothing listens on this port
    let app = build_router(test_state("http://127.0.0.1:9".to_string()));

    let (status, body) = post_proxy(
        app,
        serde_json::json!({"veid": "100", "api_key": "k", "action": "start"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Request failed"));
}
