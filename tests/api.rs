use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use pomodoro_widget::{
    create_router,
    state::{AppState, AppStateOptions},
    store::{FileStore, MemoryStore, SharedStateStore},
};

fn app_with(store: Arc<dyn SharedStateStore>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(
        store,
        AppStateOptions {
            port: 20554,
            host: "127.0.0.1".to_string(),
            widget_kind: "PomodoroWidget".to_string(),
            drift_tolerance: 5.0,
            fallback_refresh: Duration::from_secs(600),
        },
    ));
    (create_router(Arc::clone(&state)), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn update_then_query_reports_running_timer() {
    let (app, _) = app_with(Arc::new(MemoryStore::new("group.test")));

    let (status, body) = send(
        &app,
        "POST",
        "/widget/update",
        Some(json!({
            "secondsRemaining": 1500,
            "totalSeconds": 1500,
            "mode": "Work",
            "isRunning": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["snapshot"]["targetTimestamp"].as_f64().unwrap() > 0.0);

    let (status, state) = send(&app, "GET", "/widget/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state["isRunning"], true);
    assert_eq!(state["mode"], "Work");
    let remaining = state["secondsRemaining"].as_u64().unwrap();
    assert!(remaining <= 1500 && remaining >= 1495);
}

#[tokio::test]
async fn stopping_clears_target() {
    let (app, _) = app_with(Arc::new(MemoryStore::new("group.test")));

    send(
        &app,
        "POST",
        "/widget/update",
        Some(json!({"secondsRemaining": 900, "totalSeconds": 1500, "mode": "Work", "isRunning": true})),
    )
    .await;
    let (status, body) = send(
        &app,
        "POST",
        "/widget/update",
        Some(json!({"secondsRemaining": 880, "totalSeconds": 1500, "mode": "Work", "isRunning": false})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["targetTimestamp"], Value::Null);
    assert_eq!(body["snapshot"]["isRunning"], false);
}

#[tokio::test]
async fn malformed_update_is_bad_request() {
    let (app, state) = app_with(Arc::new(MemoryStore::new("group.test")));

    let (status, body) = send(
        &app,
        "POST",
        "/widget/update",
        Some(json!({"secondsRemaining": 10, "mode": "Work"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENTS");
    assert_eq!(state.writer.stored().unwrap(), None);
}

#[tokio::test]
async fn unparsable_body_is_bad_request() {
    let (app, _) = app_with(Arc::new(MemoryStore::new("group.test")));

    let request = Request::builder()
        .method("POST")
        .uri("/widget/update")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unlinked_container_is_service_unavailable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (app, _) = app_with(Arc::new(FileStore::new(dir.path(), "group.test")));

    let (status, body) = send(
        &app,
        "POST",
        "/widget/update",
        Some(json!({"secondsRemaining": 10, "totalSeconds": 60, "mode": "Short", "isRunning": true})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "UNAVAILABLE");

    let (status, state) = send(&app, "GET", "/widget/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state, Value::Null);

    let (_, status_body) = send(&app, "GET", "/status", None).await;
    assert_eq!(status_body["store_available"], false);
}

#[tokio::test]
async fn linked_file_store_round_trip() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = FileStore::new(dir.path(), "group.test");
    store.link().expect("link");
    let (app, _) = app_with(Arc::new(store));

    let (status, _) = send(
        &app,
        "POST",
        "/widget/update",
        Some(json!({"secondsRemaining": 300, "totalSeconds": 1500, "mode": "Eye Care", "isRunning": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A second process pointed at the same container sees the write.
    let (other, _) = app_with(Arc::new(FileStore::new(dir.path(), "group.test")));
    let (_, entry) = send(&other, "GET", "/widget/entry", None).await;
    assert_eq!(entry["entry"]["mode"], "Eye Care");
    assert_eq!(entry["clock"], "05:00");
    assert_eq!(entry["progress"], 0.8);
}

#[tokio::test]
async fn entry_without_data_shows_defaults() {
    let (app, _) = app_with(Arc::new(MemoryStore::new("group.test")));

    let (status, entry) = send(&app, "GET", "/widget/entry", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["entry"]["mode"], "Work");
    assert_eq!(entry["entry"]["isRunning"], false);
    assert_eq!(entry["clock"], "25:00");
    assert_eq!(entry["refreshAfter"], Value::Null);
}

#[tokio::test]
async fn reload_broadcasts_scoped_signal() {
    let (app, state) = app_with(Arc::new(MemoryStore::new("group.test")));
    let mut rx = state.refresh.subscribe();

    let (status, body) = send(&app, "POST", "/widget/reload?kind=PomodoroWidget", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "PomodoroWidget");
    assert!(rx.recv().await.unwrap().applies_to("PomodoroWidget"));

    let (_, status_body) = send(&app, "GET", "/status", None).await;
    assert_eq!(status_body["last_action"], "reload");
}

#[tokio::test]
async fn health_check() {
    let (app, _) = app_with(Arc::new(MemoryStore::new("group.test")));
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
