use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use sacred_timer::{
    api::create_router,
    services::SoundCues,
    state::AppState,
    tasks::ManualTicker,
    utils::ManualClock,
};

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    clock: ManualClock,
    ticker: ManualTicker,
}

fn test_app(duration_ms: u64) -> TestApp {
    let clock = ManualClock::new(5_000_000);
    let ticker = ManualTicker::new();
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        duration_ms,
        Arc::new(clock.clone()),
        Box::new(ticker.clone()),
        SoundCues::silent(),
    ));
    TestApp {
        router: create_router(Arc::clone(&state)),
        state,
        clock,
        ticker,
    }
}

async fn call(app: &TestApp, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app(60_000);
    let (status, body) = call(&app, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn toggle_starts_then_pauses() {
    let app = test_app(60_000);

    let (status, body) = call(&app, "POST", "/toggle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["display"]["status_text"], "光圈正在收斂");
    assert_eq!(body["timer"]["display"]["toggle_label"], "暫停");
    assert_eq!(app.ticker.active_loops().len(), 1);

    let (_, body) = call(&app, "POST", "/toggle").await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["display"]["toggle_label"], "開始");
    assert!(app.ticker.active_loops().is_empty());
}

#[tokio::test]
async fn repeated_start_keeps_one_loop() {
    let app = test_app(60_000);
    call(&app, "POST", "/start").await;
    call(&app, "POST", "/start").await;
    assert_eq!(app.ticker.active_loops().len(), 1);
}

#[tokio::test]
async fn preset_then_run_to_completion() {
    let app = test_app(60_000);

    let (_, body) = call(&app, "POST", "/preset/30").await;
    assert_eq!(body["timer"]["configured_ms"], 30_000);
    assert_eq!(body["timer"]["remaining_ms"], 30_000);
    assert_eq!(body["timer"]["display"]["time_text"], "00:30");

    call(&app, "POST", "/start").await;
    let loop_id = app.ticker.active_loops()[0];

    app.clock.advance(31_000);
    app.state.tick(loop_id).unwrap();

    let (status, body) = call(&app, "GET", "/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "ended");
    assert_eq!(body["timer"]["remaining_ms"], 0);
    assert_eq!(body["timer"]["warned"], false);
    assert_eq!(body["last_action"], "start");

    let (_, frame) = call(&app, "GET", "/display").await;
    assert_eq!(frame["time_text"], "00:00");
    assert_eq!(frame["status_text"], "時間到了，請給自己一個深呼吸 ✨");
    assert_eq!(frame["ring_fraction"], 1.0);
}

#[tokio::test]
async fn adjust_accepts_negative_and_floors() {
    let app = test_app(5_000);

    let (status, body) = call(&app, "POST", "/adjust/-10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remaining_ms"], 0);
    assert_eq!(body["timer"]["configured_ms"], 0);
    assert_eq!(body["timer"]["display"]["status_text"], "時間已微調");

    let (_, body) = call(&app, "POST", "/adjust/90").await;
    assert_eq!(body["timer"]["remaining_ms"], 90_000);
    assert_eq!(body["timer"]["display"]["time_text"], "01:30");
}

#[tokio::test]
async fn reset_restores_configured_duration() {
    let app = test_app(90_000);
    call(&app, "POST", "/start").await;
    let loop_id = app.ticker.active_loops()[0];
    app.clock.advance(45_000);
    app.state.tick(loop_id).unwrap();

    let (_, body) = call(&app, "GET", "/status").await;
    assert_eq!(body["timer"]["warned"], true);

    let (_, body) = call(&app, "POST", "/reset").await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["remaining_ms"], 90_000);
    assert_eq!(body["timer"]["warned"], false);
    assert_eq!(body["timer"]["display"]["status_text"], "回到起點，重新開始");
}

#[tokio::test]
async fn malformed_seconds_are_rejected() {
    let app = test_app(60_000);
    let (status, _) = call(&app, "POST", "/preset/soon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
