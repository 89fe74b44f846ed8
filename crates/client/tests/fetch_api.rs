//! HTTP-level tests for the widget endpoint client.
//!
//! Each test serves a small axum router on an ephemeral local port and
//! points a [`WidgetApi`] at it.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use proofwall_client::WidgetApi;
use proofwall_core::source::TestimonialSource;
use proofwall_core::{FetchOutcome, WidgetError};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serve `app` on 127.0.0.1 and return its origin.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });
    format!("http://{addr}")
}

async fn widget(Path(workspace_id): Path<String>) -> impl IntoResponse {
    match workspace_id.as_str() {
        "ws1" => (
            StatusCode::OK,
            Json(json!({
                "testimonials": [{
                    "id": "t1",
                    "name": "Jane Doe",
                    "rating": 5,
                    "testimonial": "Great!",
                    "submissionType": "TEXT"
                }],
                "showBadge": true
            })),
        ),
        "empty" => (
            StatusCode::OK,
            Json(json!({ "testimonials": [], "showBadge": false })),
        ),
        "broken" => (StatusCode::OK, Json(json!({ "unexpected": 1 }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))),
    }
}

fn app() -> Router {
    Router::new().route("/api/widget/{workspace_id}", get(widget))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn loads_testimonials() {
    let origin = serve(app()).await;
    let api = WidgetApi::new(origin).unwrap();

    let outcome = api.fetch("ws1").await;
    let FetchOutcome::Loaded(payload) = outcome else {
        panic!("Expected Loaded, got {outcome:?}");
    };
    assert!(payload.show_badge);
    assert_eq!(payload.testimonials[0].name, "Jane Doe");
}

#[tokio::test]
async fn empty_workspace_is_distinct_from_failure() {
    let origin = serve(app()).await;
    let api = WidgetApi::new(origin).unwrap();
    assert_eq!(api.fetch("empty").await, FetchOutcome::Empty);
}

#[tokio::test]
async fn not_found_is_network_failure() {
    let origin = serve(app()).await;
    let api = WidgetApi::new(origin).unwrap();
    assert_matches!(
        api.fetch("missing").await,
        FetchOutcome::Failed(WidgetError::Network(msg)) if msg == "HTTP 404"
    );
}

#[tokio::test]
async fn unexpected_shape_is_malformed() {
    let origin = serve(app()).await;
    let api = WidgetApi::new(origin).unwrap();
    assert_matches!(
        api.fetch("broken").await,
        FetchOutcome::Failed(WidgetError::MalformedResponse(_))
    );
}

#[tokio::test]
async fn error_body_with_ok_status_is_failure() {
    let app = Router::new().route(
        "/api/widget/{workspace_id}",
        get(|| async { Json(json!({ "error": "not found" })) }),
    );
    let origin = serve(app).await;
    let api = WidgetApi::new(origin).unwrap();
    assert_matches!(api.fetch("ws1").await, FetchOutcome::Failed(_));
}

#[tokio::test]
async fn issues_exactly_one_request_without_retry() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route(
            "/api/widget/{workspace_id}",
            get(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                StatusCode::INTERNAL_SERVER_ERROR
            }),
        )
        .with_state(hits.clone());
    let origin = serve(app).await;
    let api = WidgetApi::new(origin).unwrap();

    assert_matches!(api.fetch("ws1").await, FetchOutcome::Failed(_));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let app = Router::new().route(
        "/api/widget/{workspace_id}",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }),
    );
    let origin = serve(app).await;
    let api = WidgetApi::with_timeout(origin, Duration::from_millis(100)).unwrap();
    assert_matches!(
        api.fetch("ws1").await,
        FetchOutcome::Failed(WidgetError::Network(_))
    );
}

#[tokio::test]
async fn unreachable_origin_is_network_failure() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = WidgetApi::new(format!("http://{addr}")).unwrap();
    assert_matches!(
        api.fetch("ws1").await,
        FetchOutcome::Failed(WidgetError::Network(_))
    );
}
