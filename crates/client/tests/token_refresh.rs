//! Token refresh behavior against an in-process stub backend.
//!
//! The stub accepts exactly one access token and counts refresh calls,
//! which lets these tests pin the single-flight property: many requests
//! observing the same expired token produce exactly one refresh.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use meridian_client::{AuthTokens, Client, ClientConfig};

const FRESH_ACCESS: &str = "fresh-access-token";
const STALE_ACCESS: &str = "stale-access-token";
const INITIAL_REFRESH: &str = "refresh-token-1";
const ROTATED_REFRESH: &str = "refresh-token-2";

struct Stub {
    refresh_calls: AtomicUsize,
    /// When false, the refresh endpoint rejects everything.
    allow_refresh: bool,
}

fn bearer(headers: &HeaderMap) -> &str {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("")
}

fn cart_body() -> serde_json::Value {
    json!({
        "data": {
            "id": 1,
            "items": [],
            "totals": {
                "subtotal": { "amount": "0.00", "currency": "INR" },
                "tax": { "amount": "0.00", "currency": "INR" },
                "shipping": { "amount": "0.00", "currency": "INR" },
                "grand_total": { "amount": "0.00", "currency": "INR" }
            }
        }
    })
}

async fn get_cart(headers: HeaderMap) -> Response {
    if bearer(&headers) == FRESH_ACCESS {
        Json(cart_body()).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "access token expired" })),
        )
            .into_response()
    }
}

async fn refresh(State(stub): State<Arc<Stub>>, Json(body): Json<serde_json::Value>) -> Response {
    stub.refresh_calls.fetch_add(1, Ordering::SeqCst);

    // Widen the race window so concurrent 401s actually queue on the gate.
    tokio::time::sleep(Duration::from_millis(50)).await;

    if !stub.allow_refresh || body["refresh_token"] != INITIAL_REFRESH {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "refresh token revoked" })),
        )
            .into_response();
    }

    Json(json!({
        "data": {
            "access_token": FRESH_ACCESS,
            "refresh_token": ROTATED_REFRESH,
            "expires_in": 900
        }
    }))
    .into_response()
}

async fn list_products() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": "search query too long" })),
    )
        .into_response()
}

async fn start_stub(allow_refresh: bool) -> (SocketAddr, Arc<Stub>) {
    let stub = Arc::new(Stub {
        refresh_calls: AtomicUsize::new(0),
        allow_refresh,
    });

    let app = Router::new()
        .route("/cart", get(get_cart))
        .route("/auth/refresh", post(refresh))
        .route("/products", get(list_products))
        .with_state(Arc::clone(&stub));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });

    (addr, stub)
}

fn client_for(addr: SocketAddr, access: &str) -> Client {
    let base_url = format!("http://{addr}").parse().expect("valid base url");
    Client::with_tokens(
        ClientConfig::new(base_url),
        AuthTokens::new(access.to_owned(), INITIAL_REFRESH.to_owned(), Some(900)),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_requests_refresh_exactly_once() {
    let (addr, stub) = start_stub(true).await;
    let client = client_for(addr, STALE_ACCESS);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move { client.cart().get().await }));
    }

    for handle in handles {
        let cart = handle
            .await
            .expect("task join")
            .expect("cart fetch after refresh");
        assert!(cart.is_empty());
    }

    assert_eq!(
        stub.refresh_calls.load(Ordering::SeqCst),
        1,
        "all queued requests must replay off a single refresh"
    );

    // The rotated pair is now held for session persistence.
    let tokens = client.tokens().expect("tokens held");
    assert_eq!(tokens.access_token, FRESH_ACCESS);
    assert_eq!(tokens.refresh_token, ROTATED_REFRESH);
    assert_eq!(client.token_generation(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn second_expired_token_refreshes_again() {
    let (addr, stub) = start_stub(true).await;
    let client = client_for(addr, STALE_ACCESS);

    client.cart().get().await.expect("first fetch");
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);

    // A fresh token means no further refresh traffic.
    client.cart().get().await.expect("second fetch");
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_refresh_clears_credentials() {
    let (addr, stub) = start_stub(false).await;
    let client = client_for(addr, STALE_ACCESS);

    let err = client.cart().get().await.expect_err("refresh must fail");
    assert!(
        matches!(err, meridian_client::ApiError::SessionExpired),
        "got: {err:?}"
    );
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
    assert!(client.tokens().is_none(), "credentials must be dropped");

    // With the pair gone, later requests go out tokenless and surface
    // the backend's 401 without attempting another refresh.
    let err = client.cart().get().await.expect_err("still signed out");
    assert!(matches!(
        err,
        meridian_client::ApiError::Status { status: 401, .. }
    ));
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn backend_error_message_is_surfaced() {
    let (addr, _stub) = start_stub(true).await;
    let client = client_for(addr, FRESH_ACCESS);

    let err = client
        .catalog()
        .list_products(&meridian_client::services::ProductFilter::default())
        .await
        .expect_err("listing is rigged to fail");

    match err {
        meridian_client::ApiError::Status { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "search query too long");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}
