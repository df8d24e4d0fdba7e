//! Mock per-model inference backend
//!
//! Serves `POST /models/{id}` with a canned response, optionally failing
//! the first `n` requests with a scripted error body.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

/// Canned success payload
enum Reply {
    Json(Value),
    Binary(Bytes, &'static str),
}

struct MockState {
    request_count: AtomicU32,
    /// Requests to fail before succeeding (0 = never fail)
    fail_count: AtomicU32,
    fail_status: StatusCode,
    fail_body: Value,
    reply: Reply,
}

/// Mock inference provider returning predictable responses
pub struct MockInference {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockInference {
    /// Start a mock that always answers with `reply`
    pub async fn returning(reply: Value) -> anyhow::Result<Self> {
        Self::start(Reply::Json(reply), 0, StatusCode::OK, Value::Null).await
    }

    /// Start a mock that always answers with raw bytes
    pub async fn returning_binary(bytes: Vec<u8>, content_type: &'static str) -> anyhow::Result<Self> {
        Self::start(Reply::Binary(Bytes::from(bytes), content_type), 0, StatusCode::OK, Value::Null).await
    }

    /// Start a mock that fails the first `n` requests with the given status
    /// and body, then answers with `reply`
    pub async fn failing_then(
        n: u32,
        fail_status: StatusCode,
        fail_body: Value,
        reply: Value,
    ) -> anyhow::Result<Self> {
        Self::start(Reply::Json(reply), n, fail_status, fail_body).await
    }

    async fn start(reply: Reply, fail_count: u32, fail_status: StatusCode, fail_body: Value) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            request_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
            fail_status,
            fail_body,
            reply,
        });

        let app = Router::new()
            .route("/models/{*model}", routing::post(handle_model))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the inference provider
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of model requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockInference {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_model(State(state): State<Arc<MockState>>, _body: Bytes) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let remaining = state.fail_count.load(Ordering::Relaxed);
    if remaining > 0 {
        state.fail_count.store(remaining - 1, Ordering::Relaxed);
        return (state.fail_status, axum::Json(state.fail_body.clone())).into_response();
    }

    match &state.reply {
        Reply::Json(value) => axum::Json(value.clone()).into_response(),
        Reply::Binary(bytes, content_type) => {
            ([(header::CONTENT_TYPE, *content_type)], bytes.clone()).into_response()
        }
    }
}
