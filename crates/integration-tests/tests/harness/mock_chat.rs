//! Mock chat-completion gateway
//!
//! Serves `POST /chat/completions`, recording the last request body so
//! tests can assert on prompt construction.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// How the mock answers completions
enum Behavior {
    /// 200 with the given assistant message content
    Reply(String),
    /// 401 with an OpenAI-style error body
    Unauthorized,
    /// 200 with no choices
    EmptyChoices,
}

struct MockState {
    request_count: AtomicU32,
    last_request: Mutex<Option<Value>>,
    behavior: Behavior,
}

/// Mock chat gateway returning predictable completions
pub struct MockChat {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockChat {
    /// Start a mock that completes every request with `content`
    pub async fn replying(content: &str) -> anyhow::Result<Self> {
        Self::start(Behavior::Reply(content.to_owned())).await
    }

    /// Start a mock that rejects every request with 401
    pub async fn unauthorized() -> anyhow::Result<Self> {
        Self::start(Behavior::Unauthorized).await
    }

    /// Start a mock that answers 200 with an empty choice list
    pub async fn empty_choices() -> anyhow::Result<Self> {
        Self::start(Behavior::EmptyChoices).await
    }

    async fn start(behavior: Behavior) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            request_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
            behavior,
        });

        let app = Router::new()
            .route("/chat/completions", routing::post(handle_completions))
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

    /// Base URL for configuring the mock as the chat gateway
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of completion requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// The most recent request body, if any
    pub fn last_request(&self) -> Option<Value> {
        self.state.last_request.lock().ok()?.clone()
    }
}

impl Drop for MockChat {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_completions(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    if let Ok(mut last) = state.last_request.lock() {
        *last = Some(body);
    }

    match &state.behavior {
        Behavior::Reply(content) => Json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
        .into_response(),
        Behavior::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Invalid API key", "code": 401}})),
        )
            .into_response(),
        Behavior::EmptyChoices => Json(json!({"choices": []})).into_response(),
    }
}
