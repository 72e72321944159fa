//! Test utilities for fdinsights-core
//!
//! A mock model server speaking both the Ollama and the OpenAI-compatible
//! protocols, so backends can be exercised over real HTTP.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::oneshot;

/// Canned insights returned in [`MockReply::Insights`] mode
pub const MOCK_INSIGHTS: &str = "Small finance banks often pay 1-2% more than large banks \
on FDs of this tenure. A 5-year tax-saver FD qualifies for Section 80C. Interest is taxed at \
your slab rate; submit Form 15G/15H if your income is below the taxable limit.";

/// What the mock server replies with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockReply {
    /// `{"insights": "..."}`
    #[default]
    Insights,
    /// `{"insights": ""}`
    Empty,
    /// Text that is not JSON
    Malformed,
    /// HTTP 500 on generation endpoints
    ServerError,
    /// Insights, but only after the given delay
    Delayed(Duration),
}

struct MockState {
    reply: MockReply,
    requests: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

/// Mock model server for tests
pub struct MockModelServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockModelServer {
    /// Start a server that returns insights
    pub async fn start() -> Self {
        Self::start_with(MockReply::Insights).await
    }

    /// Start the mock server on an available port
    pub async fn start_with(reply: MockReply) -> Self {
        let state = Arc::new(MockState {
            reply,
            requests: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        });

        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of generation requests received
    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    /// User prompt of the most recent generation request
    pub fn last_prompt(&self) -> Option<String> {
        self.state.last_prompt.lock().unwrap().clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockModelServer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl MockState {
    fn record(&self, prompt: String) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt);
    }

    /// Model text for the configured reply, or None for an HTTP error
    async fn model_text(&self) -> Option<String> {
        match self.reply {
            MockReply::Insights => Some(json!({ "insights": MOCK_INSIGHTS }).to_string()),
            MockReply::Delayed(delay) => {
                tokio::time::sleep(delay).await;
                Some(json!({ "insights": MOCK_INSIGHTS }).to_string())
            }
            MockReply::Empty => Some(json!({ "insights": "" }).to_string()),
            MockReply::Malformed => Some("I'm sorry, I can't produce JSON today.".to_string()),
            MockReply::ServerError => None,
        }
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "model crashed" })),
    )
        .into_response()
}

async fn handle_tags() -> Json<serde_json::Value> {
    Json(json!({
        "models": [{
            "name": "llama3.2:latest",
            "modified_at": "2024-01-01T00:00:00Z",
            "size": 4_000_000_000u64
        }]
    }))
}

async fn handle_models() -> Json<serde_json::Value> {
    Json(json!({
        "object": "list",
        "data": [{ "id": "llama3.2", "object": "model" }]
    }))
}

#[derive(Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

async fn handle_generate(
    State(state): State<Arc<MockState>>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    state.record(request.prompt);
    match state.model_text().await {
        Some(response) => Json(json!({
            "model": request.model,
            "response": response,
            "done": true
        }))
        .into_response(),
        None => server_error(),
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

async fn handle_chat(
    State(state): State<Arc<MockState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let prompt = request
        .messages
        .into_iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content)
        .unwrap_or_default();
    state.record(prompt);

    match state.model_text().await {
        Some(content) => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": request.model,
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        None => server_error(),
    }
}
