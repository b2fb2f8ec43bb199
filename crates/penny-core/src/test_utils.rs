//! Test utilities for penny-core
//!
//! This module provides a mock completion server speaking both the
//! OpenAI-compatible and the Ollama wire formats, for exercising the real HTTP
//! backends in tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::ai::MockBackend;

#[derive(Clone)]
enum Behavior {
    /// Answer like `MockBackend::new()` would
    Scripted,
    Fixed(String),
    /// Respond with HTTP 500
    Fail,
    /// Answer like `Scripted`, after a delay
    Slow(Duration),
    /// Respond 200 with this raw body instead of a completion payload
    Malformed(String),
}

enum Outcome {
    Text(String),
    Raw(Response),
}

#[derive(Clone)]
struct MockState {
    behavior: Behavior,
    requests: Arc<AtomicUsize>,
}

/// Mock completion server for tests
pub struct MockCompletionServer {
    addr: SocketAddr,
    requests: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockCompletionServer {
    /// Start a server that answers based on the prompt it receives
    pub async fn start() -> Self {
        Self::spawn(Behavior::Scripted).await
    }

    /// Start a server that always answers with `text`
    pub async fn with_reply(text: &str) -> Self {
        Self::spawn(Behavior::Fixed(text.to_string())).await
    }

    /// Start a server that fails every completion with HTTP 500
    pub async fn failing() -> Self {
        Self::spawn(Behavior::Fail).await
    }

    /// Start a server that waits `delay` before every completion
    pub async fn slow(delay: Duration) -> Self {
        Self::spawn(Behavior::Slow(delay)).await
    }

    /// Start a server that answers every completion with HTTP 200 and `body`
    pub async fn malformed(body: &str) -> Self {
        Self::spawn(Behavior::Malformed(body.to_string())).await
    }

    async fn spawn(behavior: Behavior) -> Self {
        let requests = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            behavior,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/chat/completions", post(handle_chat_completions))
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .with_state(state);

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
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of completion requests received
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockCompletionServer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl MockState {
    async fn answer(&self, prompt: &str) -> Outcome {
        self.requests.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Scripted => Outcome::Text(MockBackend::scripted(prompt)),
            Behavior::Fixed(ref text) => Outcome::Text(text.clone()),
            Behavior::Fail => Outcome::Raw(
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": {"message": "mock failure"}})),
                )
                    .into_response(),
            ),
            Behavior::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Outcome::Text(MockBackend::scripted(prompt))
            }
            Behavior::Malformed(ref body) => Outcome::Raw(
                (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "application/json")],
                    body.clone(),
                )
                    .into_response(),
            ),
        }
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

async fn handle_models() -> Json<Value> {
    Json(json!({"object": "list", "data": [{"id": "mock-model", "object": "model"}]}))
}

async fn handle_chat_completions(
    State(state): State<MockState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let prompt = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    match state.answer(prompt).await {
        Outcome::Text(content) => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": request.model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        Outcome::Raw(resp) => resp,
    }
}

#[derive(Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

async fn handle_tags() -> Json<Value> {
    Json(json!({"models": [{"name": "llama3.2:latest", "size": 4_000_000_000u64}]}))
}

async fn handle_generate(
    State(state): State<MockState>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    match state.answer(&request.prompt).await {
        Outcome::Text(response) => Json(json!({
            "model": request.model,
            "response": response,
            "done": true
        }))
        .into_response(),
        Outcome::Raw(resp) => resp,
    }
}
