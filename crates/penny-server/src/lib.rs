//! Penny Web Server
//!
//! Axum-based REST API for the Penny categorization and budgeting-advice
//! service. All endpoints are unauthenticated and stateless; the only shared
//! state is the categorizer and the advisor.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use penny_core::ai::{AIBackend, AIClient};
use penny_core::{Advisor, Categorizer, CategorizerConfig, ServiceConfig};

mod handlers;

/// Maximum transactions accepted by one batch request
pub const MAX_BATCH_SIZE: usize = 500;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = any origin)
    pub allowed_origins: Vec<String>,
}

impl From<&ServiceConfig> for ServerConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            allowed_origins: config.server.allowed_origins.clone(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub categorizer: Categorizer,
    pub advisor: Advisor,
}

impl AppState {
    pub fn new(ai: Option<AIClient>, config: &CategorizerConfig) -> Self {
        Self {
            categorizer: Categorizer::from_config(config, ai.clone()),
            advisor: Advisor::new(ai),
        }
    }

    /// Build state from service configuration, creating the AI client
    pub fn from_config(config: &ServiceConfig) -> Self {
        let ai = AIClient::from_config(&config.ai);
        match ai {
            Some(ref client) => info!(
                "AI backend configured: {} (model: {})",
                client.host(),
                client.model()
            ),
            None => info!(
                "ℹ️  AI backend not configured (set OPENAI_COMPATIBLE_HOST or OLLAMA_HOST to enable the remote tier)"
            ),
        }
        Self::new(ai, &config.categorizer)
    }
}

/// Create the application router
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let state = Arc::new(state);

    let ml_routes = Router::new()
        .route("/categorize", post(handlers::categorize))
        .route("/categorize/batch", post(handlers::categorize_batch))
        .route("/categories", get(handlers::list_categories))
        .route("/audit", post(handlers::audit))
        .route("/chat", post(handlers::chat));

    let cors = if config.allowed_origins.is_empty() {
        // Browser frontends are served from other origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/ml", ml_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config);

    // Check AI backend connection
    if let Some(ai) = state.categorizer.ai() {
        ai.log_status().await;
    }

    let app = create_router(state, &ServerConfig::from(&config));
    let addr = format!("{}:{}", config.server.host, config.server.port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}
