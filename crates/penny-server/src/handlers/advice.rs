//! Budgeting advice handlers (audit and chat)

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{AppError, AppState};
use penny_core::advisor::MAX_CHAT_CONTEXT;
use penny_core::{AuditReport, ChatReply, Error, Expense};

#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

/// POST /api/ml/audit - Review spending and return insights
pub async fn audit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuditRequest>,
) -> Json<AuditReport> {
    Json(state.advisor.audit(&request.expenses).await)
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Recent expenses; only the first 100 are used
    #[serde(default)]
    pub context: Vec<Expense>,
}

/// POST /api/ml/chat - Answer a question about the user's spending
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    if request.context.len() > MAX_CHAT_CONTEXT {
        tracing::debug!(
            received = request.context.len(),
            "Truncating chat context to {}",
            MAX_CHAT_CONTEXT
        );
    }

    match state.advisor.chat(&request.message, &request.context).await {
        Ok(reply) => Ok(Json(reply)),
        Err(Error::InvalidData(msg)) => Err(AppError::bad_request(&msg)),
        Err(e) => Err(e.into()),
    }
}
