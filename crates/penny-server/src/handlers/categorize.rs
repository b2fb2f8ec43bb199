//! Categorization handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppError, AppState, MAX_BATCH_SIZE};
use penny_core::{CategorizationResult, KeywordCategory, Transaction, DEFAULT_CATEGORY, REMOTE_CATEGORIES};

/// Merchant and amount, from either the query string or a JSON body
#[derive(Debug, Default, Deserialize)]
pub struct CategorizeParams {
    pub merchant: Option<String>,
    pub amount: Option<f64>,
}

/// POST /api/ml/categorize - Categorize a single transaction
///
/// Query parameters take precedence over body fields.
pub async fn categorize(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategorizeParams>,
    body: Option<Json<CategorizeParams>>,
) -> Result<Json<CategorizationResult>, AppError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let merchant = query
        .merchant
        .or(body.merchant)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("merchant is required"))?;
    let amount = query.amount.or(body.amount).unwrap_or(0.0);

    let result = state.categorizer.categorize(&merchant, amount).await;
    debug!(
        merchant = %merchant,
        category = %result.category,
        confidence = result.confidence,
        "Categorized transaction"
    );

    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub results: Vec<CategorizationResult>,
}

/// POST /api/ml/categorize/batch - Categorize many transactions in order
pub async fn categorize_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>, AppError> {
    if request.transactions.len() > MAX_BATCH_SIZE {
        return Err(AppError::bad_request(&format!(
            "at most {} transactions per batch",
            MAX_BATCH_SIZE
        )));
    }
    if request
        .transactions
        .iter()
        .any(|tx| tx.merchant.trim().is_empty())
    {
        return Err(AppError::bad_request("every transaction needs a merchant"));
    }

    let results = state
        .categorizer
        .categorize_batch(&request.transactions)
        .await;

    Ok(Json(BatchResponse { results }))
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    /// Keyword table in match priority order
    pub keywords: Vec<KeywordCategory>,
    /// Labels the remote model may answer with
    pub vocabulary: Vec<&'static str>,
    pub default: &'static str,
    pub strict_labels: bool,
}

/// GET /api/ml/categories - List both category vocabularies
pub async fn list_categories(State(state): State<Arc<AppState>>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        keywords: state.categorizer.table().categories().to_vec(),
        vocabulary: REMOTE_CATEGORIES.to_vec(),
        default: DEFAULT_CATEGORY,
        strict_labels: state.categorizer.is_strict(),
    })
}
