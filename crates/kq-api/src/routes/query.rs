//! Natural-language query endpoint.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// The question, echoed back unmodified.
    pub query: String,
    pub answer: String,
}

/// POST /api/v1/query — interpret a free-text cluster question and answer it.
///
/// Only two failure shapes reach the client: a malformed body (400) and an
/// interpretation failure (500). Everything downstream of interpretation is
/// an answer, including cluster faults.
pub async fn handle_query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> ApiResult<Json<QueryResponse>> {
    let Json(request) =
        payload.map_err(|_| ApiError::BadRequest("Invalid request format".into()))?;

    tracing::info!(query = %request.query, "received query");

    let raw = state
        .interpreter
        .interpret(&request.query)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "query interpretation failed");
            ApiError::Internal("An error occurred while processing your request.".into())
        })?;

    let answer = state.dispatcher.answer(&request.query, raw).await;
    tracing::info!(answer_len = answer.len(), "query answered");

    Ok(Json(QueryResponse {
        query: request.query,
        answer,
    }))
}
