//! Agent chat proxy endpoint

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde_json::Value as JsonValue;

use crate::agent::ChatRequest;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// POST /api/agent/chat
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<JsonValue>, ApiError> {
    let reply = state.agent.chat(&req.messages).await?;
    Ok(Json(reply))
}

/// Agent routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/agent/chat", post(chat))
}
