//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Backend failures surface their underlying message; this is an internal
//! analytics tool.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use callscore_core::ValidationError;

use crate::agent::AgentError;
use crate::db::DbError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Credential, connection, or query failure (500, logged)
    Database(DbError),

    /// Agent proxy failure (upstream status, or 500)
    Agent(AgentError),
}

impl ApiError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Agent(AgentError::Upstream { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Agent(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, message) = match &self {
            Self::Validation(e) => ("validation_error", e.to_string()),
            Self::NotFound { resource, id } => {
                ("not_found", format!("{} '{}' not found", resource, id))
            }
            Self::Database(e) => {
                tracing::error!("Database error: {}", e);
                ("internal_error", e.to_string())
            }
            Self::Agent(e) => {
                tracing::error!("Agent error: {}", e);
                ("upstream_error", e.to_string())
            }
        };

        let body = json!({
            "error": kind,
            "message": message
        });

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}

impl From<AgentError> for ApiError {
    fn from(e: AgentError) -> Self {
        Self::Agent(e)
    }
}
