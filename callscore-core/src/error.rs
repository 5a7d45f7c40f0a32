//! Structured error types for callscore-core.
//!
//! Library consumers get `thiserror` enums; the CLI wraps them in `anyhow`.

use thiserror::Error;

/// Main error type for callscore-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Stored scorecard JSON could not be parsed
    #[error("Malformed scorecard for call '{call_id}': {reason}")]
    MalformedScorecard { call_id: String, reason: String },
}

/// Result type alias for callscore-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a malformed scorecard error
    pub fn malformed_scorecard(call_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedScorecard {
            call_id: call_id.into(),
            reason: reason.into(),
        }
    }
}
