//! Human evaluation overrides
//!
//! A reviewer may correct the AI scorecard for a call. Corrections are kept
//! separately from the AI scores, one record per call id.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scorecard::Scorecard;
use crate::validation::ValidationError;

/// Maximum evaluator name length
pub const MAX_EVALUATOR_NAME_LEN: usize = 256;

/// Valid range for a total score override
pub const TOTAL_SCORE_RANGE: std::ops::RangeInclusive<i32> = 0..=60;

/// Stored override record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanEvaluation {
    pub evaluation_id: i32,
    pub call_id: String,
    pub evaluator_name: Option<String>,
    pub evaluation_date: Option<NaiveDateTime>,
    pub scorecard_overrides: Scorecard,
    pub total_score_override: Option<i32>,
    pub feedback_text: Option<String>,
}

/// POST body for creating or replacing an override
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub evaluator_name: String,
    pub scorecard_overrides: Value,
    #[serde(default)]
    pub total_score_override: Option<i32>,
    #[serde(default)]
    pub feedback_text: Option<String>,
}

/// Validated override ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvaluation {
    pub evaluator_name: String,
    pub scorecard_overrides: Scorecard,
    pub total_score_override: Option<i32>,
    pub feedback_text: String,
}

impl EvaluationRequest {
    /// Validate the request into a [`NewEvaluation`].
    pub fn validate(self) -> Result<NewEvaluation, ValidationError> {
        let evaluator_name = self.evaluator_name.trim().to_owned();
        if evaluator_name.is_empty() {
            return Err(ValidationError::Empty {
                field: "evaluator_name",
            });
        }
        if evaluator_name.chars().count() > MAX_EVALUATOR_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "evaluator_name",
                max: MAX_EVALUATOR_NAME_LEN,
            });
        }

        let scorecard_overrides = match self.scorecard_overrides {
            Value::Object(map) => Scorecard::from_map(map),
            _ => {
                return Err(ValidationError::InvalidFormat {
                    field: "scorecard_overrides",
                    reason: "must be a JSON object",
                })
            }
        };

        if let Some(total) = self.total_score_override {
            if !TOTAL_SCORE_RANGE.contains(&total) {
                return Err(ValidationError::OutOfRange {
                    field: "total_score_override",
                    min: i64::from(*TOTAL_SCORE_RANGE.start()),
                    max: i64::from(*TOTAL_SCORE_RANGE.end()),
                    value: i64::from(total),
                });
            }
        }

        Ok(NewEvaluation {
            evaluator_name,
            scorecard_overrides,
            total_score_override: self.total_score_override,
            feedback_text: self.feedback_text.unwrap_or_default(),
        })
    }
}
