//! AI-scored call records

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::scorecard::Scorecard;

/// A call as produced by the automated quality assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub call_id: String,
    pub member_id: Option<String>,
    pub call_date: Option<NaiveDateTime>,
    pub transcript: Option<String>,
    pub scorecard: Scorecard,
    pub total_score: Option<i64>,
    pub call_center_rep_id: Option<String>,
    pub transcript_summary: Option<String>,
}

impl CallRecord {
    /// Minimal record, mostly useful for tests and demo data
    pub fn new(call_id: impl Into<String>, scorecard: Scorecard, total_score: Option<i64>) -> Self {
        Self {
            call_id: call_id.into(),
            member_id: None,
            call_date: None,
            transcript: None,
            scorecard,
            total_score,
            call_center_rep_id: None,
            transcript_summary: None,
        }
    }
}
