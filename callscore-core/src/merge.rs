//! Merged call view: AI scores with the human override applied

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::call::CallRecord;
use crate::evaluation::HumanEvaluation;
use crate::scorecard::Scorecard;

/// Externally visible call record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedCallView {
    pub call_id: String,
    pub member_id: Option<String>,
    pub call_date: Option<NaiveDateTime>,
    pub transcript: Option<String>,
    pub scorecard: Scorecard,
    pub total_score: Option<i64>,
    pub call_center_rep_id: Option<String>,
    pub transcript_summary: Option<String>,
    pub has_human_override: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_evaluation: Option<HumanEvaluationMeta>,
}

/// Override metadata attached to a merged view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumanEvaluationMeta {
    pub evaluator_name: Option<String>,
    pub evaluation_date: Option<String>,
    pub feedback_text: Option<String>,
    pub scorecard_overrides: Scorecard,
    pub total_score_override: Option<i32>,
}

impl From<&HumanEvaluation> for HumanEvaluationMeta {
    fn from(eval: &HumanEvaluation) -> Self {
        Self {
            evaluator_name: eval.evaluator_name.clone(),
            evaluation_date: eval.evaluation_date.map(|d| d.to_string()),
            feedback_text: eval.feedback_text.clone(),
            scorecard_overrides: eval.scorecard_overrides.clone(),
            total_score_override: eval.total_score_override,
        }
    }
}

/// Combine an AI record with its optional human override.
///
/// Without an override the AI scorecard and total are returned as-is. With
/// one, the override scorecard is deep-merged over a copy of the AI
/// scorecard and a present `total_score_override` replaces the AI total.
pub fn merge_scores(ai: &CallRecord, human: Option<&HumanEvaluation>) -> MergedCallView {
    let (scorecard, total_score, human_evaluation) = match human {
        None => (ai.scorecard.clone(), ai.total_score, None),
        Some(eval) => (
            ai.scorecard.merged_with(&eval.scorecard_overrides),
            eval.total_score_override
                .map(i64::from)
                .or(ai.total_score),
            Some(HumanEvaluationMeta::from(eval)),
        ),
    };

    MergedCallView {
        call_id: ai.call_id.clone(),
        member_id: ai.member_id.clone(),
        call_date: ai.call_date,
        transcript: ai.transcript.clone(),
        scorecard,
        total_score,
        call_center_rep_id: ai.call_center_rep_id.clone(),
        transcript_summary: ai.transcript_summary.clone(),
        has_human_override: human_evaluation.is_some(),
        human_evaluation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    fn ai_record() -> CallRecord {
        let scorecard = Scorecard::from_value("call-1", json!({"a": {"b": 1, "c": 2}, "d": 3})).unwrap();
        CallRecord {
            member_id: Some("m-100".into()),
            call_center_rep_id: Some("ccr-7".into()),
            ..CallRecord::new("call-1", scorecard, Some(30))
        }
    }

    fn evaluation(total: Option<i32>) -> HumanEvaluation {
        HumanEvaluation {
            evaluation_id: 1,
            call_id: "call-1".into(),
            evaluator_name: Some("Dana".into()),
            evaluation_date: NaiveDate::from_ymd_opt(2024, 5, 1)
                .and_then(|d| d.and_hms_opt(9, 30, 0)),
            scorecard_overrides: Scorecard::from_value("call-1", json!({"a": {"b": 5}})).unwrap(),
            total_score_override: total,
            feedback_text: Some("closing was rushed".into()),
        }
    }

    #[test]
    fn absent_override_returns_ai_values() {
        let ai = ai_record();
        let view = merge_scores(&ai, None);

        assert!(!view.has_human_override);
        assert!(view.human_evaluation.is_none());
        assert_eq!(view.scorecard, ai.scorecard);
        assert_eq!(view.total_score, Some(30));
    }

    #[test]
    fn override_without_total_keeps_ai_total() {
        let view = merge_scores(&ai_record(), Some(&evaluation(None)));

        assert!(view.has_human_override);
        assert_eq!(view.total_score, Some(30));
        assert_eq!(Value::from(view.scorecard), json!({"a": {"b": 5, "c": 2}, "d": 3}));
    }

    #[test]
    fn override_total_replaces_ai_total() {
        let view = merge_scores(&ai_record(), Some(&evaluation(Some(42))));
        assert_eq!(view.total_score, Some(42));
    }

    #[test]
    fn metadata_block_carries_raw_overrides() {
        let view = merge_scores(&ai_record(), Some(&evaluation(Some(0))));
        let meta = view.human_evaluation.unwrap();

        assert_eq!(meta.evaluator_name.as_deref(), Some("Dana"));
        assert_eq!(meta.evaluation_date.as_deref(), Some("2024-05-01 09:30:00"));
        assert_eq!(meta.feedback_text.as_deref(), Some("closing was rushed"));
        assert_eq!(meta.total_score_override, Some(0));
        assert_eq!(Value::from(meta.scorecard_overrides), json!({"a": {"b": 5}}));
        assert_eq!(view.total_score, Some(0));
    }

    #[test]
    fn merge_leaves_ai_record_untouched() {
        let ai = ai_record();
        let before = ai.clone();

        let _ = merge_scores(&ai, Some(&evaluation(Some(42))));

        assert_eq!(ai, before);
    }

    #[test]
    fn serialized_view_omits_absent_metadata() {
        let body = serde_json::to_value(merge_scores(&ai_record(), None)).unwrap();

        assert_eq!(body["has_human_override"], json!(false));
        assert!(body.get("human_evaluation").is_none());
        assert_eq!(body["scorecard"]["d"], json!(3));
    }
}
