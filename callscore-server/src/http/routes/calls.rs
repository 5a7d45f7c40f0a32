//! Call listing and merged call detail

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use callscore_core::{merge_scores, MergedCallView};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{CallFilter, CallSummary};

/// GET /api/calls response
#[derive(Serialize)]
pub struct CallListResponse {
    pub count: usize,
    pub calls: Vec<CallSummary>,
}

/// GET /api/calls - filtered listing, newest first
async fn list_calls(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<CallFilter>,
) -> Result<Json<CallListResponse>, ApiError> {
    let calls = state.store.list_calls(&filter).await?;

    Ok(Json(CallListResponse {
        count: calls.len(),
        calls,
    }))
}

/// GET /api/calls/{call_id} - AI record with the human override merged in
async fn get_call(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<String>,
) -> Result<Json<MergedCallView>, ApiError> {
    let call = state
        .store
        .get_call(&call_id)
        .await?
        .ok_or_else(|| ApiError::not_found("call", &call_id))?;

    let human = state.store.get_evaluation(&call_id).await?;

    Ok(Json(merge_scores(&call, human.as_ref())))
}

/// Call routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/calls", get(list_calls))
        .route("/api/calls/{call_id}", get(get_call))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use serde_json::json;

    use callscore_core::{CallRecord, NewEvaluation, Scorecard};

    use crate::db::{AnalyticsStore, MemoryStore};
    use crate::http::routes::testing::{router, send};

    fn call(id: &str, day: u32, total: i64, rep: &str) -> CallRecord {
        let scorecard = Scorecard::from_value(
            id,
            json!({"greeting": {"score": 4, "notes": "ok"}, "empathy": {"score": 3}}),
        )
        .unwrap();
        let mut record = CallRecord::new(id, scorecard, Some(total));
        record.member_id = Some(format!("m-{id}"));
        record.call_date = NaiveDate::from_ymd_opt(2025, 3, day)
            .and_then(|d| d.and_hms_opt(14, 30, 0));
        record.call_center_rep_id = Some(rep.into());
        record
    }

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_calls([
            call("c-1", 1, 32, "ccr-1"),
            call("c-2", 5, 48, "ccr-2"),
            call("c-3", 9, 51, "ccr-1"),
        ]))
    }

    #[tokio::test]
    async fn unknown_call_is_404() {
        let app = router(store());

        let (status, body) = send(&app, "GET", "/api/calls/c-404", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_filtered() {
        let store = store();
        store
            .save_evaluation(
                "c-2",
                &NewEvaluation {
                    evaluator_name: "Dana".into(),
                    scorecard_overrides: Scorecard::new(),
                    total_score_override: None,
                    feedback_text: String::new(),
                },
            )
            .await
            .unwrap();
        let app = router(store);

        let (status, body) = send(&app, "GET", "/api/calls", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        let ids: Vec<&str> = body["calls"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["call_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["c-3", "c-2", "c-1"]);
        assert_eq!(body["calls"][1]["has_human_override"], true);
        assert!(body["calls"][0].get("scorecard").is_none());

        let (_, body) = send(
            &app,
            "GET",
            "/api/calls?min_score=40&end_date=2025-03-05&include_scorecard=true",
            None,
        )
        .await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["calls"][0]["call_id"], "c-2");
        assert_eq!(body["calls"][0]["scorecard"]["empathy"]["score"], 3);
    }

    #[tokio::test]
    async fn blank_filters_list_everything() {
        let app = router(store());

        let (status, body) = send(
            &app,
            "GET",
            "/api/calls?member_id=&start_date=&end_date=&call_center_rep_id=",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);

        let (status, body) = send(&app, "GET", "/api/calls?member_id=&min_score=50", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["calls"][0]["call_id"], "c-3");
    }

    #[tokio::test]
    async fn malformed_date_filter_is_400() {
        let app = router(store());

        let (status, _) = send(&app, "GET", "/api/calls?start_date=yesterday", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn detail_without_override_is_ai_view() {
        let app = router(store());

        let (status, body) = send(&app, "GET", "/api/calls/c-1", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["has_human_override"], false);
        assert_eq!(body["total_score"], 32);
        assert_eq!(body["scorecard"]["greeting"]["score"], 4);
        assert!(body.get("human_evaluation").is_none());
    }

    #[tokio::test]
    async fn detail_merges_saved_override() {
        let app = router(store());

        let (status, _) = send(
            &app,
            "POST",
            "/api/evaluations/c-1",
            Some(json!({
                "evaluator_name": "Dana",
                "scorecard_overrides": {"greeting": {"score": 5}},
                "total_score_override": 42,
                "feedback_text": "Warmer opening than the model credited"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/api/calls/c-1", None).await;

        assert_eq!(body["has_human_override"], true);
        assert_eq!(body["total_score"], 42);
        assert_eq!(body["scorecard"]["greeting"], json!({"score": 5, "notes": "ok"}));
        assert_eq!(body["scorecard"]["empathy"], json!({"score": 3}));
        assert_eq!(body["human_evaluation"]["evaluator_name"], "Dana");
    }
}
