//! Human evaluation (override) endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use callscore_core::{EvaluationRequest, HumanEvaluation, Scorecard};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Stored override as returned to clients
#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub evaluation_id: i32,
    pub call_id: String,
    pub evaluator_name: Option<String>,
    pub evaluation_date: Option<String>,
    pub scorecard_overrides: Scorecard,
    pub total_score_override: Option<i32>,
    pub feedback_text: String,
}

impl From<HumanEvaluation> for EvaluationResponse {
    fn from(eval: HumanEvaluation) -> Self {
        Self {
            evaluation_id: eval.evaluation_id,
            call_id: eval.call_id,
            evaluator_name: eval.evaluator_name,
            evaluation_date: eval.evaluation_date.map(|d| d.to_string()),
            scorecard_overrides: eval.scorecard_overrides,
            total_score_override: eval.total_score_override,
            feedback_text: eval.feedback_text.unwrap_or_default(),
        }
    }
}

/// `{status, message}` acknowledgement
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// GET /api/evaluations response
#[derive(Serialize)]
pub struct EvaluatedCallsResponse {
    pub count: usize,
    pub evaluated_call_ids: Vec<String>,
}

/// POST /api/evaluations/init-table
async fn init_table(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    state.store.ensure_schema().await?;

    Ok(Json(StatusResponse {
        status: "success",
        message: "Human evaluations table initialized",
    }))
}

/// GET /api/evaluations/{call_id}
async fn get_evaluation(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<String>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let eval = state
        .store
        .get_evaluation(&call_id)
        .await?
        .ok_or_else(|| ApiError::not_found("evaluation", &call_id))?;

    Ok(Json(eval.into()))
}

/// POST /api/evaluations/{call_id} - create or replace the override
async fn save_evaluation(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<String>,
    Json(req): Json<EvaluationRequest>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let new = req.validate()?;
    let saved = state.store.save_evaluation(&call_id, &new).await?;

    tracing::info!(
        call_id = %saved.call_id,
        evaluation_id = saved.evaluation_id,
        "Saved human evaluation"
    );

    Ok(Json(saved.into()))
}

/// DELETE /api/evaluations/{call_id}
async fn delete_evaluation(
    State(state): State<Arc<AppState>>,
    Path(call_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    if !state.store.delete_evaluation(&call_id).await? {
        return Err(ApiError::not_found("evaluation", call_id));
    }

    Ok(Json(StatusResponse {
        status: "success",
        message: "Evaluation deleted",
    }))
}

/// GET /api/evaluations - call ids with an override, most recent first
async fn list_evaluated(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EvaluatedCallsResponse>, ApiError> {
    let evaluated_call_ids = state.store.evaluated_call_ids().await?;

    Ok(Json(EvaluatedCallsResponse {
        count: evaluated_call_ids.len(),
        evaluated_call_ids,
    }))
}

/// Evaluation routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/evaluations", get(list_evaluated))
        .route("/api/evaluations/", get(list_evaluated))
        .route("/api/evaluations/init-table", post(init_table))
        .route(
            "/api/evaluations/{call_id}",
            get(get_evaluation)
                .post(save_evaluation)
                .delete(delete_evaluation),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::db::{AnalyticsStore, MemoryStore};
    use crate::http::routes::testing::{router, send};

    #[tokio::test]
    async fn delete_unknown_is_404() {
        let app = router(Arc::new(MemoryStore::new()));

        let (status, body) = send(&app, "DELETE", "/api/evaluations/c-404", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn get_unknown_is_404() {
        let app = router(Arc::new(MemoryStore::new()));

        let (status, _) = send(&app, "GET", "/api/evaluations/c-404", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn second_post_replaces_first() {
        let store = Arc::new(MemoryStore::new());
        let app = router(store.clone());

        let (status, first) = send(
            &app,
            "POST",
            "/api/evaluations/c-1",
            Some(json!({
                "evaluator_name": "Dana",
                "scorecard_overrides": {"greeting": {"score": 2}},
                "total_score_override": 30
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["feedback_text"], "");

        let (status, second) = send(
            &app,
            "POST",
            "/api/evaluations/c-1",
            Some(json!({
                "evaluator_name": "Lee",
                "scorecard_overrides": {"empathy": {"score": 5}},
                "total_score_override": 44,
                "feedback_text": "Re-scored after calibration"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(store.evaluation_count().await, 1);
        assert_eq!(second["evaluation_id"], first["evaluation_id"]);
        assert_ne!(second["evaluation_date"], first["evaluation_date"]);

        let stored = store.get_evaluation("c-1").await.unwrap().unwrap();
        assert_eq!(stored.evaluator_name.as_deref(), Some("Lee"));
        assert_eq!(stored.total_score_override, Some(44));
        assert!(stored.scorecard_overrides.get("greeting").is_none());

        let (_, fetched) = send(&app, "GET", "/api/evaluations/c-1", None).await;
        assert_eq!(fetched["scorecard_overrides"], json!({"empathy": {"score": 5}}));
        assert_eq!(fetched["feedback_text"], "Re-scored after calibration");
    }

    #[tokio::test]
    async fn invalid_payload_is_400() {
        let store = Arc::new(MemoryStore::new());
        let app = router(store.clone());

        let (status, body) = send(
            &app,
            "POST",
            "/api/evaluations/c-1",
            Some(json!({
                "evaluator_name": "Dana",
                "scorecard_overrides": {},
                "total_score_override": 99
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(store.evaluation_count().await, 0);
    }

    #[tokio::test]
    async fn delete_then_list() {
        let app = router(Arc::new(MemoryStore::new()));
        for call_id in ["c-1", "c-2"] {
            send(
                &app,
                "POST",
                &format!("/api/evaluations/{call_id}"),
                Some(json!({"evaluator_name": "Dana", "scorecard_overrides": {}})),
            )
            .await;
        }

        let (status, body) = send(&app, "DELETE", "/api/evaluations/c-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "message": "Evaluation deleted"}));

        for uri in ["/api/evaluations", "/api/evaluations/"] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"count": 1, "evaluated_call_ids": ["c-2"]}));
        }
    }

    #[tokio::test]
    async fn init_table_acknowledges() {
        let app = router(Arc::new(MemoryStore::new()));

        let (status, body) = send(&app, "POST", "/api/evaluations/init-table", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
    }
}
