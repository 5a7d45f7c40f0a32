//! Call-center representative endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::RepStats;

/// GET /api/ccrs response
#[derive(Serialize)]
pub struct RepListResponse {
    pub count: usize,
    pub ccr_ids: Vec<String>,
}

/// GET /api/ccrs - distinct representative ids
async fn list_reps(State(state): State<Arc<AppState>>) -> Result<Json<RepListResponse>, ApiError> {
    let ccr_ids = state.store.rep_ids().await?;

    Ok(Json(RepListResponse {
        count: ccr_ids.len(),
        ccr_ids,
    }))
}

/// GET /api/ccrs/{id}/stats
async fn rep_stats(
    State(state): State<Arc<AppState>>,
    Path(rep_id): Path<String>,
) -> Result<Json<RepStats>, ApiError> {
    let stats = state
        .store
        .rep_stats(&rep_id)
        .await?
        .ok_or_else(|| ApiError::not_found("call center rep", &rep_id))?;

    Ok(Json(stats))
}

/// Representative routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/ccrs", get(list_reps))
        .route("/api/ccrs/{id}/stats", get(rep_stats))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use callscore_core::{CallRecord, Scorecard};

    use crate::db::MemoryStore;
    use crate::http::routes::testing::{router, send};

    fn store() -> Arc<MemoryStore> {
        let calls = [("c-1", "ccr-2", 40), ("c-2", "ccr-1", 20), ("c-3", "ccr-2", 50)]
            .into_iter()
            .map(|(id, rep, total)| {
                let mut call = CallRecord::new(id, Scorecard::new(), Some(total));
                call.call_center_rep_id = Some(rep.into());
                call
            });
        Arc::new(MemoryStore::with_calls(calls))
    }

    #[tokio::test]
    async fn lists_distinct_reps() {
        let app = router(store());

        let (status, body) = send(&app, "GET", "/api/ccrs", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["ccr_ids"], serde_json::json!(["ccr-1", "ccr-2"]));
    }

    #[tokio::test]
    async fn stats_for_known_and_unknown_rep() {
        let app = router(store());

        let (status, body) = send(&app, "GET", "/api/ccrs/ccr-2/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_calls"], 2);
        assert_eq!(body["avg_score"], 45.0);
        assert_eq!(body["min_score"], 40);
        assert_eq!(body["max_score"], 50);

        let (status, _) = send(&app, "GET", "/api/ccrs/ccr-9/stats", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
