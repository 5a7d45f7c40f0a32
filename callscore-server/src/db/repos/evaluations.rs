//! Human evaluation repository
//!
//! - save: INSERT ... ON CONFLICT (call_id) DO UPDATE (one row per call)
//! - delete: reports whether a row existed

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::FromRow;

use callscore_core::{HumanEvaluation, NewEvaluation, Scorecard};

use crate::db::{Database, DbError};

/// Override row as stored
#[derive(Debug, Clone, FromRow)]
pub struct EvaluationRow {
    pub evaluation_id: i32,
    pub call_id: String,
    pub evaluator_name: Option<String>,
    pub evaluation_date: Option<NaiveDateTime>,
    pub scorecard_overrides: Option<JsonValue>,
    pub total_score_override: Option<i32>,
    pub feedback_text: Option<String>,
}

impl TryFrom<EvaluationRow> for HumanEvaluation {
    type Error = DbError;

    fn try_from(row: EvaluationRow) -> Result<Self, Self::Error> {
        let scorecard_overrides = Scorecard::from_value(
            &row.call_id,
            row.scorecard_overrides.unwrap_or(JsonValue::Null),
        )?;

        Ok(HumanEvaluation {
            evaluation_id: row.evaluation_id,
            call_id: row.call_id,
            evaluator_name: row.evaluator_name,
            evaluation_date: row.evaluation_date,
            scorecard_overrides,
            total_score_override: row.total_score_override,
            feedback_text: row.feedback_text,
        })
    }
}

/// Human evaluation repository
pub struct EvaluationRepo<'a> {
    db: &'a Database,
}

impl<'a> EvaluationRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create the schema and table if missing (idempotent).
    pub async fn ensure_table(&self) -> Result<(), DbError> {
        let mut conn = self.db.acquire().await?;

        sqlx::query("CREATE SCHEMA IF NOT EXISTS telco_call_center_analytics")
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS telco_call_center_analytics.human_evaluations (
                evaluation_id SERIAL PRIMARY KEY,
                call_id TEXT NOT NULL,
                evaluator_name TEXT,
                evaluation_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                scorecard_overrides JSONB,
                total_score_override INTEGER,
                feedback_text TEXT,
                UNIQUE (call_id)
            )
            "#,
        )
        .execute(&mut *conn)
        .await?;

        tracing::info!("Human evaluations table ready");
        Ok(())
    }

    /// Get the override for a call, if any.
    pub async fn get(&self, call_id: &str) -> Result<Option<HumanEvaluation>, DbError> {
        let mut conn = self.db.acquire().await?;

        let row: Option<EvaluationRow> = sqlx::query_as(
            r#"
            SELECT evaluation_id, call_id, evaluator_name, evaluation_date,
                   scorecard_overrides, total_score_override, feedback_text
            FROM telco_call_center_analytics.human_evaluations
            WHERE call_id = $1
            "#,
        )
        .bind(call_id)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(HumanEvaluation::try_from).transpose()
    }

    /// Insert or replace the override for a call.
    ///
    /// Re-saving refreshes `evaluation_date`.
    pub async fn upsert(
        &self,
        call_id: &str,
        eval: &NewEvaluation,
    ) -> Result<HumanEvaluation, DbError> {
        let mut conn = self.db.acquire().await?;

        let row: EvaluationRow = sqlx::query_as(
            r#"
            INSERT INTO telco_call_center_analytics.human_evaluations
                (call_id, evaluator_name, scorecard_overrides, total_score_override, feedback_text)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (call_id) DO UPDATE
            SET evaluator_name = EXCLUDED.evaluator_name,
                evaluation_date = CURRENT_TIMESTAMP,
                scorecard_overrides = EXCLUDED.scorecard_overrides,
                total_score_override = EXCLUDED.total_score_override,
                feedback_text = EXCLUDED.feedback_text
            RETURNING evaluation_id, call_id, evaluator_name, evaluation_date,
                      scorecard_overrides, total_score_override, feedback_text
            "#,
        )
        .bind(call_id)
        .bind(&eval.evaluator_name)
        .bind(Json(&eval.scorecard_overrides))
        .bind(eval.total_score_override)
        .bind(&eval.feedback_text)
        .fetch_one(&mut *conn)
        .await?;

        HumanEvaluation::try_from(row)
    }

    /// Delete the override for a call. Returns false if none existed.
    pub async fn delete(&self, call_id: &str) -> Result<bool, DbError> {
        let mut conn = self.db.acquire().await?;

        let result = sqlx::query(
            "DELETE FROM telco_call_center_analytics.human_evaluations WHERE call_id = $1",
        )
        .bind(call_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Call ids with an override, most recently evaluated first.
    pub async fn evaluated_call_ids(&self) -> Result<Vec<String>, DbError> {
        let mut conn = self.db.acquire().await?;

        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT call_id
            FROM telco_call_center_analytics.human_evaluations
            WHERE call_id <> ''
            ORDER BY evaluation_date DESC
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(ids)
    }
}
