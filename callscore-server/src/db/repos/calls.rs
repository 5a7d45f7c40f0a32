//! Call repository
//!
//! Read-only access to the AI-scored fact table. Every filter is bound as a
//! parameter; optional filters use the `($n IS NULL OR ...)` pattern so one
//! prepared statement covers every combination.

use chrono::NaiveDateTime;
use sqlx::FromRow;

use callscore_core::{CallRecord, Scorecard};

use crate::db::{Database, DbError};
use crate::models::{CallFilter, CallSummary, RepStats};

/// Full call row
#[derive(Debug, Clone, FromRow)]
pub struct CallRow {
    pub call_id: String,
    pub member_id: Option<String>,
    pub call_date: Option<NaiveDateTime>,
    pub transcript: Option<String>,
    pub scorecard_json: Option<String>,
    pub total_score: Option<i64>,
    pub call_center_rep_id: Option<String>,
    pub transcript_summary: Option<String>,
}

impl TryFrom<CallRow> for CallRecord {
    type Error = DbError;

    /// Strict conversion: a malformed scorecard is an error
    fn try_from(row: CallRow) -> Result<Self, Self::Error> {
        let scorecard = match row.scorecard_json.as_deref() {
            Some(raw) => Scorecard::parse(&row.call_id, raw)?,
            None => Scorecard::new(),
        };

        Ok(CallRecord {
            call_id: row.call_id,
            member_id: row.member_id,
            call_date: row.call_date,
            transcript: row.transcript,
            scorecard,
            total_score: row.total_score,
            call_center_rep_id: row.call_center_rep_id,
            transcript_summary: row.transcript_summary,
        })
    }
}

/// Listing row
#[derive(Debug, Clone, FromRow)]
pub struct CallSummaryRow {
    pub call_id: String,
    pub member_id: Option<String>,
    pub call_date: Option<NaiveDateTime>,
    pub total_score: Option<i64>,
    pub call_center_rep_id: Option<String>,
    pub has_human_override: bool,
    pub scorecard_json: Option<String>,
}

impl From<CallSummaryRow> for CallSummary {
    /// Lenient conversion: a malformed scorecard becomes empty
    fn from(row: CallSummaryRow) -> Self {
        let scorecard = row
            .scorecard_json
            .as_deref()
            .map(|raw| Scorecard::parse_lenient(&row.call_id, raw));

        CallSummary {
            call_id: row.call_id,
            member_id: row.member_id,
            call_date: row.call_date,
            total_score: row.total_score,
            call_center_rep_id: row.call_center_rep_id,
            has_human_override: row.has_human_override,
            scorecard,
        }
    }
}

/// Call repository
pub struct CallRepo<'a> {
    db: &'a Database,
}

impl<'a> CallRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List calls matching `filter`, most recent first.
    pub async fn list(&self, filter: &CallFilter) -> Result<Vec<CallSummary>, DbError> {
        let mut conn = self.db.acquire().await?;

        let rows: Vec<CallSummaryRow> = sqlx::query_as(
            r#"
            SELECT
                c.call_id,
                c.member_id,
                c.call_date::timestamp AS call_date,
                c.total_score::bigint AS total_score,
                c.call_center_rep_id,
                EXISTS (
                    SELECT 1 FROM telco_call_center_analytics.human_evaluations h
                    WHERE h.call_id = c.call_id
                ) AS has_human_override,
                CASE WHEN $6::boolean THEN c.scorecard_json::text END AS scorecard_json
            FROM analytics.call_center_scores_sync c
            WHERE ($1::text IS NULL OR c.member_id = $1)
              AND ($2::bigint IS NULL OR c.total_score >= $2)
              AND ($3::date IS NULL OR c.call_date::timestamp >= $3)
              AND ($4::date IS NULL OR c.call_date::timestamp < $4::date + 1)
              AND ($5::text IS NULL OR c.call_center_rep_id = $5)
            ORDER BY c.call_date DESC
            "#,
        )
        .bind(filter.member_id.as_deref())
        .bind(filter.min_score)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.call_center_rep_id.as_deref())
        .bind(filter.include_scorecard)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows.into_iter().map(CallSummary::from).collect())
    }

    /// Get one call by id.
    pub async fn get(&self, call_id: &str) -> Result<Option<CallRecord>, DbError> {
        let mut conn = self.db.acquire().await?;

        let row: Option<CallRow> = sqlx::query_as(
            r#"
            SELECT
                call_id,
                member_id,
                call_date::timestamp AS call_date,
                transcript,
                scorecard_json::text AS scorecard_json,
                total_score::bigint AS total_score,
                call_center_rep_id,
                transcript_summary
            FROM analytics.call_center_scores_sync
            WHERE call_id = $1
            LIMIT 1
            "#,
        )
        .bind(call_id)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(CallRecord::try_from).transpose()
    }

    /// Distinct representative ids, sorted.
    pub async fn rep_ids(&self) -> Result<Vec<String>, DbError> {
        let mut conn = self.db.acquire().await?;

        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT call_center_rep_id
            FROM analytics.call_center_scores_sync
            WHERE call_center_rep_id IS NOT NULL
            ORDER BY call_center_rep_id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(ids)
    }

    /// Score aggregates for one representative; `None` if they have no calls.
    pub async fn rep_stats(&self, rep_id: &str) -> Result<Option<RepStats>, DbError> {
        let mut conn = self.db.acquire().await?;

        let stats: RepStats = sqlx::query_as(
            r#"
            SELECT
                $1::text AS call_center_rep_id,
                COUNT(*) AS total_calls,
                AVG(total_score)::float8 AS avg_score,
                MIN(total_score)::bigint AS min_score,
                MAX(total_score)::bigint AS max_score
            FROM analytics.call_center_scores_sync
            WHERE call_center_rep_id = $1
            "#,
        )
        .bind(rep_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok((stats.total_calls > 0).then_some(stats))
    }
}
