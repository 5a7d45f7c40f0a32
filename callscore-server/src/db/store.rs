//! Store trait used by the HTTP layer
//!
//! [`PgStore`] delegates to the repositories over one managed connection;
//! [`MemoryStore`](super::MemoryStore) keeps everything in process.

use async_trait::async_trait;

use callscore_core::{CallRecord, HumanEvaluation, NewEvaluation};

use super::{CallRepo, Database, DbError, EvaluationRepo};
use crate::models::{CallFilter, CallSummary, RepStats};

/// Every data operation the routes need (testable)
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Short backend name for diagnostics (`postgres`, `memory`)
    fn backend(&self) -> &'static str;

    async fn list_calls(&self, filter: &CallFilter) -> Result<Vec<CallSummary>, DbError>;

    async fn get_call(&self, call_id: &str) -> Result<Option<CallRecord>, DbError>;

    async fn rep_ids(&self) -> Result<Vec<String>, DbError>;

    async fn rep_stats(&self, rep_id: &str) -> Result<Option<RepStats>, DbError>;

    async fn get_evaluation(&self, call_id: &str) -> Result<Option<HumanEvaluation>, DbError>;

    async fn save_evaluation(
        &self,
        call_id: &str,
        eval: &NewEvaluation,
    ) -> Result<HumanEvaluation, DbError>;

    async fn delete_evaluation(&self, call_id: &str) -> Result<bool, DbError>;

    async fn evaluated_call_ids(&self) -> Result<Vec<String>, DbError>;

    async fn ensure_schema(&self) -> Result<(), DbError>;
}

/// Postgres-backed store
pub struct PgStore {
    db: Database,
}

impl PgStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl AnalyticsStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn list_calls(&self, filter: &CallFilter) -> Result<Vec<CallSummary>, DbError> {
        CallRepo::new(&self.db).list(filter).await
    }

    async fn get_call(&self, call_id: &str) -> Result<Option<CallRecord>, DbError> {
        CallRepo::new(&self.db).get(call_id).await
    }

    async fn rep_ids(&self) -> Result<Vec<String>, DbError> {
        CallRepo::new(&self.db).rep_ids().await
    }

    async fn rep_stats(&self, rep_id: &str) -> Result<Option<RepStats>, DbError> {
        CallRepo::new(&self.db).rep_stats(rep_id).await
    }

    async fn get_evaluation(&self, call_id: &str) -> Result<Option<HumanEvaluation>, DbError> {
        EvaluationRepo::new(&self.db).get(call_id).await
    }

    async fn save_evaluation(
        &self,
        call_id: &str,
        eval: &NewEvaluation,
    ) -> Result<HumanEvaluation, DbError> {
        EvaluationRepo::new(&self.db).upsert(call_id, eval).await
    }

    async fn delete_evaluation(&self, call_id: &str) -> Result<bool, DbError> {
        EvaluationRepo::new(&self.db).delete(call_id).await
    }

    async fn evaluated_call_ids(&self) -> Result<Vec<String>, DbError> {
        EvaluationRepo::new(&self.db).evaluated_call_ids().await
    }

    async fn ensure_schema(&self) -> Result<(), DbError> {
        EvaluationRepo::new(&self.db).ensure_table().await
    }
}
