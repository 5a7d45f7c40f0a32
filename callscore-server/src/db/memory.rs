//! In-process store
//!
//! Same semantics as the Postgres store (unique override per call, refreshed
//! evaluation date on re-save, newest-first listings) without a database.
//! Used by the route tests and by `serve --in-memory`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use tokio::sync::RwLock;

use callscore_core::{CallRecord, HumanEvaluation, NewEvaluation};

use super::{AnalyticsStore, DbError};
use crate::models::{CallFilter, CallSummary, RepStats};

#[derive(Default)]
struct MemoryState {
    calls: Vec<CallRecord>,
    evaluations: BTreeMap<String, HumanEvaluation>,
    next_evaluation_id: i32,
}

/// Store backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with AI call records
    pub fn with_calls(calls: impl IntoIterator<Item = CallRecord>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                calls: calls.into_iter().collect(),
                ..Default::default()
            }),
        }
    }

    /// Store seeded from a JSON array of call records
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let calls: Vec<CallRecord> = serde_json::from_str(raw)?;
        Ok(Self::with_calls(calls))
    }

    pub async fn insert_call(&self, call: CallRecord) {
        let mut state = self.state.write().await;
        state.calls.retain(|c| c.call_id != call.call_id);
        state.calls.push(call);
    }

    pub async fn evaluation_count(&self) -> usize {
        self.state.read().await.evaluations.len()
    }
}

/// Timestamp strictly after `previous`, so a re-save always moves the date
fn next_timestamp(previous: Option<NaiveDateTime>) -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    match previous {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}

#[async_trait]
impl AnalyticsStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_calls(&self, filter: &CallFilter) -> Result<Vec<CallSummary>, DbError> {
        let state = self.state.read().await;

        let mut calls: Vec<CallSummary> = state
            .calls
            .iter()
            .filter(|call| filter.matches(call))
            .map(|call| CallSummary {
                call_id: call.call_id.clone(),
                member_id: call.member_id.clone(),
                call_date: call.call_date,
                total_score: call.total_score,
                call_center_rep_id: call.call_center_rep_id.clone(),
                has_human_override: state.evaluations.contains_key(&call.call_id),
                scorecard: filter.include_scorecard.then(|| call.scorecard.clone()),
            })
            .collect();

        calls.sort_by(|a, b| b.call_date.cmp(&a.call_date));
        Ok(calls)
    }

    async fn get_call(&self, call_id: &str) -> Result<Option<CallRecord>, DbError> {
        let state = self.state.read().await;
        Ok(state.calls.iter().find(|c| c.call_id == call_id).cloned())
    }

    async fn rep_ids(&self) -> Result<Vec<String>, DbError> {
        let state = self.state.read().await;

        let mut ids: Vec<String> = state
            .calls
            .iter()
            .filter_map(|c| c.call_center_rep_id.clone())
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn rep_stats(&self, rep_id: &str) -> Result<Option<RepStats>, DbError> {
        let state = self.state.read().await;

        let rep_calls: Vec<&CallRecord> = state
            .calls
            .iter()
            .filter(|c| c.call_center_rep_id.as_deref() == Some(rep_id))
            .collect();
        if rep_calls.is_empty() {
            return Ok(None);
        }

        let scores: Vec<i64> = rep_calls.iter().filter_map(|c| c.total_score).collect();
        let avg_score = (!scores.is_empty())
            .then(|| scores.iter().sum::<i64>() as f64 / scores.len() as f64);

        Ok(Some(RepStats {
            call_center_rep_id: rep_id.to_owned(),
            total_calls: rep_calls.len() as i64,
            avg_score,
            min_score: scores.iter().min().copied(),
            max_score: scores.iter().max().copied(),
        }))
    }

    async fn get_evaluation(&self, call_id: &str) -> Result<Option<HumanEvaluation>, DbError> {
        let state = self.state.read().await;
        Ok(state.evaluations.get(call_id).cloned())
    }

    async fn save_evaluation(
        &self,
        call_id: &str,
        eval: &NewEvaluation,
    ) -> Result<HumanEvaluation, DbError> {
        let mut state = self.state.write().await;

        let existing = state
            .evaluations
            .get(call_id)
            .map(|e| (e.evaluation_id, e.evaluation_date));
        let (evaluation_id, previous_date) = match existing {
            Some(found) => found,
            None => {
                state.next_evaluation_id += 1;
                (state.next_evaluation_id, None)
            }
        };

        let saved = HumanEvaluation {
            evaluation_id,
            call_id: call_id.to_owned(),
            evaluator_name: Some(eval.evaluator_name.clone()),
            evaluation_date: Some(next_timestamp(previous_date)),
            scorecard_overrides: eval.scorecard_overrides.clone(),
            total_score_override: eval.total_score_override,
            feedback_text: Some(eval.feedback_text.clone()),
        };

        state.evaluations.insert(call_id.to_owned(), saved.clone());
        Ok(saved)
    }

    async fn delete_evaluation(&self, call_id: &str) -> Result<bool, DbError> {
        let mut state = self.state.write().await;
        Ok(state.evaluations.remove(call_id).is_some())
    }

    async fn evaluated_call_ids(&self) -> Result<Vec<String>, DbError> {
        let state = self.state.read().await;

        let mut evaluations: Vec<&HumanEvaluation> = state.evaluations.values().collect();
        evaluations.sort_by(|a, b| b.evaluation_date.cmp(&a.evaluation_date));
        Ok(evaluations.into_iter().map(|e| e.call_id.clone()).collect())
    }

    async fn ensure_schema(&self) -> Result<(), DbError> {
        Ok(())
    }
}
