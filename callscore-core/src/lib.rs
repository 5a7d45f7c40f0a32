//! callscore-core: call scorecards and human override merging
//!
//! Pure domain types shared by the server and CLI. Nothing in this crate
//! performs I/O.

pub mod call;
pub mod error;
pub mod evaluation;
pub mod merge;
pub mod scorecard;
pub mod validation;

pub use call::CallRecord;
pub use error::{CoreError, Result};
pub use evaluation::{EvaluationRequest, HumanEvaluation, NewEvaluation};
pub use merge::{merge_scores, HumanEvaluationMeta, MergedCallView};
pub use scorecard::{deep_merge, Scorecard};
pub use validation::ValidationError;
