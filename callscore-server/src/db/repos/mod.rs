//! Repository implementations for database access
//!
//! Each repository borrows the [`Database`](crate::db::Database) manager,
//! acquires the single connection per statement, and decodes typed rows.

pub mod calls;
pub mod evaluations;

pub use calls::{CallRepo, CallRow, CallSummaryRow};
pub use evaluations::{EvaluationRepo, EvaluationRow};
