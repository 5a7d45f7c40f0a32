//! callscore-server: HTTP API for call-center score analytics
//!
//! Serves AI call scorecards merged with human overrides, per-representative
//! aggregates, override CRUD, and a proxy to the conversational agent.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use callscore_server::{db::MemoryStore, run_server, AppState, ServerConfig};
//!
//! let state = AppState::new(Arc::new(MemoryStore::new()), agent);
//! run_server(state, ServerConfig::default()).await?;
//! ```

pub mod agent;
pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod workspace;

pub use agent::{AgentClient, AgentError, ChatMessage};
pub use config::{AgentConfig, Credentials, LakebaseConfig, WorkspaceConfig};
pub use db::{AnalyticsStore, ConnectionManager, Database, DbError, MemoryStore, PgStore};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
pub use workspace::{WorkspaceClient, WorkspaceError};
