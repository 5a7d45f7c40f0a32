//! Database layer - connection manager, repositories, and stores
//!
//! # Design Principles
//!
//! - One connection, refreshed before its credential expires
//! - Parameter-bound statements only
//! - Typed rows via `FromRow`, no positional access
//! - Each statement commits on its own (no multi-statement transactions)

pub mod connection;
pub mod error;
pub mod lakebase;
pub mod memory;
pub mod repos;
pub mod store;

pub use connection::{
    ConnectionGuard, ConnectionManager, Connector, Database, PgConnector, CONNECTION_TTL,
};
pub use error::DbError;
pub use lakebase::{LakebaseConnector, UrlConnector, LAKEBASE_USER};
pub use memory::MemoryStore;
pub use repos::*;
pub use store::{AnalyticsStore, PgStore};
