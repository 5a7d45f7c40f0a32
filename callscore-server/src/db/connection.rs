//! Single-connection manager with time-based refresh
//!
//! The warehouse hands out credentials that expire after an hour, so the
//! manager keeps exactly one connection and replaces it once it is older
//! than [`CONNECTION_TTL`]. The staleness check and the replacement happen
//! under one async mutex: concurrent callers never open duplicate
//! connections, and the guard handed to a caller keeps the connection
//! exclusive for the duration of its statement.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgConnection;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tokio::time::Instant;

use super::DbError;

/// Connections older than this are discarded and reopened
pub const CONNECTION_TTL: Duration = Duration::from_secs(59 * 60);

/// Opens and closes connections (testable)
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Connection: Send + 'static;

    async fn connect(&self) -> Result<Self::Connection, DbError>;

    async fn close(&self, conn: Self::Connection) -> Result<(), DbError>;
}

#[async_trait]
impl<T> Connector for Box<T>
where
    T: Connector + ?Sized,
{
    type Connection = T::Connection;

    async fn connect(&self) -> Result<Self::Connection, DbError> {
        (**self).connect().await
    }

    async fn close(&self, conn: Self::Connection) -> Result<(), DbError> {
        (**self).close(conn).await
    }
}

/// Type-erased Postgres connector
pub type PgConnector = Box<dyn Connector<Connection = PgConnection>>;

/// Connection manager used by the repositories
pub type Database = ConnectionManager<PgConnector>;

/// Exclusive access to the live connection
pub type ConnectionGuard<'a, T> = MappedMutexGuard<'a, T>;

/// Boxed `acquire` future, `Send` for any borrow of the manager
pub type AcquireFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<ConnectionGuard<'a, T>, DbError>> + Send + 'a>>;

struct Slot<T> {
    conn: T,
    opened_at: Instant,
}

impl<T> Slot<T> {
    fn is_stale(&self, ttl: Duration) -> bool {
        self.opened_at.elapsed() > ttl
    }
}

/// Owns one lazily opened connection
pub struct ConnectionManager<C: Connector> {
    connector: C,
    ttl: Duration,
    slot: Mutex<Option<Slot<C::Connection>>>,
    opened: AtomicU64,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self::with_ttl(connector, CONNECTION_TTL)
    }

    pub fn with_ttl(connector: C, ttl: Duration) -> Self {
        Self {
            connector,
            ttl,
            slot: Mutex::new(None),
            opened: AtomicU64::new(0),
        }
    }

    /// Number of connections opened over the manager's lifetime
    pub fn connections_opened(&self) -> u64 {
        self.opened.load(Ordering::Relaxed)
    }

    /// Return the live connection, opening or refreshing it first if needed.
    ///
    /// A stale connection is closed best-effort; a failing close is logged
    /// and otherwise ignored. Connect failures propagate without retry.
    pub fn acquire(&self) -> AcquireFuture<'_, C::Connection> {
        Box::pin(async move {
            let mut slot = self.slot.lock().await;

            let fresh = matches!(slot.as_ref(), Some(s) if !s.is_stale(self.ttl));
            if !fresh {
                if let Some(old) = slot.take() {
                    tracing::info!(
                        age_secs = old.opened_at.elapsed().as_secs(),
                        "Database connection expired, refreshing"
                    );
                    if let Err(e) = self.connector.close(old.conn).await {
                        tracing::warn!(error = %e, "Failed to close expired connection");
                    }
                }

                let conn = self.connector.connect().await?;
                let count = self.opened.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::info!(connections_opened = count, "Database connection opened");

                *slot = Some(Slot {
                    conn,
                    opened_at: Instant::now(),
                });
            }

            MutexGuard::try_map(slot, |s| s.as_mut().map(|s| &mut s.conn))
                .map_err(|_| DbError::Unavailable)
        })
    }
}

impl<C> ConnectionManager<C>
where
    C: Connector<Connection = PgConnection>,
{
    /// Execute ad-hoc SQL and return every row.
    ///
    /// Sent over the simple query protocol: `sql` may hold several
    /// `;`-separated statements and nothing is added to the statement cache.
    /// It runs outside any explicit transaction, so it commits as soon as it
    /// completes.
    pub async fn query(&self, sql: &str) -> Result<Vec<PgRow>, DbError> {
        let mut conn = self.acquire().await?;
        let rows = sqlx::raw_sql(sql).fetch_all(&mut *conn).await?;
        Ok(rows)
    }
}
