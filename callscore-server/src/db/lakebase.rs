//! Postgres connectors
//!
//! - [`LakebaseConnector`]: credential-based connection to a managed
//!   Lakebase instance (token expires, hence the manager's TTL)
//! - [`UrlConnector`]: plain `DATABASE_URL` connection for local development

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::{Connection, PgConnection};

use super::{Connector, DbError};
use crate::config::LakebaseConfig;
use crate::workspace::WorkspaceClient;

/// Access principal used for every Lakebase connection
pub const LAKEBASE_USER: &str = "mc-call-center-vibing";

/// Opens TLS connections to a Lakebase instance with a fresh credential
pub struct LakebaseConnector {
    workspace: WorkspaceClient,
    config: LakebaseConfig,
}

impl LakebaseConnector {
    pub fn new(workspace: WorkspaceClient, config: LakebaseConfig) -> Self {
        Self { workspace, config }
    }

    async fn connect_options(&self) -> Result<PgConnectOptions, DbError> {
        let instance_name = &self.config.instance_name;

        let credential = self
            .workspace
            .generate_database_credential(instance_name)
            .await?;
        let instance = self.workspace.get_database_instance(instance_name).await?;
        let host = instance
            .read_write_dns
            .filter(|dns| !dns.is_empty())
            .ok_or_else(|| DbError::NoEndpoint {
                instance: instance_name.clone(),
            })?;

        tracing::debug!(%host, database = %self.config.database, "Resolved Lakebase instance");

        Ok(PgConnectOptions::new()
            .host(&host)
            .database(&self.config.database)
            .username(LAKEBASE_USER)
            .password(&credential.token)
            .ssl_mode(PgSslMode::Require))
    }
}

#[async_trait]
impl Connector for LakebaseConnector {
    type Connection = PgConnection;

    async fn connect(&self) -> Result<PgConnection, DbError> {
        let options = self.connect_options().await?;
        let conn = PgConnection::connect_with(&options).await?;
        Ok(conn)
    }

    async fn close(&self, conn: PgConnection) -> Result<(), DbError> {
        conn.close().await?;
        Ok(())
    }
}

/// Connects with a static connection string
pub struct UrlConnector {
    url: String,
}

impl UrlConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Connector for UrlConnector {
    type Connection = PgConnection;

    async fn connect(&self) -> Result<PgConnection, DbError> {
        Ok(PgConnection::connect(&self.url).await?)
    }

    async fn close(&self, conn: PgConnection) -> Result<(), DbError> {
        conn.close().await?;
        Ok(())
    }
}
