//! Command implementations for the callscore CLI

pub mod init_table;
pub mod query;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;

use callscore_server::db::{Database, LakebaseConnector, PgConnector, UrlConnector};
use callscore_server::{
    AgentConfig, AnalyticsStore, ConnectionManager, LakebaseConfig, MemoryStore, PgStore,
    WorkspaceClient, WorkspaceConfig,
};

pub use init_table::run_init_table;
pub use query::run_query;
pub use serve::run_serve;

/// Database and workspace settings shared by every command
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Plain Postgres connection string (takes precedence over Lakebase)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Workspace base URL
    #[arg(long, env = "DATABRICKS_HOST")]
    pub databricks_host: Option<String>,

    /// OAuth client id for the workspace service principal
    #[arg(long, env = "DATABRICKS_CLIENT_ID")]
    pub databricks_client_id: Option<String>,

    /// OAuth client secret for the workspace service principal
    #[arg(long, env = "DATABRICKS_CLIENT_SECRET", hide_env_values = true)]
    pub databricks_client_secret: Option<String>,

    /// Static bearer token (used instead of client credentials)
    #[arg(long, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    pub databricks_token: Option<String>,

    /// Lakebase database instance name
    #[arg(long, env = "LAKEBASE_INSTANCE_NAME")]
    pub lakebase_instance: Option<String>,

    /// Lakebase database name
    #[arg(long, env = "LAKEBASE_DB_NAME")]
    pub lakebase_db: Option<String>,
}

impl DatabaseArgs {
    pub fn workspace_config(&self) -> WorkspaceConfig {
        WorkspaceConfig {
            host: self.databricks_host.clone(),
            client_id: self.databricks_client_id.clone(),
            client_secret: self.databricks_client_secret.clone(),
            token: self.databricks_token.clone(),
        }
    }

    pub fn workspace_client(&self, http: reqwest::Client) -> WorkspaceClient {
        WorkspaceClient::new(http, &self.workspace_config())
    }

    /// Connection manager for the configured database.
    ///
    /// `DATABASE_URL` wins; otherwise Lakebase needs both the instance and
    /// database names.
    pub fn database(&self, http: reqwest::Client) -> Result<Database> {
        let connector: PgConnector = if let Some(url) = non_empty(&self.database_url) {
            tracing::info!("Using DATABASE_URL connection");
            Box::new(UrlConnector::new(url))
        } else if let (Some(instance_name), Some(database)) =
            (non_empty(&self.lakebase_instance), non_empty(&self.lakebase_db))
        {
            tracing::info!(instance = %instance_name, database = %database, "Using Lakebase connection");
            Box::new(LakebaseConnector::new(
                self.workspace_client(http),
                LakebaseConfig {
                    instance_name: instance_name.to_owned(),
                    database: database.to_owned(),
                },
            ))
        } else {
            bail!(
                "No database configured. Set DATABASE_URL, or LAKEBASE_INSTANCE_NAME and \
                 LAKEBASE_DB_NAME with workspace credentials"
            );
        };

        Ok(ConnectionManager::new(connector))
    }

    /// Store for the HTTP layer (`in_memory` skips the database entirely,
    /// optionally seeded with call records from a JSON file)
    pub fn store(
        &self,
        http: reqwest::Client,
        in_memory: bool,
        seed: Option<&Path>,
    ) -> Result<Arc<dyn AnalyticsStore>> {
        if !in_memory {
            return Ok(Arc::new(PgStore::new(self.database(http)?)));
        }

        tracing::warn!("Using in-memory store - data is lost on exit");
        let store = match seed {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read seed file {}", path.display()))?;
                let store = MemoryStore::from_json(&raw)
                    .with_context(|| format!("Invalid call records in {}", path.display()))?;
                tracing::info!(path = %path.display(), "Seeded in-memory store");
                store
            }
            None => MemoryStore::new(),
        };
        Ok(Arc::new(store))
    }
}

/// Agent proxy settings
#[derive(Args, Debug, Clone)]
pub struct AgentArgs {
    /// Agent serving endpoint URL
    #[arg(long, env = "DATABRICKS_AGENT_ENDPOINT")]
    pub agent_endpoint: Option<String>,
}

impl From<&AgentArgs> for AgentConfig {
    fn from(args: &AgentArgs) -> Self {
        AgentConfig {
            endpoint: args.agent_endpoint.clone(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
