//! Runtime configuration for the workspace, Lakebase, and agent clients
//!
//! Values are normally filled from environment variables by the CLI.

/// Credentials for the workspace identity service
#[derive(Debug, Clone, PartialEq)]
pub enum Credentials {
    /// Pre-issued bearer token (`DATABRICKS_TOKEN`)
    Token(String),
    /// OAuth client-credentials pair exchanged for a token on demand
    ClientSecret {
        client_id: String,
        client_secret: String,
    },
}

/// Workspace connection settings
#[derive(Debug, Clone, Default)]
pub struct WorkspaceConfig {
    /// Workspace base URL, e.g. `https://example.cloud.databricks.com`
    pub host: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token: Option<String>,
}

impl WorkspaceConfig {
    /// Pick the credential to use: a static token wins over client credentials.
    pub fn credentials(&self) -> Option<Credentials> {
        if let Some(token) = self.token.as_ref().filter(|t| !t.is_empty()) {
            return Some(Credentials::Token(token.clone()));
        }
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(Credentials::ClientSecret {
                    client_id: id.clone(),
                    client_secret: secret.clone(),
                })
            }
            _ => None,
        }
    }

    /// Host with any trailing slash removed
    pub fn base_url(&self) -> Option<String> {
        self.host
            .as_deref()
            .filter(|h| !h.is_empty())
            .map(|h| h.trim_end_matches('/').to_owned())
    }
}

/// Lakebase instance settings
#[derive(Debug, Clone)]
pub struct LakebaseConfig {
    /// Database instance name (`LAKEBASE_INSTANCE_NAME`)
    pub instance_name: String,
    /// Database name (`LAKEBASE_DB_NAME`)
    pub database: String,
}

/// Agent proxy settings
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    /// Agent serving endpoint (`DATABRICKS_AGENT_ENDPOINT`)
    pub endpoint: Option<String>,
}
