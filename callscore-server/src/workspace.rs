//! Workspace identity REST client
//!
//! Covers the three calls the service needs from the workspace:
//! - OAuth client-credentials token exchange (`/oidc/v1/token`)
//! - Short-lived database credential generation
//! - Database instance lookup (read-write DNS)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Credentials, WorkspaceConfig};

/// Errors talking to the workspace
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("Databricks credentials not configured")]
    MissingCredentials,

    #[error("DATABRICKS_HOST not configured")]
    MissingHost,

    #[error("{context}: {body}")]
    Status {
        context: &'static str,
        status: u16,
        body: String,
    },

    #[error("workspace request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct CredentialRequest<'a> {
    request_id: String,
    instance_names: [&'a str; 1],
}

/// Short-lived database credential
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseCredential {
    pub token: String,
    #[serde(default)]
    pub expiration_time: Option<String>,
}

/// Database instance description (only the fields we use)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseInstance {
    pub name: String,
    #[serde(default)]
    pub read_write_dns: Option<String>,
}

/// Thin client over the workspace REST API
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    http: Client,
    host: Option<String>,
    credentials: Option<Credentials>,
}

impl WorkspaceClient {
    pub fn new(http: Client, config: &WorkspaceConfig) -> Self {
        Self {
            http,
            host: config.base_url(),
            credentials: config.credentials(),
        }
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    fn host(&self) -> Result<&str, WorkspaceError> {
        self.host.as_deref().ok_or(WorkspaceError::MissingHost)
    }

    /// Bearer token for workspace and agent calls.
    ///
    /// A static token is returned as-is; client credentials are exchanged
    /// on every call (no caching).
    pub async fn access_token(&self) -> Result<String, WorkspaceError> {
        match &self.credentials {
            Some(Credentials::Token(token)) => Ok(token.clone()),
            Some(Credentials::ClientSecret {
                client_id,
                client_secret,
            }) => self.exchange_client_credentials(client_id, client_secret).await,
            None => Err(WorkspaceError::MissingCredentials),
        }
    }

    async fn exchange_client_credentials(
        &self,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String, WorkspaceError> {
        let url = format!("{}/oidc/v1/token", self.host()?);
        tracing::debug!(%url, "Requesting OAuth token");

        let response = self
            .http
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", "all-apis")])
            .send()
            .await?;

        let response = check_status(response, "Failed to get auth token").await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    /// Generate a database credential scoped to one instance.
    pub async fn generate_database_credential(
        &self,
        instance_name: &str,
    ) -> Result<DatabaseCredential, WorkspaceError> {
        let url = format!("{}/api/2.0/database/credentials", self.host()?);
        let token = self.access_token().await?;

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&CredentialRequest {
                request_id: Uuid::new_v4().to_string(),
                instance_names: [instance_name],
            })
            .send()
            .await?;

        let response = check_status(response, "Failed to generate database credential").await?;
        Ok(response.json().await?)
    }

    /// Look up a database instance by name.
    pub async fn get_database_instance(
        &self,
        instance_name: &str,
    ) -> Result<DatabaseInstance, WorkspaceError> {
        let url = format!("{}/api/2.0/database/instances/{}", self.host()?, instance_name);
        let token = self.access_token().await?;

        let response = self.http.get(&url).bearer_auth(token).send().await?;

        let response = check_status(response, "Failed to get database instance").await?;
        Ok(response.json().await?)
    }
}

async fn check_status(
    response: reqwest::Response,
    context: &'static str,
) -> Result<reqwest::Response, WorkspaceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(WorkspaceError::Status {
        context,
        status: status.as_u16(),
        body,
    })
}
