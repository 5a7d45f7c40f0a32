//! LLM agent proxy client
//!
//! Forwards chat messages to the configured agent serving endpoint in its
//! `{"input": [...]}` format and returns the raw JSON reply.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::config::AgentConfig;
use crate::workspace::{WorkspaceClient, WorkspaceError};

/// Complex agent queries can take a while
pub const AGENT_TIMEOUT_SECS: u64 = 120;

/// One chat turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// POST /api/agent/chat body
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct AgentInput<'a> {
    input: &'a [ChatMessage],
}

/// Agent proxy failure
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("DATABRICKS_AGENT_ENDPOINT not configured")]
    NotConfigured,

    #[error(transparent)]
    Auth(#[from] WorkspaceError),

    #[error("Agent request failed: {body}")]
    Upstream { status: u16, body: String },

    #[error("agent request error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the agent serving endpoint
#[derive(Debug, Clone)]
pub struct AgentClient {
    workspace: WorkspaceClient,
    endpoint: Option<String>,
}

impl AgentClient {
    pub fn new(workspace: WorkspaceClient, config: &AgentConfig) -> Self {
        Self {
            workspace,
            endpoint: config.endpoint.clone().filter(|e| !e.is_empty()),
        }
    }

    /// Send `messages` to the agent and return its JSON reply.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<JsonValue, AgentError> {
        let endpoint = self.endpoint.as_deref().ok_or(AgentError::NotConfigured)?;
        let token = self.workspace.access_token().await?;

        tracing::info!(messages = messages.len(), "Sending request to agent");

        let response = self
            .workspace
            .http()
            .post(endpoint)
            .bearer_auth(token)
            .json(&AgentInput { input: messages })
            .timeout(Duration::from_secs(AGENT_TIMEOUT_SECS))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "Agent request failed");
            return Err(AgentError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let reply: JsonValue = response.json().await?;
        tracing::debug!(%reply, "Agent response");
        Ok(reply)
    }
}
