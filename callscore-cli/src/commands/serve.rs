//! HTTP server command
//!
//! Runs the analytics API and serves the frontend.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use callscore_server::{run_server, AgentClient, AgentConfig, AppState, ServerConfig};

use super::{AgentArgs, DatabaseArgs};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "CALLSCORE_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Directory containing the frontend index.html
    #[arg(long, default_value = "frontend")]
    pub static_dir: PathBuf,

    /// Keep calls and evaluations in memory instead of a database
    #[arg(long)]
    pub in_memory: bool,

    /// JSON array of call records to load into the in-memory store
    /// (e.g. demos/sample_calls.json)
    #[arg(long, requires = "in_memory")]
    pub seed: Option<PathBuf>,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub agent: AgentArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let http = reqwest::Client::new();

    let store = args
        .database
        .store(http.clone(), args.in_memory, args.seed.as_deref())
        .context("Failed to configure store")?;
    let agent = AgentClient::new(
        args.database.workspace_client(http),
        &AgentConfig::from(&args.agent),
    );

    tracing::info!("Starting callscore server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        static_dir: args.static_dir,
    };

    // Blocks until shutdown
    run_server(AppState::new(store, agent), config)
        .await
        .context("Server error")?;

    Ok(())
}
