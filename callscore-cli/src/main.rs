//! callscore CLI - call-center score analytics server
//!
//! Entry point for:
//! - `serve`: HTTP API with merged AI/human scorecards and the agent proxy
//! - `init-table`: create the human evaluations table
//! - `query`: run one SQL statement through the managed connection

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "callscore",
    author,
    version,
    about = "Call-center score analytics: AI scorecards with human overrides"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the human evaluations table if it does not exist
    InitTable(commands::init_table::InitTableArgs),
    /// Run a SQL statement and print the returned columns and row count
    Query(commands::query::QueryArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::InitTable(args) => commands::run_init_table(args).await?,
        Commands::Query(args) => commands::run_query(args).await?,
    }

    Ok(())
}
