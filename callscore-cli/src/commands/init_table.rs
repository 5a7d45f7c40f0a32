//! Create the human evaluations table

use anyhow::{Context, Result};
use clap::Parser;

use callscore_server::{AnalyticsStore, PgStore};

use super::DatabaseArgs;

/// Arguments for the init-table command
#[derive(Parser, Debug)]
pub struct InitTableArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_init_table(args: InitTableArgs) -> Result<()> {
    let store = PgStore::new(args.database.database(reqwest::Client::new())?);

    store
        .ensure_schema()
        .await
        .context("Failed to create human evaluations table")?;

    println!("Human evaluations table initialized");
    Ok(())
}
