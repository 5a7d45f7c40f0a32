//! Ad-hoc SQL through the managed connection

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::{Column, Row};

use super::DatabaseArgs;

/// Arguments for the query command
#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// SQL statement to execute
    pub sql: String,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_query(args: QueryArgs) -> Result<()> {
    let db = args.database.database(reqwest::Client::new())?;

    let rows = db.query(&args.sql).await.context("Query failed")?;

    if let Some(first) = rows.first() {
        let columns: Vec<&str> = first.columns().iter().map(|c| c.name()).collect();
        println!("{}", columns.join("\t"));
    }
    println!("({} rows)", rows.len());
    Ok(())
}
