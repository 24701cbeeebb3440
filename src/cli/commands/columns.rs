use anyhow::{Context, Result};
use tracing::instrument;

use super::open_table;
use crate::domain::models::Config;
use crate::domain::ports::RowSource;

/// Handle columns command
#[instrument(skip(config))]
pub async fn execute(config: &Config, table: &str, json: bool) -> Result<()> {
    let source = open_table(config, table).await?;
    let columns = source
        .columns()
        .await
        .context("Failed to read column names")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&columns)?);
    } else {
        for (idx, name) in columns.iter().enumerate() {
            println!("{idx:>3}  {name}");
        }
    }

    Ok(())
}
