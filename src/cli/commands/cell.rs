use anyhow::{Context, Result};
use serde_json::json;
use tracing::instrument;

use super::open_view;
use crate::cli::types::ViewArgs;
use crate::domain::models::Config;

/// Resolve a column given either as an index or as a name.
pub fn resolve_column(columns: &[String], column: &str) -> Result<usize> {
    if let Ok(idx) = column.parse::<usize>() {
        return Ok(idx);
    }
    columns
        .iter()
        .position(|c| c.eq_ignore_ascii_case(column))
        .with_context(|| format!("Unknown column: {column}"))
}

/// Handle cell command
#[instrument(skip(config, view))]
pub async fn execute(
    config: &Config,
    table: &str,
    row: usize,
    column: &str,
    view: &ViewArgs,
    json: bool,
) -> Result<()> {
    let mut cache = open_view(config, table, view).await?;
    let columns = cache.columns().await.context("Failed to read column names")?;
    let column_idx = resolve_column(&columns, column)?;

    let value = cache
        .retrieve_element(row, column_idx)
        .await
        .with_context(|| format!("Failed to read row {row}"))?;

    if json {
        let output = json!({
            "row": row,
            "column": columns.get(column_idx),
            "value": value,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match value {
            Some(v) => println!("{v}"),
            None => println!("(no value)"),
        }
    }

    Ok(())
}
