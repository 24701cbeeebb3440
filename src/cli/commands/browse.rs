use anyhow::{Context, Result};
use serde_json::json;
use tracing::{debug, instrument};

use super::open_view;
use crate::cli::output::{DisplayRow, TableFormatter};
use crate::cli::types::ViewArgs;
use crate::domain::errors::RowSourceResult;
use crate::domain::models::Config;
use crate::domain::ports::RowSource;
use crate::services::PagedCache;

/// Read rows `start..start + count` cell by cell through the cache.
///
/// The window is clipped to the row count seen when the cache was built.
pub async fn read_window<S: RowSource>(
    cache: &mut PagedCache<S>,
    column_count: usize,
    start: usize,
    count: usize,
) -> RowSourceResult<Vec<DisplayRow>> {
    let end = start.saturating_add(count).min(cache.row_count());
    let mut rows = Vec::with_capacity(end.saturating_sub(start));

    for row in start..end {
        let mut values = Vec::with_capacity(column_count);
        for column in 0..column_count {
            values.push(cache.retrieve_element(row, column).await?);
        }
        rows.push((row, values));
    }

    Ok(rows)
}

/// Handle browse command
#[instrument(skip(config, view))]
pub async fn execute(
    config: &Config,
    table: &str,
    start: usize,
    count: usize,
    view: &ViewArgs,
    json: bool,
) -> Result<()> {
    let mut cache = open_view(config, table, view).await?;
    let columns = cache.columns().await.context("Failed to read column names")?;

    let rows = read_window(&mut cache, columns.len(), start, count)
        .await
        .context("Failed to read rows")?;
    let stats = cache.stats();
    debug!(?stats, used_pages = cache.used_pages(), "browse finished");

    if json {
        let rows: Vec<_> = rows
            .iter()
            .map(|(index, values)| json!({ "index": index, "values": values }))
            .collect();
        let output = json!({
            "table": table,
            "total_rows": cache.row_count(),
            "columns": columns,
            "rows": rows,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No rows in range (view has {} rows).", cache.row_count());
        return Ok(());
    }

    let formatter = TableFormatter::new();
    println!("{}", formatter.format_rows(&columns, &rows));
    println!(
        "\nShowing rows {}-{} of {}",
        rows[0].0,
        rows[rows.len() - 1].0,
        cache.row_count()
    );
    println!("{}", formatter.format_stats(&stats, cache.used_pages()));

    Ok(())
}
