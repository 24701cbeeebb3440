//! SQLite table (or view) as a row source.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row as _, SqlitePool, TypeInfo, ValueRef};
use tracing::debug;

use crate::domain::errors::{RowSourceError, RowSourceResult};
use crate::domain::models::{CellValue, Row, RowFilter, RowTable};
use crate::domain::ports::RowSource;

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Pages through one table with `LIMIT`/`OFFSET` in a stable key order.
///
/// Rows are ordered by the primary-key columns when there are any, by
/// `rowid` for plain tables without one, and by every selected column for
/// views, so repeated fetches of one page see the same rows.
#[derive(Debug, Clone)]
pub struct SqliteTableSource {
    pool: SqlitePool,
    table: String,
    columns: Vec<String>,
    select_list: String,
    order_by: String,
}

impl SqliteTableSource {
    /// Resolve `table` and its columns. Fails with `UnknownTable` if the
    /// database has no table or view by that name.
    pub async fn open(pool: SqlitePool, table: &str) -> RowSourceResult<Self> {
        let kind: Option<String> = sqlx::query_scalar(
            "SELECT type FROM sqlite_master WHERE name = ? AND type IN ('table', 'view')",
        )
        .bind(table)
        .fetch_optional(&pool)
        .await?;
        let kind = kind.ok_or_else(|| RowSourceError::UnknownTable(table.to_string()))?;

        let pragma = format!("PRAGMA table_info({})", quote_identifier(table));
        let info = sqlx::query(&pragma).fetch_all(&pool).await?;

        let mut columns = Vec::with_capacity(info.len());
        let mut key_columns: Vec<(i64, String)> = Vec::new();
        for row in &info {
            let name: String = row.try_get("name")?;
            let pk: i64 = row.try_get("pk")?;
            if pk > 0 {
                key_columns.push((pk, name.clone()));
            }
            columns.push(name);
        }
        key_columns.sort_by_key(|(pk, _)| *pk);

        let select_list = columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(", ");

        let order_by = if !key_columns.is_empty() {
            key_columns
                .iter()
                .map(|(_, name)| quote_identifier(name))
                .collect::<Vec<_>>()
                .join(", ")
        } else if kind == "table" {
            "rowid".to_string()
        } else {
            select_list.clone()
        };

        debug!(table, columns = columns.len(), order_by = %order_by, "opened table source");

        Ok(Self {
            pool,
            table: table.to_string(),
            columns,
            select_list,
            order_by,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn where_clause(&self, filter: Option<&RowFilter>) -> RowSourceResult<String> {
        let Some(filter) = filter else {
            return Ok(String::new());
        };
        if !self.columns.iter().any(|c| c == &filter.field) {
            return Err(RowSourceError::UnknownColumn {
                table: self.table.clone(),
                column: filter.field.clone(),
            });
        }
        Ok(format!(" WHERE {} = ?", quote_identifier(&filter.field)))
    }

    fn decode_row(&self, row: &SqliteRow) -> RowSourceResult<Row> {
        (0..row.len()).map(|idx| self.decode_cell(row, idx)).collect()
    }

    /// Decode by the value's storage class rather than the declared type.
    fn decode_cell(&self, row: &SqliteRow, idx: usize) -> RowSourceResult<CellValue> {
        let decode_err = |e: sqlx::Error| RowSourceError::Decode {
            column: self.columns.get(idx).cloned().unwrap_or_else(|| idx.to_string()),
            reason: e.to_string(),
        };

        let raw = row.try_get_raw(idx).map_err(decode_err)?;
        if raw.is_null() {
            return Ok(CellValue::Null);
        }
        let storage_class = raw.type_info().name().to_string();

        let value = match storage_class.as_str() {
            "INTEGER" | "BOOLEAN" => CellValue::Integer(row.try_get_unchecked(idx).map_err(decode_err)?),
            "REAL" => CellValue::Real(row.try_get_unchecked(idx).map_err(decode_err)?),
            "BLOB" => CellValue::Blob(row.try_get_unchecked(idx).map_err(decode_err)?),
            _ => CellValue::Text(row.try_get_unchecked(idx).map_err(decode_err)?),
        };
        Ok(value)
    }
}

#[async_trait]
impl RowSource for SqliteTableSource {
    async fn row_count(&self, filter: Option<&RowFilter>) -> RowSourceResult<usize> {
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            quote_identifier(&self.table),
            self.where_clause(filter)?
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(filter) = filter {
            query = query.bind(filter.value.as_str());
        }
        let count = query.fetch_one(&self.pool).await?;

        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn columns(&self) -> RowSourceResult<Vec<String>> {
        Ok(self.columns.clone())
    }

    async fn fetch_page(
        &self,
        start: usize,
        page_size: usize,
        filter: Option<&RowFilter>,
    ) -> RowSourceResult<RowTable> {
        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY {} LIMIT ? OFFSET ?",
            self.select_list,
            quote_identifier(&self.table),
            self.where_clause(filter)?,
            self.order_by
        );

        let mut query = sqlx::query(&sql);
        if let Some(filter) = filter {
            query = query.bind(filter.value.as_str());
        }
        let rows = query
            .bind(i64::try_from(page_size).unwrap_or(i64::MAX))
            .bind(i64::try_from(start).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| self.decode_row(row)).collect()
    }
}
