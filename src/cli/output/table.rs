//! Table output formatting for CLI commands
//!
//! Renders rows read through the page cache, and cache statistics, using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::CellValue;
use crate::services::CacheStats;

/// Widest cell text shown before truncation
const MAX_CELL_WIDTH: usize = 40;

/// One printed row: its index in the view and one entry per column
pub type DisplayRow = (usize, Vec<Option<CellValue>>);

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format rows under their column headers, prefixed with the row index
    pub fn format_rows(&self, columns: &[String], rows: &[DisplayRow]) -> String {
        let mut table = self.create_base_table();

        let mut header = vec![Cell::new("#").add_attribute(Attribute::Bold)];
        header.extend(
            columns
                .iter()
                .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
        );
        table.set_header(header);

        for (index, values) in rows {
            let mut cells = vec![Cell::new(index)];
            cells.extend(values.iter().map(|v| self.value_cell(v.as_ref())));
            table.add_row(cells);
        }

        table.to_string()
    }

    /// Format cache counters as a two-column table
    pub fn format_stats(&self, stats: &CacheStats, used_pages: usize) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Cache").add_attribute(Attribute::Bold),
            Cell::new("Count").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("Resident pages"), Cell::new(used_pages)]);
        table.add_row(vec![Cell::new("Hits"), Cell::new(stats.hits)]);
        table.add_row(vec![Cell::new("Misses"), Cell::new(stats.misses)]);
        table.add_row(vec![Cell::new("Evictions"), Cell::new(stats.evictions)]);
        table.add_row(vec![Cell::new("Fetches"), Cell::new(stats.fetches)]);

        table.to_string()
    }

    fn value_cell(&self, value: Option<&CellValue>) -> Cell {
        match value {
            None => Cell::new("-"),
            Some(CellValue::Null) if self.use_colors => Cell::new("NULL").fg(Color::DarkGrey),
            Some(v) => Cell::new(truncate_text(&v.to_string(), MAX_CELL_WIDTH)),
        }
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        // Use UTF-8 preset for nice borders
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
