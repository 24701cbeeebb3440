//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rowpager")]
#[command(about = "Browse database tables through a paged row cache", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// SQLite database file (overrides the configured path)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Configuration file (defaults to .rowpager/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the columns of a table
    Columns {
        /// Table or view name
        table: String,
    },

    /// Print a window of rows read through the page cache
    Browse {
        /// Table or view name
        table: String,

        /// First row to print
        #[arg(short, long, default_value = "0")]
        start: usize,

        /// Number of rows to print
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print a single cell
    Cell {
        /// Table or view name
        table: String,

        /// Row index within the (filtered) view
        row: usize,

        /// Column index or name
        column: String,

        #[command(flatten)]
        view: ViewArgs,
    },
}

/// Options shaping the cached view of a table
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Only show rows where this column equals --filter-value
    #[arg(long, requires = "filter_value")]
    pub filter_field: Option<String>,

    /// Value compared against --filter-field
    #[arg(long, requires = "filter_field")]
    pub filter_value: Option<String>,

    /// Rows per cached page (overrides configuration)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Resident page slots (overrides configuration)
    #[arg(long)]
    pub max_pages: Option<usize>,
}
