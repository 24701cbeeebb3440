//! Command-line interface for browsing tables through the page cache.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands, ViewArgs};

use anyhow::Result;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LoggerImpl;

/// Resolve configuration for a parsed command line.
///
/// `--config` replaces the project config files; `--database` wins over both.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(ref database) = cli.database {
        config.database.path.clone_from(database);
    }

    Ok(config)
}

/// Load configuration, start logging and dispatch the command.
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let _logger = LoggerImpl::init(&config.logging)?;

    match cli.command {
        Commands::Columns { table } => commands::columns::execute(&config, &table, cli.json).await,
        Commands::Browse {
            table,
            start,
            count,
            view,
        } => commands::browse::execute(&config, &table, start, count, &view, cli.json).await,
        Commands::Cell {
            table,
            row,
            column,
            view,
        } => commands::cell::execute(&config, &table, row, &column, &view, cli.json).await,
    }
}

/// Report a failed command and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json: bool) -> ! {
    if json {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        let output = serde_json::json!({ "error": err.to_string(), "causes": chain });
        eprintln!("{output}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
