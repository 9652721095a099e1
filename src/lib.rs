pub mod cli;
pub mod core;
pub mod page;
pub mod providers;

// Re-export for tests and external use
pub use crate::core::config;

use crate::core::cache::Cache;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Render {
        output: Option<PathBuf>,
        strict: bool,
    },
    Summary {
        strict: bool,
    },
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxdash starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let cache = Arc::new(Cache::new());
    let provider = providers::CsvObservationProvider::new(Arc::clone(&cache));

    match command {
        AppCommand::Render { output, strict } => {
            let snapshot =
                cli::render::load_snapshot(&config, &provider, strict || config.strict)?;
            let output = cli::render::output_path(&config, output.as_deref());
            cli::render::run(&snapshot, &config, &output)
        }
        AppCommand::Summary { strict } => {
            let snapshot =
                cli::render::load_snapshot(&config, &provider, strict || config.strict)?;
            cli::summary::run(&snapshot);
            Ok(())
        }
    }
}
