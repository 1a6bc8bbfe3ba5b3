pub mod cli;
pub mod core;
pub mod orchestrator;
pub mod providers;

use crate::cli::RangeOptions;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Table(RangeOptions),
    Chart(RangeOptions),
    Explain { date: String, room_type: String },
    Dashboard,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Hotel revenue manager starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Table(options) => cli::table::run(&options, &config).await,
        AppCommand::Chart(options) => cli::chart::run(&options, &config).await,
        AppCommand::Explain { date, room_type } => cli::explain::run(&date, &room_type, &config),
        AppCommand::Dashboard => cli::dashboard::run(&config).await,
    }
}
