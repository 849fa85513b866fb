use anyhow::Result;
use clap::Parser;
use wuzzuf_pulse::app_log;
use wuzzuf_pulse::cli::{handle_command, Cli};
use wuzzuf_pulse::{logging, ConfigManager};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration first: it decides the log level and log file
    let config = ConfigManager::load(cli.config.as_deref())?;
    logging::init(&config.logging)?;

    app_log!(info, "Environment: {}", config.environment);
    app_log!(info, "Data directory: {}", config.storage.data_dir.display());

    handle_command(cli.command, &config).await
}
