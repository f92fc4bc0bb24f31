// Folio workspace console
// Main entry point for the folio binary

use clap::Parser;
use folio_engine::cli::{Cli, Command};
use folio_engine::config::Config;
use folio_engine::handlers::{
    handle_analyze, handle_doctor, handle_exec, handle_files, handle_key, handle_shell,
    OutputFormat,
};
use folio_engine::telemetry::init_telemetry_with_level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // --log overrides the config level; RUST_LOG still wins over both
    if let Some(level) = &cli.log {
        config.core.log_level = level.clone();
        config.validate_and_process()?;
    }
    init_telemetry_with_level(&config.core.log_level);

    tracing::info!(
        "Folio v{} ({} - {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT_HASH"),
        env!("BUILD_TIMESTAMP")
    );

    match cli.command {
        Command::Shell => handle_shell(&config, format).await,
        Command::Exec { lines } => {
            tracing::info!("Executing {} console line(s)", lines.len());
            handle_exec(lines, &config, format).await
        }
        Command::Files => handle_files(&config, format).await,
        Command::Key { action } => handle_key(action, &config, format).await,
        Command::Doctor => {
            tracing::info!("Running diagnostics...");
            handle_doctor(&config, format).await
        }
        Command::Analyze { title } => handle_analyze(&title.join(" "), &config, format).await,
    }
}
