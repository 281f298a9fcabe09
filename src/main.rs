//! personafill - profile-driven web form filler
//!
//! Main entry point for the personafill CLI.

mod cli;
mod cmd_fill;
mod cmd_serve;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use personafill_browser_cdp::CdpFormPage;
use personafill_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig, ValidationWarning};
use personafill_core::FillEngine;

use crate::cli::{Cli, Commands};

/// Load and validate the configuration. A missing file means defaults.
fn load_config(path: &Path) -> anyhow::Result<(Config, Vec<ValidationWarning>)> {
    let config = ConfigLoader::load_or_default(path)
        .with_context(|| format!("Failed to load config {}", path.display()))?;
    let warnings = ConfigValidator::validate(&config)?
        .into_result()
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok((config, warnings))
}

/// Initialize tracing with console and optional file output.
///
/// Console output goes to stderr; stdout carries only reports and responses.
/// Log files are written to `logging.dir` with daily rotation.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let file_layer = if logging.file {
        let log_dir = PathBuf::from(ConfigLoader::expand_path(&logging.dir));
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("personafill")
            .filename_suffix("log")
            .max_log_files(30)
            .build(&log_dir)?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Keep the writer alive for the program duration.
        static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
            std::sync::OnceLock::new();
        let _ = GUARD.set(guard);

        Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
    } else {
        None
    };

    // RUST_LOG wins over the configured level.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(ConfigLoader::default_path);
    let (config, warnings) = load_config(&config_path)?;
    init_tracing(&config.logging)?;

    for warning in &warnings {
        warn!("Config warning at {}: {}", warning.path, warning.message);
    }
    info!(
        "personafill v{} (config: {})",
        env!("CARGO_PKG_VERSION"),
        config_path.display()
    );

    let engine = FillEngine::new(&config).context("Invalid discovery or matcher configuration")?;

    match cli.command {
        Commands::Fill { profile, browser } => {
            cmd_fill::fill(&config, &engine, &profile, &browser).await
        }
        Commands::Inspect {
            profile,
            format,
            browser,
        } => cmd_fill::inspect(&config, &engine, profile.as_deref(), format, &browser).await,
        Commands::Replay { snapshot, profile } => {
            cmd_fill::replay(&engine, &snapshot, &profile).await
        }
        Commands::ServeStdio { browser } => {
            let page = CdpFormPage::connect(&browser.apply(&config.browser))
                .await
                .context("Failed to attach to the browser page")?;
            cmd_serve::serve_stdio(&engine, &page).await
        }
    }
}
