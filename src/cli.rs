//! CLI definitions for personafill.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use personafill_config::BrowserConfig;

/// personafill CLI.
#[derive(Parser)]
#[command(name = "personafill")]
#[command(about = "Fill web forms from a stored profile")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.personafill/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fill the current browser page from a profile
    Fill {
        /// Profile JSON file
        #[arg(short, long)]
        profile: PathBuf,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// List the fields detected on the current browser page
    Inspect {
        /// Also show which attribute each field would receive
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[command(flatten)]
        browser: BrowserArgs,
    },

    /// Fill a saved snapshot offline and print the report
    Replay {
        /// Snapshot JSON file
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Profile JSON file
        #[arg(short, long)]
        profile: PathBuf,
    },

    /// Serve newline-delimited JSON requests on stdin/stdout
    ServeStdio {
        #[command(flatten)]
        browser: BrowserArgs,
    },
}

/// Browser connection overrides.
#[derive(Args, Clone, Default)]
pub(crate) struct BrowserArgs {
    /// Chrome debugging endpoint
    #[arg(long, env = "PERSONAFILL_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Page to attach to: target id or URL substring
    #[arg(long)]
    pub target: Option<String>,
}

impl BrowserArgs {
    /// Apply the overrides on top of the configured browser section.
    pub fn apply(&self, config: &BrowserConfig) -> BrowserConfig {
        let mut config = config.clone();
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(target) = &self.target {
            config.target = Some(target.clone());
        }
        config
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}
