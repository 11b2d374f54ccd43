//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use crate::config::{read_config, LoggingConfig};
use crate::logging::parse_log_level;
use clap::{Parser, Subcommand};

/// firestore-export - dump Firestore collections to JSON files
#[derive(Parser, Debug)]
#[command(name = "firestore-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "firestore-export.toml",
        env = "FSEXPORT_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FSEXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the configured collections to <collection>.json files
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Cli {
    /// Log level and logging configuration to start up with
    ///
    /// The `[application]` and `[logging]` sections are taken from the config
    /// file whenever it parses, even if other sections fail validation, so the
    /// command's own error ends up in the configured log file. The `--log-level`
    /// flag wins over the file.
    pub fn logging_settings(&self) -> (String, LoggingConfig) {
        let (config_level, logging) = match read_config(&self.config) {
            Ok(config) => {
                let level = parse_log_level(&config.application.log_level)
                    .is_ok()
                    .then_some(config.application.log_level);
                let logging = match config.logging.validate() {
                    Ok(()) => config.logging,
                    Err(_) => LoggingConfig::console_only(),
                };
                (level, logging)
            }
            Err(_) => (None, LoggingConfig::console_only()),
        };

        let level = self
            .log_level
            .clone()
            .or(config_level)
            .unwrap_or_else(|| "info".to_string());

        (level, logging)
    }

    /// Execute the selected command and return the process exit code
    pub async fn execute(&self) -> anyhow::Result<i32> {
        match &self.command {
            Commands::Export(args) => args.execute(&self.config).await,
            Commands::ValidateConfig(args) => args.execute(&self.config).await,
            Commands::Init(args) => args.execute().await,
        }
    }
}
