//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use ota_sync::output::OutputConfig;

use crate::commands;

/// Keep native update-delivery settings in sync with the app configuration
#[derive(Parser, Debug)]
#[command(name = "ota-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configure update delivery in both native projects
    Configure(commands::configure::ConfigureArgs),
    /// Sync only the runtime/SDK version entries into the native projects
    SyncVersions(commands::sync_versions::SyncVersionsArgs),
    /// Report whether both native projects match the app configuration
    Check(commands::check::CheckArgs),
    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let filter: log::LevelFilter = self
            .log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid log level: {}", self.log_level))?;
        env_logger::Builder::new()
            .filter_level(filter)
            .try_init()
            .ok();

        let output = OutputConfig::from_env_and_flag(&self.color, false);

        match self.command {
            Commands::Configure(args) => commands::configure::execute(args, output),
            Commands::SyncVersions(args) => commands::sync_versions::execute(args, output),
            Commands::Check(args) => commands::check::execute(args, output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
