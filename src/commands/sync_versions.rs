//! # Sync-Versions Command Implementation
//!
//! This module implements the `sync-versions` subcommand, a restricted
//! reconciliation pass that updates only the runtime/SDK version entries in
//! the native projects. Build-script hooks and the update URL are left
//! exactly as found, which makes this pass safe to run after every version
//! bump without re-running the full configuration.
//!
//! The recovery behavior matches `configure`: a pass that mutates files
//! inside a dirty git work tree surfaces the guided commit step.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use ota_sync::output::{self, OutputConfig};
use ota_sync::reconcile::{self, Outcome, SyncMode};

/// Default commit message offered by the guided commit step.
const DEFAULT_COMMIT_MESSAGE: &str = "Sync expo-updates versions";

/// Sync only the runtime/SDK version entries into the native projects
#[derive(Args, Debug)]
pub struct SyncVersionsArgs {
    /// Project directory (defaults to the current directory)
    #[arg(value_name = "PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,

    /// Never prompt; fail instead of offering the guided commit
    #[arg(long)]
    pub non_interactive: bool,

    /// Suppress all output except errors and prompts
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `sync-versions` command.
pub fn execute(args: SyncVersionsArgs, mut output: OutputConfig) -> Result<()> {
    output.quiet = args.quiet;

    let project_dir = match args.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !project_dir.is_dir() {
        anyhow::bail!("Project directory not found: {}", project_dir.display());
    }

    let spinner = output::spinner(&output, "Syncing update versions...");
    let outcome = reconcile::run(&project_dir, SyncMode::VersionsOnly);
    spinner.finish_and_clear();

    match outcome? {
        Outcome::Skipped => {
            output.progress("⏭️  expo-updates is not installed in this project; nothing to sync");
            Ok(())
        }
        Outcome::Completed { changed: false } => {
            output.progress("✅ Update versions are already in sync");
            Ok(())
        }
        Outcome::Completed { changed: true } => {
            output.progress("✅ Synced update versions");
            Ok(())
        }
        Outcome::NeedsCommit => {
            super::guided_commit(&project_dir, !args.non_interactive, DEFAULT_COMMIT_MESSAGE)
        }
    }
}
