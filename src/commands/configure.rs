//! # Configure Command Implementation
//!
//! This module implements the `configure` subcommand, which runs a full
//! reconciliation pass over both native projects: the build-script hooks,
//! the update URL, and the runtime/SDK version entries are all brought in
//! line with the app configuration.
//!
//! ## Functionality
//!
//! - **Idempotent**: a project that already matches the desired state is
//!   left byte-identical and reported as up to date.
//! - **Skip sentinel**: projects without the `expo-updates` dependency are
//!   skipped silently rather than treated as an error.
//! - **Guided recovery**: when the pass mutates files inside a git work
//!   tree, the operator is walked through reviewing and committing them
//!   (suppressed by `--non-interactive`).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use ota_sync::output::{self, OutputConfig};
use ota_sync::reconcile::{self, Outcome, SyncMode};

/// Default commit message offered by the guided commit step.
const DEFAULT_COMMIT_MESSAGE: &str = "Configure expo-updates";

/// Configure update delivery in both native projects
#[derive(Args, Debug)]
pub struct ConfigureArgs {
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

/// Execute the `configure` command.
pub fn execute(args: ConfigureArgs, mut output: OutputConfig) -> Result<()> {
    output.quiet = args.quiet;

    let project_dir = match args.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !project_dir.is_dir() {
        anyhow::bail!("Project directory not found: {}", project_dir.display());
    }

    let spinner = output::spinner(&output, "Configuring update delivery...");
    let outcome = reconcile::run(&project_dir, SyncMode::Full);
    spinner.finish_and_clear();

    match outcome? {
        Outcome::Skipped => {
            output.progress(
                "⏭️  expo-updates is not installed in this project; nothing to configure",
            );
            Ok(())
        }
        Outcome::Completed { changed: false } => {
            output.progress("✅ expo-updates is already configured");
            Ok(())
        }
        Outcome::Completed { changed: true } => {
            output.progress("✅ Configured expo-updates");
            Ok(())
        }
        Outcome::NeedsCommit => {
            super::guided_commit(&project_dir, !args.non_interactive, DEFAULT_COMMIT_MESSAGE)
        }
    }
}
