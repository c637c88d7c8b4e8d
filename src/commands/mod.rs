//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `ota-sync` command-line tool. Each subcommand is defined in its own file
//! to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! The `execute` function is the main entry point for the command and is
//! responsible for orchestrating the necessary operations, calling into the
//! `ota_sync` library to perform the core reconciliation logic.
//!
//! The mutating commands (`configure`, `sync-versions`) share the guided
//! review-and-commit step that runs when a pass leaves uncommitted changes
//! in the project's working tree.

use std::path::Path;

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};

use ota_sync::git;

pub mod check;
pub mod completions;
pub mod configure;
pub mod sync_versions;

/// Walk the operator through committing the changes a pass left behind.
///
/// Shows the short status, asks for confirmation and a commit message, then
/// runs `git add -A` and `git commit`. In non-interactive mode, or when the
/// operator declines, this aborts with an instruction to commit manually
/// and re-run.
pub(crate) fn guided_commit(
    project_dir: &Path,
    interactive: bool,
    default_message: &str,
) -> Result<()> {
    let status = git::status_short(project_dir)?;
    println!();
    println!("⚠️  The working tree has uncommitted changes:");
    println!();
    for line in status.lines() {
        println!("   {}", line);
    }
    println!();

    if !interactive {
        anyhow::bail!(
            "Uncommitted changes remain in {}. Commit them and run the command again.",
            project_dir.display()
        );
    }

    let theme = ColorfulTheme::default();
    let commit_now = Confirm::with_theme(&theme)
        .with_prompt("Commit these changes now?")
        .default(true)
        .interact()?;

    if !commit_now {
        anyhow::bail!("Aborted. Commit the changes listed above and run the command again.");
    }

    let message: String = Input::with_theme(&theme)
        .with_prompt(format!("Commit message [{}]", default_message))
        .allow_empty(true)
        .interact_text()?;
    let message = message.trim();
    let message = if message.is_empty() {
        default_message
    } else {
        message
    };

    git::add_all(project_dir)
        .and_then(|()| git::commit(project_dir, message))
        .context("The commit failed. Commit the changes manually and run the command again.")?;

    println!("✅ Committed changes: {}", message);
    Ok(())
}
