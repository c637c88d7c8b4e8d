use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Run a git subcommand in `project_dir` and capture its stdout.
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Any authentication configured in ~/.gitconfig
fn git_output(project_dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(project_dir)
        .args(args)
        .output()
        .map_err(|e| Error::Git {
            command: args.join(" "),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Git {
            command: args.join(" "),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Whether `project_dir` is inside a git work tree.
///
/// Any git failure (no repository, no git binary) is reported as `false`,
/// not an error: projects outside version control are valid reconciliation
/// targets, they just get no staging or clean-tree handling.
pub fn is_inside_work_tree(project_dir: &Path) -> bool {
    git_output(project_dir, &["rev-parse", "--is-inside-work-tree"])
        .map(|out| out.trim() == "true")
        .unwrap_or(false)
}

/// Whether the working tree has no uncommitted changes.
pub fn is_working_tree_clean(project_dir: &Path) -> Result<bool> {
    let status = git_output(project_dir, &["status", "--porcelain"])?;
    Ok(status.trim().is_empty())
}

/// Record an intent-to-add for a newly created file.
///
/// Keeps `git status` aware of files the reconciler creates without
/// staging their content. A no-op for already-tracked files.
pub fn stage_intent_to_add(project_dir: &Path, path: &Path) -> Result<()> {
    let path = path.to_string_lossy();
    git_output(project_dir, &["add", "--intent-to-add", "--", path.as_ref()])?;
    Ok(())
}

/// The short-format status listing, for showing the operator what a guided
/// commit would include.
pub fn status_short(project_dir: &Path) -> Result<String> {
    git_output(project_dir, &["status", "--short"])
}

/// Stage every change in the working tree.
pub fn add_all(project_dir: &Path) -> Result<()> {
    git_output(project_dir, &["add", "-A"])?;
    Ok(())
}

/// Create a commit with the given message from the staged changes.
pub fn commit(project_dir: &Path, message: &str) -> Result<()> {
    git_output(project_dir, &["commit", "-m", message])?;
    Ok(())
}
