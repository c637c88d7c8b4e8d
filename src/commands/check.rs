//! # Check Command Implementation
//!
//! This module implements the `check` subcommand, a read-only report on
//! whether both native projects encode the update-delivery configuration
//! the app declares.
//!
//! ## Functionality
//!
//! - **Desired-state summary**: resolves and prints the update URL and the
//!   effective runtime/SDK version, exactly as `configure` would apply
//!   them.
//! - **Per-platform verdict**: evaluates the same predicates the mutating
//!   pass uses, so `check` can never disagree with what `configure` would
//!   do.
//! - **Exit code**: a project that is not fully configured fails with a
//!   non-zero exit, which makes the command usable as a CI guard.
//!
//! This command is a safe, read-only operation that does not modify any
//! files.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use ota_sync::output::{emoji, OutputConfig};
use ota_sync::reconcile::{DesiredUpdates, UPDATES_PACKAGE};
use ota_sync::{account, android, config, ios};

/// Report whether both native projects match the app configuration
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Project directory (defaults to the current directory)
    #[arg(value_name = "PROJECT_DIR")]
    pub project_dir: Option<PathBuf>,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, output: OutputConfig) -> Result<()> {
    let project_dir = match args.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !project_dir.is_dir() {
        anyhow::bail!("Project directory not found: {}", project_dir.display());
    }

    let config = config::load(&project_dir)?;
    if !config.pkg.has_dependency(UPDATES_PACKAGE) {
        println!(
            "{} expo-updates is not installed in this project; nothing to check",
            emoji(&output, "⏭️ ", "[SKIP]")
        );
        return Ok(());
    }

    let account = account::current_account_name();
    let desired = DesiredUpdates::resolve(&config.exp, account.as_deref())?;

    println!(
        "Checking update-delivery configuration in {}",
        project_dir.display()
    );
    println!("   Update URL: {}", desired.update_url);
    let (runtime, sdk) = desired.effective_versions();
    if let Some(runtime) = runtime {
        println!("   Runtime version: {}", runtime);
    } else if let Some(sdk) = sdk {
        println!("   SDK version: {}", sdk);
    }
    println!();

    let android_ok = android::is_configured(&project_dir, &desired)?;
    let ios_ok = ios::is_configured(&project_dir, &desired)?;
    print_platform(&output, "Android", android_ok);
    print_platform(&output, "iOS", ios_ok);
    println!();

    if android_ok && ios_ok {
        println!(
            "{} Both platforms are configured",
            emoji(&output, "✅", "[OK]")
        );
        Ok(())
    } else {
        anyhow::bail!("Project is not fully configured. Run 'ota-sync configure' to fix it.");
    }
}

fn print_platform(output: &OutputConfig, name: &str, configured: bool) {
    if configured {
        println!("   {} {}: configured", emoji(output, "✅", "[OK]"), name);
    } else {
        println!(
            "   {} {}: not configured",
            emoji(output, "❌", "[ERR]"),
            name
        );
    }
}
