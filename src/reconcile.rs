//! # Reconciliation Core
//!
//! Declarative synchronization of native project files with the
//! update-delivery configuration an app declares. One desired state is
//! resolved from the app configuration, each platform reads its current
//! state fresh from disk, and a structured diff decides which files get
//! mutated. Running twice is a no-op by construction: the predicate that
//! says "configured" and the mutation that configures consume the same
//! diff.
//!
//! ## Key Components
//!
//! - [`DesiredUpdates`]: the resolved target configuration (update URL and
//!   the declared runtime or SDK version). Derived per run, never stored.
//! - [`UpdatesState`]: what one platform currently encodes on disk.
//! - [`ConfigDiff`]: the delta between the two; empty means configured.
//! - [`SyncMode`]: full reconciliation, or the version entries only.
//! - [`Outcome`]: the tagged result of a pass. A dirty working tree after
//!   mutation is the [`Outcome::NeedsCommit`] variant, not an error.
//! - [`run`]: the sequential Android-then-iOS pass behind the
//!   `configure` and `sync-versions` commands.

use std::path::{Path, PathBuf};

use url::Url;

use crate::config::{self, ExpConfig};
use crate::error::{Error, Result};
use crate::{account, android, git, ios};

/// Package whose presence in `dependencies` opts a project into
/// update-delivery configuration.
pub const UPDATES_PACKAGE: &str = "expo-updates";

/// Which entries a reconciliation pass is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Script hooks, update URL, and version entries.
    Full,
    /// Version entries only; hooks and URL are left as found.
    VersionsOnly,
}

/// The resolved target configuration for both platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredUpdates {
    pub update_url: String,
    pub runtime_version: Option<String>,
    pub sdk_version: Option<String>,
}

impl DesiredUpdates {
    /// Resolve the desired state from the declared app configuration and
    /// the signed-in account, if any.
    ///
    /// The update URL is the declared `updates.url` when present (validated
    /// but used verbatim), otherwise derived as
    /// `https://exp.host/@{owner}/{slug}` where the owner falls back to the
    /// account name and finally to `anonymous`.
    pub fn resolve(exp: &ExpConfig, account: Option<&str>) -> Result<Self> {
        if exp.runtime_version.is_none() && exp.sdk_version.is_none() {
            return Err(Error::MissingVersion);
        }

        let update_url = match exp.declared_update_url() {
            Some(declared) => {
                Url::parse(declared)?;
                declared.to_string()
            }
            None => {
                let owner = exp.owner.as_deref().or(account).unwrap_or("anonymous");
                format!("https://exp.host/@{}/{}", owner, exp.slug)
            }
        };

        Ok(Self {
            update_url,
            runtime_version: exp.runtime_version.clone(),
            sdk_version: exp.sdk_version.clone(),
        })
    }

    /// The effective version entry pair `(runtime, sdk)`.
    ///
    /// A declared runtime version wins; the SDK version is only written
    /// when no runtime version exists. The entry that loses must be absent
    /// on disk, so exactly one side of the pair is ever `Some`.
    pub fn effective_versions(&self) -> (Option<&str>, Option<&str>) {
        if let Some(runtime) = self.runtime_version.as_deref() {
            (Some(runtime), None)
        } else {
            (None, self.sdk_version.as_deref())
        }
    }
}

/// What one platform currently encodes on disk. Read fresh per pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatesState {
    pub has_script_hook: bool,
    pub update_url: Option<String>,
    pub runtime_version: Option<String>,
    pub sdk_version: Option<String>,
}

/// The delta between desired and current state.
///
/// Both the `is_configured` predicates and the mutation passes consume
/// this struct, so they cannot drift apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigDiff {
    pub needs_script_hook: bool,
    pub needs_url: bool,
    pub needs_version: bool,
}

impl ConfigDiff {
    /// Compare a desired configuration against an observed state.
    ///
    /// The version comparison covers both entries of the effective pair,
    /// so a stale value under the losing key forces a corrective write.
    pub fn between(desired: &DesiredUpdates, state: &UpdatesState) -> Self {
        let (runtime, sdk) = desired.effective_versions();
        Self {
            needs_script_hook: !state.has_script_hook,
            needs_url: state.update_url.as_deref() != Some(desired.update_url.as_str()),
            needs_version: state.runtime_version.as_deref() != runtime
                || state.sdk_version.as_deref() != sdk,
        }
    }

    /// Drop the parts of the diff a restricted mode must not touch.
    pub fn restrict(self, mode: SyncMode) -> Self {
        match mode {
            SyncMode::Full => self,
            SyncMode::VersionsOnly => Self {
                needs_script_hook: false,
                needs_url: false,
                needs_version: self.needs_version,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.needs_script_hook || self.needs_url || self.needs_version)
    }
}

/// Files a platform pass touched on disk.
#[derive(Debug, Clone, Default)]
pub struct PlatformChanges {
    /// Every file written, in write order.
    pub written: Vec<PathBuf>,
    /// The subset of `written` that did not exist before the pass.
    pub created: Vec<PathBuf>,
}

impl PlatformChanges {
    pub fn merge(&mut self, other: PlatformChanges) {
        self.written.extend(other.written);
        self.created.extend(other.created);
    }
}

/// The tagged result of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The project does not depend on the updates package; nothing to do.
    Skipped,
    /// The pass ran to completion. `changed` is `false` when the project
    /// already matched the desired state and no file was written.
    Completed { changed: bool },
    /// Files were mutated inside a git work tree that now has uncommitted
    /// changes. The operator should review and commit before building.
    NeedsCommit,
}

/// Run one reconciliation pass over both platforms.
///
/// Sequential: Android first, then iOS; a failure on either side aborts
/// the pass. Newly created files are staged intent-to-add so they show up
/// in `git status` for the commit step. Outside a git work tree there is
/// nothing to stage or commit and a mutating pass completes normally.
pub fn run(project_dir: &Path, mode: SyncMode) -> Result<Outcome> {
    let config = config::load(project_dir)?;
    if !config.pkg.has_dependency(UPDATES_PACKAGE) {
        log::debug!(
            "{} is not a dependency of {}; nothing to reconcile",
            UPDATES_PACKAGE,
            project_dir.display()
        );
        return Ok(Outcome::Skipped);
    }

    let account = account::current_account_name();
    let desired = DesiredUpdates::resolve(&config.exp, account.as_deref())?;
    log::debug!("desired update URL: {}", desired.update_url);

    let mut changes = android::sync(project_dir, &desired, mode)?;
    report_platform(project_dir, "Android", &changes);

    let ios_changes = ios::sync(project_dir, &desired, mode)?;
    report_platform(project_dir, "iOS", &ios_changes);
    changes.merge(ios_changes);

    if changes.written.is_empty() {
        return Ok(Outcome::Completed { changed: false });
    }

    if git::is_inside_work_tree(project_dir) {
        for path in &changes.created {
            git::stage_intent_to_add(project_dir, path)?;
        }
        if !git::is_working_tree_clean(project_dir)? {
            return Ok(Outcome::NeedsCommit);
        }
    }

    Ok(Outcome::Completed { changed: true })
}

fn report_platform(project_dir: &Path, platform: &str, changes: &PlatformChanges) {
    if changes.written.is_empty() {
        log::info!("{platform}: already up to date");
        return;
    }
    for path in &changes.written {
        let shown = path.strip_prefix(project_dir).unwrap_or(path);
        log::info!("{platform}: wrote {}", shown.display());
    }
}
