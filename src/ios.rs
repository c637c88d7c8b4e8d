//! # iOS Tree Adapter
//!
//! Read and mutate operations over the two iOS project files that carry
//! update-delivery configuration:
//!
//! - `ios/<App>.xcodeproj/project.pbxproj`: the "Bundle React Native code
//!   and images" build phase must invoke the update-manifest generation
//!   script (the script hook).
//! - `ios/<App>/Supporting/Expo.plist`: carries the update URL and
//!   version as top-level string keys. The file is created on first
//!   configuration; existing projects usually do not ship one.
//!
//! The Xcode project is located by globbing for `*.xcodeproj` bundles
//! under `ios/`; the plist path is derived from the bundle name. As with
//! the Android adapter, what to mutate is decided by the shared
//! [`ConfigDiff`](crate::reconcile::ConfigDiff).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::pbxproj::PbxProject;
use crate::reconcile::{ConfigDiff, DesiredUpdates, PlatformChanges, SyncMode, UpdatesState};

/// Script invocation the bundle build phase must contain.
pub const IOS_SCRIPT_HOOK: &str =
    "../../node_modules/expo-updates/scripts/create-manifest-ios.sh";

/// Name of the build phase the hook is appended to.
pub const BUNDLE_PHASE_NAME: &str = "Bundle React Native code and images";

/// Expo.plist keys.
pub const PLIST_URL_KEY: &str = "EXUpdatesURL";
pub const PLIST_SDK_VERSION_KEY: &str = "EXUpdatesSDKVersion";
pub const PLIST_RUNTIME_VERSION_KEY: &str = "EXUpdatesRuntimeVersion";

/// Locate the `project.pbxproj` of the app's Xcode project.
///
/// Multiple `.xcodeproj` bundles under `ios/` are ambiguous; the
/// lexicographically first one wins and a warning is logged.
pub fn pbxproj_path(project_dir: &Path) -> Result<PathBuf> {
    let pattern = project_dir
        .join("ios")
        .join("*.xcodeproj")
        .join("project.pbxproj");
    let pattern = pattern.to_string_lossy().into_owned();

    let mut matches: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(std::result::Result::ok)
        .collect();
    matches.sort();

    if matches.len() > 1 {
        log::warn!(
            "found {} Xcode projects under {}; using {}",
            matches.len(),
            project_dir.join("ios").display(),
            matches[0].display()
        );
    }
    match matches.into_iter().next() {
        Some(path) => Ok(path),
        None => Err(Error::XcodeProjectNotFound {
            dir: project_dir.display().to_string(),
        }),
    }
}

/// Derive the Expo.plist path from the located pbxproj.
///
/// `ios/<App>.xcodeproj/project.pbxproj` maps to
/// `ios/<App>/Supporting/Expo.plist`.
pub fn expo_plist_path(pbxproj: &Path) -> Result<PathBuf> {
    let bundle = pbxproj
        .parent()
        .ok_or_else(|| pbxproj_shape_error(pbxproj))?;
    let name = bundle
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(".xcodeproj"))
        .ok_or_else(|| pbxproj_shape_error(pbxproj))?;
    let ios_dir = bundle.parent().ok_or_else(|| pbxproj_shape_error(pbxproj))?;
    Ok(ios_dir.join(name).join("Supporting").join("Expo.plist"))
}

fn pbxproj_shape_error(pbxproj: &Path) -> Error {
    Error::Pbxproj {
        message: format!(
            "cannot derive the app name from {}; expected ios/<App>.xcodeproj/project.pbxproj",
            pbxproj.display()
        ),
    }
}

/// Append the hook invocation on its own line at the end of a build-phase
/// script.
pub fn append_script_hook(script: &str) -> String {
    let mut out = script.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(IOS_SCRIPT_HOOK);
    out.push('\n');
    out
}

/// A loaded iOS project: parsed pbxproj plus the Expo.plist dictionary.
///
/// A missing plist loads as an empty dictionary; `plist_existed` records
/// whether the file was present so callers can report the creation.
pub struct IosProject {
    pbxproj_path: PathBuf,
    project: PbxProject,
    plist_path: PathBuf,
    plist: plist::Dictionary,
    plist_existed: bool,
}

impl IosProject {
    pub fn load(project_dir: &Path) -> Result<Self> {
        let pbxproj_path = pbxproj_path(project_dir)?;
        let project = PbxProject::parse(fs::read_to_string(&pbxproj_path)?)?;

        let plist_path = expo_plist_path(&pbxproj_path)?;
        let plist_existed = plist_path.is_file();
        let plist = if plist_existed {
            plist::Value::from_file(&plist_path)?
                .into_dictionary()
                .ok_or_else(|| Error::ConfigParse {
                    path: plist_path.display().to_string(),
                    message: "root element is not a dictionary".to_string(),
                })?
        } else {
            plist::Dictionary::new()
        };

        Ok(Self {
            pbxproj_path,
            project,
            plist_path,
            plist,
            plist_existed,
        })
    }

    /// The current update-delivery state of the loaded content.
    ///
    /// A missing bundle phase or missing plist read as unconfigured; only
    /// mutation treats the missing phase as an error.
    pub fn read_state(&self) -> UpdatesState {
        let has_script_hook = self
            .project
            .phase_named(BUNDLE_PHASE_NAME)
            .and_then(|phase| phase.shell_script.as_deref())
            .map(|script| script.contains(IOS_SCRIPT_HOOK))
            .unwrap_or(false);

        UpdatesState {
            has_script_hook,
            update_url: self.plist_string(PLIST_URL_KEY),
            runtime_version: self.plist_string(PLIST_RUNTIME_VERSION_KEY),
            sdk_version: self.plist_string(PLIST_SDK_VERSION_KEY),
        }
    }

    fn plist_string(&self, key: &str) -> Option<String> {
        self.plist
            .get(key)
            .and_then(plist::Value::as_string)
            .map(str::to_string)
    }

    /// Apply the parts of `desired` that `diff` names to the in-memory
    /// content. Nothing is written to disk here.
    pub fn apply(&mut self, desired: &DesiredUpdates, diff: &ConfigDiff) -> Result<()> {
        if diff.needs_script_hook {
            let phase = self.project.phase_named(BUNDLE_PHASE_NAME).ok_or_else(|| {
                Error::BuildPhaseNotFound {
                    name: BUNDLE_PHASE_NAME.to_string(),
                }
            })?;
            let id = phase.id.clone();
            let script = phase.shell_script.clone().unwrap_or_default();
            self.project
                .set_shell_script(&id, &append_script_hook(&script))?;
        }
        if diff.needs_url {
            self.plist.insert(
                PLIST_URL_KEY.to_string(),
                plist::Value::String(desired.update_url.clone()),
            );
        }
        if diff.needs_version {
            let (runtime, sdk) = desired.effective_versions();
            if let Some(runtime) = runtime {
                self.plist.insert(
                    PLIST_RUNTIME_VERSION_KEY.to_string(),
                    plist::Value::String(runtime.to_string()),
                );
                self.plist.remove(PLIST_SDK_VERSION_KEY);
            } else if let Some(sdk) = sdk {
                self.plist.insert(
                    PLIST_SDK_VERSION_KEY.to_string(),
                    plist::Value::String(sdk.to_string()),
                );
                self.plist.remove(PLIST_RUNTIME_VERSION_KEY);
            }
        }
        Ok(())
    }

    /// Write the files `diff` covers back to disk, creating the plist and
    /// its parent directories when absent.
    pub fn save(&self, diff: &ConfigDiff) -> Result<PlatformChanges> {
        let mut changes = PlatformChanges::default();
        if diff.needs_script_hook {
            fs::write(&self.pbxproj_path, self.project.text())?;
            changes.written.push(self.pbxproj_path.clone());
        }
        if diff.needs_url || diff.needs_version {
            if let Some(parent) = self.plist_path.parent() {
                fs::create_dir_all(parent)?;
            }
            plist::Value::Dictionary(self.plist.clone()).to_file_xml(&self.plist_path)?;
            changes.written.push(self.plist_path.clone());
            if !self.plist_existed {
                changes.created.push(self.plist_path.clone());
            }
        }
        Ok(changes)
    }
}

/// Run one reconciliation pass over the iOS project.
///
/// Returns the written and created files; empty changes mean the project
/// already matched the desired state for this mode.
pub fn sync(project_dir: &Path, desired: &DesiredUpdates, mode: SyncMode) -> Result<PlatformChanges> {
    let mut project = IosProject::load(project_dir)?;
    let diff = ConfigDiff::between(desired, &project.read_state()).restrict(mode);
    if diff.is_empty() {
        return Ok(PlatformChanges::default());
    }
    project.apply(desired, &diff)?;
    project.save(&diff)
}

/// Whether the iOS project fully encodes the desired configuration.
pub fn is_configured(project_dir: &Path, desired: &DesiredUpdates) -> Result<bool> {
    let project = IosProject::load(project_dir)?;
    Ok(ConfigDiff::between(desired, &project.read_state()).is_empty())
}
