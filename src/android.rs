//! # Android Tree Adapter
//!
//! Read and mutate operations over the two Android project files that carry
//! update-delivery configuration:
//!
//! - `android/app/build.gradle`: must apply the update-manifest generation
//!   script during the native build (the script hook).
//! - `android/app/src/main/AndroidManifest.xml`: carries the update URL
//!   and version as `meta-data` entries on the `.MainApplication`
//!   application element.
//!
//! All decisions about *whether* to mutate come from the shared
//! [`ConfigDiff`](crate::reconcile::ConfigDiff); this module only knows how
//! to read the current state and how to apply the parts of the desired
//! state a diff names. Writes touch exactly the files the diff covers.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::manifest::{Document, Element, Node};
use crate::reconcile::{ConfigDiff, DesiredUpdates, PlatformChanges, SyncMode, UpdatesState};

/// The build-script directive that hooks update-manifest generation into
/// the Android build (double-quoted canonical form).
pub const GRADLE_SCRIPT_APPLY: &str =
    r#"apply from: "../../node_modules/expo-updates/scripts/create-manifest-android.gradle""#;

/// Marker comment written above the apply directive.
const GRADLE_SCRIPT_COMMENT: &str = "// Integration with Expo updates";

/// The application element update metadata attaches to.
const MAIN_APPLICATION_NAME: &str = ".MainApplication";

/// Manifest metadata keys.
pub const METADATA_UPDATE_URL: &str = "expo.modules.updates.EXPO_UPDATE_URL";
pub const METADATA_SDK_VERSION: &str = "expo.modules.updates.EXPO_SDK_VERSION";
pub const METADATA_RUNTIME_VERSION: &str = "expo.modules.updates.EXPO_RUNTIME_VERSION";

/// Path of the app build script under a project directory.
pub fn build_gradle_path(project_dir: &Path) -> PathBuf {
    project_dir.join("android").join("app").join("build.gradle")
}

/// Path of the Android manifest under a project directory.
pub fn manifest_path(project_dir: &Path) -> PathBuf {
    project_dir
        .join("android")
        .join("app")
        .join("src")
        .join("main")
        .join("AndroidManifest.xml")
}

/// Whether any line of the build script equals the apply directive, in
/// single- or double-quoted form. Line equality is literal; a directive
/// hiding in a longer line does not count. CRLF endings are tolerated.
pub fn has_script_apply(gradle: &str) -> bool {
    let single_quoted = GRADLE_SCRIPT_APPLY.replace('"', "'");
    gradle
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .any(|line| line == GRADLE_SCRIPT_APPLY || line == single_quoted)
}

/// Append the apply directive (double-quoted) behind its marker comment.
///
/// Callers are expected to have checked [`has_script_apply`] first; this
/// function appends unconditionally.
pub fn append_script_apply(gradle: &str) -> String {
    let mut out = gradle.to_string();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(GRADLE_SCRIPT_COMMENT);
    out.push('\n');
    out.push_str(GRADLE_SCRIPT_APPLY);
    out.push('\n');
    out
}

/// The value of the named metadata entry of an application element.
///
/// An application without any `meta-data` children simply yields `None`.
pub fn metadata_value<'a>(application: &'a Element, name: &str) -> Option<&'a str> {
    application
        .child_elements("meta-data")
        .find(|entry| entry.attr("android:name") == Some(name))
        .and_then(|entry| entry.attr("android:value"))
}

/// Insert or replace a metadata entry, preserving its position when it
/// already exists.
fn set_metadata(application: &mut Element, name: &str, value: &str) {
    if let Some(entry) = application
        .child_elements_mut("meta-data")
        .find(|entry| entry.attr("android:name") == Some(name))
    {
        entry.set_attr("android:value", value);
        return;
    }
    let mut entry = Element::new("meta-data");
    entry.set_attr("android:name", name);
    entry.set_attr("android:value", value);
    application.push_element(entry);
}

/// Remove a metadata entry if present.
fn remove_metadata(application: &mut Element, name: &str) {
    application.children.retain(|node| match node {
        Node::Element(element) if element.name == "meta-data" => {
            element.attr("android:name") != Some(name)
        }
        _ => true,
    });
}

/// A loaded Android project: raw build-script text plus parsed manifest.
///
/// Created per invocation; state is read fresh from the loaded content and
/// never cached across reconciliation passes.
pub struct AndroidProject {
    gradle_path: PathBuf,
    gradle: String,
    manifest_path: PathBuf,
    manifest: Document,
}

impl AndroidProject {
    /// Load both files, failing if either is absent or unparseable.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let gradle_path = build_gradle_path(project_dir);
        if !gradle_path.is_file() {
            return Err(Error::BuildGradleNotFound {
                path: gradle_path.display().to_string(),
            });
        }
        let manifest_path = manifest_path(project_dir);
        if !manifest_path.is_file() {
            return Err(Error::AndroidManifestNotFound {
                path: manifest_path.display().to_string(),
            });
        }

        let gradle = fs::read_to_string(&gradle_path)?;
        let manifest = Document::parse(&fs::read_to_string(&manifest_path)?)?;
        Ok(Self {
            gradle_path,
            gradle,
            manifest_path,
            manifest,
        })
    }

    fn main_application(&self) -> Result<&Element> {
        self.manifest
            .root
            .child_elements("application")
            .find(|app| app.attr("android:name") == Some(MAIN_APPLICATION_NAME))
            .ok_or_else(|| Error::MainApplicationNotFound {
                name: MAIN_APPLICATION_NAME.to_string(),
                path: self.manifest_path.display().to_string(),
            })
    }

    fn main_application_mut(&mut self) -> Result<&mut Element> {
        let path = self.manifest_path.display().to_string();
        self.manifest
            .root
            .child_elements_mut("application")
            .find(|app| app.attr("android:name") == Some(MAIN_APPLICATION_NAME))
            .ok_or(Error::MainApplicationNotFound {
                name: MAIN_APPLICATION_NAME.to_string(),
                path,
            })
    }

    /// The current update-delivery state of the loaded content.
    pub fn read_state(&self) -> Result<UpdatesState> {
        let application = self.main_application()?;
        Ok(UpdatesState {
            has_script_hook: has_script_apply(&self.gradle),
            update_url: metadata_value(application, METADATA_UPDATE_URL).map(str::to_string),
            runtime_version: metadata_value(application, METADATA_RUNTIME_VERSION)
                .map(str::to_string),
            sdk_version: metadata_value(application, METADATA_SDK_VERSION).map(str::to_string),
        })
    }

    /// Apply the parts of `desired` that `diff` names to the in-memory
    /// content. Nothing is written to disk here.
    pub fn apply(&mut self, desired: &DesiredUpdates, diff: &ConfigDiff) -> Result<()> {
        if diff.needs_script_hook {
            self.gradle = append_script_apply(&self.gradle);
        }
        if diff.needs_url {
            let application = self.main_application_mut()?;
            set_metadata(application, METADATA_UPDATE_URL, &desired.update_url);
        }
        if diff.needs_version {
            let (runtime, sdk) = desired.effective_versions();
            let application = self.main_application_mut()?;
            if let Some(runtime) = runtime {
                set_metadata(application, METADATA_RUNTIME_VERSION, runtime);
                remove_metadata(application, METADATA_SDK_VERSION);
            } else if let Some(sdk) = sdk {
                set_metadata(application, METADATA_SDK_VERSION, sdk);
                remove_metadata(application, METADATA_RUNTIME_VERSION);
            }
        }
        Ok(())
    }

    /// Write the files `diff` covers back to disk. Both files always
    /// pre-exist on Android, so nothing ever lands in `created`.
    pub fn save(&self, diff: &ConfigDiff) -> Result<PlatformChanges> {
        let mut changes = PlatformChanges::default();
        if diff.needs_script_hook {
            fs::write(&self.gradle_path, &self.gradle)?;
            changes.written.push(self.gradle_path.clone());
        }
        if diff.needs_url || diff.needs_version {
            fs::write(&self.manifest_path, self.manifest.to_xml_string()?)?;
            changes.written.push(self.manifest_path.clone());
        }
        Ok(changes)
    }
}

/// Run one reconciliation pass over the Android project.
///
/// Returns the files written; empty changes mean the project already
/// matched the desired state for this mode.
pub fn sync(project_dir: &Path, desired: &DesiredUpdates, mode: SyncMode) -> Result<PlatformChanges> {
    let mut project = AndroidProject::load(project_dir)?;
    let state = project.read_state()?;
    let diff = ConfigDiff::between(desired, &state).restrict(mode);
    if diff.is_empty() {
        return Ok(PlatformChanges::default());
    }
    project.apply(desired, &diff)?;
    project.save(&diff)
}

/// Whether the Android project fully encodes the desired configuration.
///
/// Evaluates the same diff the mutating path consumes, so the predicate and
/// the mutation can never disagree.
pub fn is_configured(project_dir: &Path, desired: &DesiredUpdates) -> Result<bool> {
    let project = AndroidProject::load(project_dir)?;
    let state = project.read_state()?;
    Ok(ConfigDiff::between(desired, &state).is_empty())
}
