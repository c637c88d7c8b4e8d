//! # Project Configuration Loading
//!
//! This module defines the data structures that represent the declared
//! project configuration consumed by the reconciler, as well as the logic
//! for locating and parsing it. Two files are involved:
//!
//! - The app configuration: `app.json` (usually nesting the config under an
//!   `expo` key, sometimes flat) or `app.config.json`. Dynamic JavaScript
//!   configs (`app.config.js`/`app.config.ts`) are not evaluated; when one is
//!   the only configuration present, loading fails with a hint.
//! - The dependency manifest: `package.json`, consulted only for the presence
//!   of the `expo-updates` dependency (the skip sentinel).
//!
//! ## Key Components
//!
//! - **`ExpConfig`**: the declared app configuration fields the reconciler
//!   needs (slug, owner, version declarations, update settings).
//!
//! - **`PackageJson`**: the dependency map of the project.
//!
//! - **`ProjectConfig`**: both of the above, returned by [`load`].
//!
//! ## Parsing
//!
//! Loading never enforces the version requirement; that check belongs to
//! desired-state resolution so that callers which do not need a version can
//! still load the configuration.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// File names probed for the app configuration, in order of preference.
const APP_CONFIG_FILES: [&str; 2] = ["app.json", "app.config.json"];

/// Dynamic config files we recognize but cannot evaluate.
const DYNAMIC_CONFIG_FILES: [&str; 2] = ["app.config.js", "app.config.ts"];

/// Update-delivery settings declared under `updates` in the app configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatesConfig {
    /// An explicit update URL, overriding the derived default.
    #[serde(default)]
    pub url: Option<String>,
}

/// The declared app configuration (the `expo` object of `app.json`).
///
/// Only the fields the reconciler consumes are modeled; unknown fields are
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpConfig {
    /// The project slug, used to derive the default update URL.
    #[serde(default)]
    pub slug: String,
    /// The owning account name, if declared.
    #[serde(default)]
    pub owner: Option<String>,
    /// The declared SDK version (e.g. "42.0.0").
    #[serde(default)]
    pub sdk_version: Option<String>,
    /// The declared runtime version (e.g. "1.0.0"). Wins over the SDK
    /// version when both are present.
    #[serde(default)]
    pub runtime_version: Option<String>,
    /// Update-delivery settings.
    #[serde(default)]
    pub updates: Option<UpdatesConfig>,
}

impl ExpConfig {
    /// The declared `updates.url` override, if any.
    pub fn declared_update_url(&self) -> Option<&str> {
        self.updates.as_ref().and_then(|u| u.url.as_deref())
    }
}

/// The project's dependency manifest (`package.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageJson {
    /// Runtime dependencies. Development dependencies are deliberately not
    /// consulted: the updates package must ship with the app to matter.
    #[serde(default)]
    pub dependencies: HashMap<String, String>,
}

impl PackageJson {
    /// Whether `name` is declared as a runtime dependency.
    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }
}

/// The declared configuration of one project: app config plus dependency
/// manifest.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub exp: ExpConfig,
    pub pkg: PackageJson,
}

/// Load the declared configuration from a project directory.
///
/// Reads the app configuration and the dependency manifest; fails if either
/// is missing or malformed. Version requirements are *not* enforced here.
pub fn load(project_dir: &Path) -> Result<ProjectConfig> {
    let exp = load_app_config(project_dir)?;
    let pkg = load_package_json(project_dir)?;
    Ok(ProjectConfig { exp, pkg })
}

/// Locate and parse the app configuration file.
fn load_app_config(project_dir: &Path) -> Result<ExpConfig> {
    for name in APP_CONFIG_FILES {
        let path = project_dir.join(name);
        if path.is_file() {
            return parse_app_config(&path);
        }
    }

    let hint = DYNAMIC_CONFIG_FILES
        .iter()
        .find(|name| project_dir.join(name).is_file())
        .map(|name| {
            format!(
                "found {}; dynamic configuration is not supported, add an app.json",
                name
            )
        });

    Err(Error::AppConfigNotFound {
        dir: project_dir.display().to_string(),
        hint,
    })
}

/// Parse one app configuration file.
///
/// `app.json` conventionally nests the configuration under an `expo` key;
/// a file without that key is treated as the configuration itself.
fn parse_app_config(path: &Path) -> Result<ExpConfig> {
    let content = std::fs::read_to_string(path)?;
    let root: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let value = match root.get("expo") {
        Some(expo) if expo.is_object() => expo.clone(),
        _ => root,
    };

    serde_json::from_value(value).map_err(|e| Error::ConfigParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load and parse the dependency manifest.
fn load_package_json(project_dir: &Path) -> Result<PackageJson> {
    let path = project_dir.join("package.json");
    if !path.is_file() {
        return Err(Error::PackageJsonNotFound {
            dir: project_dir.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(&path)?;
    serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
