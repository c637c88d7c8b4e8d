//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `ota-sync` application. It uses the `thiserror` library to create a
//! comprehensive `Error` enum that covers all anticipated failure modes,
//! providing clear and descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors that can
//!   occur within the application. Each variant corresponds to a specific
//!   type of error and includes contextual information to aid in debugging.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the application to simplify function signatures and ensure
//!   type safety.
//!
//! The `Error` enum covers the failure scenarios of the whole pipeline:
//!
//! - App configuration parsing errors.
//! - Missing configuration files (`app.json`, `package.json`).
//! - Missing version declarations.
//! - Xcode project discovery and parsing failures.
//! - Missing build phases in the Xcode project.
//! - Missing Android build scripts and manifests.
//! - Missing application elements in the Android manifest.
//! - Android manifest XML errors.
//! - Git command execution failures.
//! - I/O errors.
//! - JSON parsing errors.
//! - Property-list errors.
//! - Glob pattern errors.
//! - URL parsing errors.
//! - Regex errors.
//!
//! A dirty working tree left behind by a successful write pass is
//! deliberately *not* represented here; it is reported through
//! [`crate::reconcile::Outcome`] so callers branch on a tag instead of
//! matching on a failure.
//!
//! The `Result` type alias is used to return `Result<T, Error>` from
//! functions, making it easy to handle errors and propagate them up the
//! call stack.

use thiserror::Error;

/// Main error type for ota-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing a project configuration file.
    ///
    /// This error includes the file that failed and the specific parsing
    /// issue.
    #[error("Configuration parsing error in {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Neither `app.json` nor `app.config.json` exists in the project
    /// directory.
    ///
    /// Optionally carries a hint, e.g. when only a dynamic `app.config.js`
    /// was found.
    #[error("No app configuration found in {dir}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    AppConfigNotFound {
        dir: String,
        /// Optional hint for how to resolve the missing configuration
        hint: Option<String>,
    },

    /// No `package.json` exists in the project directory.
    #[error("No package.json found in {dir}")]
    PackageJsonNotFound { dir: String },

    /// The app configuration declares neither a runtime version nor an SDK
    /// version, so no update-delivery configuration can be derived.
    #[error(
        "The app configuration declares neither \"runtimeVersion\" nor \"sdkVersion\"; set one and re-run"
    )]
    MissingVersion,

    /// No `ios/*/project.pbxproj` matched under the project directory.
    #[error("Could not find an Xcode project (ios/*/project.pbxproj) under {dir}")]
    XcodeProjectNotFound { dir: String },

    /// The located `project.pbxproj` could not be parsed.
    #[error("Xcode project parsing error: {message}")]
    Pbxproj { message: String },

    /// The named shell-script build phase is absent from the Xcode project.
    #[error("Build phase \"{name}\" not found in the Xcode project")]
    BuildPhaseNotFound { name: String },

    /// The Android app build script is absent.
    #[error("Android build script not found at {path}")]
    BuildGradleNotFound { path: String },

    /// The Android manifest is absent.
    #[error("Android manifest not found at {path}")]
    AndroidManifestNotFound { path: String },

    /// No application element with the expected `android:name` exists in the
    /// Android manifest, so there is nowhere to attach update metadata.
    #[error("No <application android:name=\"{name}\"> element in {path}")]
    MainApplicationNotFound { name: String, path: String },

    /// An XML read or write failed while handling the Android manifest.
    #[error("Manifest XML error: {message}")]
    Xml { message: String },

    /// An error occurred while executing a Git command.
    #[error("Git command failed: git {command} - {stderr}")]
    Git { command: String, stderr: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A property-list error, wrapped from `plist::Error`.
    #[error("Property list error: {0}")]
    Plist(#[from] plist::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
