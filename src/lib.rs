//! # ota-sync Library
//!
//! This library keeps the native iOS and Android projects of a React Native
//! app in sync with the update-delivery configuration the app declares. It
//! is designed to be used by the `ota-sync` command-line tool but can also
//! be integrated into other applications that need to reconcile native
//! project files programmatically.
//!
//! ## Quick Example
//!
//! ```
//! use ota_sync::reconcile::{ConfigDiff, DesiredUpdates, UpdatesState};
//!
//! let desired = DesiredUpdates {
//!     update_url: "https://exp.host/@acme/demo".to_string(),
//!     runtime_version: Some("1.0.0".to_string()),
//!     sdk_version: None,
//! };
//!
//! // A project that has never been configured needs everything.
//! let diff = ConfigDiff::between(&desired, &UpdatesState::default());
//! assert!(diff.needs_script_hook && diff.needs_url && diff.needs_version);
//!
//! // Once the on-disk state matches, the diff is empty and a pass writes
//! // nothing.
//! let state = UpdatesState {
//!     has_script_hook: true,
//!     update_url: Some(desired.update_url.clone()),
//!     runtime_version: Some("1.0.0".to_string()),
//!     sdk_version: None,
//! };
//! assert!(ConfigDiff::between(&desired, &state).is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! The library is built around a few key concepts:
//!
//! - **Configuration (`config`, `account`)**: Reads the app configuration
//!   (`app.json` / `app.config.json`), the dependency manifest
//!   (`package.json`), and the signed-in account used to derive default
//!   update URLs.
//! - **Desired state and diff (`reconcile`)**: Resolves one
//!   `DesiredUpdates` value per run and compares it against what each
//!   platform currently encodes; the resulting `ConfigDiff` drives every
//!   write decision.
//! - **Tree adapters (`ios`, `android`)**: Read and mutate the concrete
//!   project files, backed by the `pbxproj` build-phase parser and the
//!   `manifest` XML document model.
//! - **Workspace integration (`git`)**: Thin wrappers over the `git`
//!   binary for the clean-tree check, intent-to-add staging, and the
//!   guided commit step.
//!
//! ## Execution Flow
//!
//! A reconciliation pass (`reconcile::run`) executes the following
//! high-level steps:
//!
//! 1.  **Load**: Read the app configuration and dependency manifest.
//! 2.  **Skip check**: Projects without the updates dependency are skipped.
//! 3.  **Resolve**: Derive the desired update URL and version entries.
//! 4.  **Android pass**: Diff and mutate the build script and manifest.
//! 5.  **iOS pass**: Diff and mutate the build phase and property list.
//! 6.  **Recovery**: Report a dirty working tree as a tagged outcome so the
//!     caller can offer a guided commit.
//!
//! Running a pass twice is a no-op by construction: the predicate that
//! reports "configured" and the mutation that configures consume the same
//! diff.

pub mod account;
pub mod android;
pub mod config;
pub mod error;
pub mod git;
pub mod ios;
pub mod manifest;
pub mod output;
pub mod pbxproj;
pub mod reconcile;

#[cfg(test)]
mod pbxproj_proptest;
