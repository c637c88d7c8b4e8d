//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_bare_project();
//!     fixture.command().arg("check").assert().failure();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::fixtures;
    pub use super::TestFixture;
}

/// Canonical project file contents for testing.
///
/// These model a React Native app before any update-delivery
/// configuration has been applied.
#[allow(dead_code)]
pub mod fixtures {
    /// App configuration declaring a runtime version and an owner.
    ///
    /// The derived update URL for this configuration is
    /// `https://exp.host/@acme/demo`.
    pub const APP_JSON: &str = r#"{
  "expo": {
    "name": "Demo",
    "slug": "demo",
    "owner": "acme",
    "runtimeVersion": "1.0.0"
  }
}
"#;

    /// App configuration without a runtime or SDK version.
    pub const APP_JSON_NO_VERSION: &str = r#"{
  "expo": {
    "name": "Demo",
    "slug": "demo",
    "owner": "acme"
  }
}
"#;

    /// Dependency manifest declaring expo-updates.
    pub const PACKAGE_JSON: &str = r#"{
  "name": "demo",
  "dependencies": {
    "expo-updates": "~0.8.0",
    "react-native": "0.64.0"
  }
}
"#;

    /// Dependency manifest without expo-updates.
    pub const PACKAGE_JSON_NO_UPDATES: &str = r#"{
  "name": "demo",
  "dependencies": {
    "react-native": "0.64.0"
  }
}
"#;

    /// App build script without the update integration.
    pub const BUILD_GRADLE: &str = r#"apply plugin: "com.android.application"

android {
    compileSdkVersion 30
}
"#;

    /// Android manifest without update metadata.
    pub const ANDROID_MANIFEST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="com.demo">
  <application android:name=".MainApplication" android:label="@string/app_name">
    <activity android:name=".MainActivity"/>
  </application>
</manifest>
"#;

    /// Xcode project containing the React Native bundle build phase.
    pub const PBXPROJ: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	objectVersion = 46;
	objects = {
		13B07F8E1A680F5B00A75B9A /* Bundle React Native code and images */ = {
			isa = PBXShellScriptBuildPhase;
			buildActionMask = 2147483647;
			files = (
			);
			name = "Bundle React Native code and images";
			runOnlyForDeploymentPostprocessing = 0;
			shellPath = /bin/sh;
			shellScript = "export NODE_BINARY=node\n../node_modules/react-native/scripts/react-native-xcode.sh\n";
		};
	};
	rootObject = 83CBB9F71A601CBA00E9B192 /* Project object */;
}
"#;
}

/// A test fixture that lays out a React Native project in a temporary
/// directory.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new().with_bare_project();
///
/// fixture.command()
///     .arg("configure")
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Lay down a complete, unconfigured project: app configuration,
    /// dependency manifest, Android tree, and iOS tree.
    pub fn with_bare_project(self) -> Self {
        self.with_file("app.json", fixtures::APP_JSON)
            .with_file("package.json", fixtures::PACKAGE_JSON)
            .with_android_tree()
            .with_ios_tree("Demo")
    }

    /// Add an unconfigured Android project tree.
    pub fn with_android_tree(self) -> Self {
        self.with_file("android/app/build.gradle", fixtures::BUILD_GRADLE)
            .with_file(
                "android/app/src/main/AndroidManifest.xml",
                fixtures::ANDROID_MANIFEST,
            )
    }

    /// Add an unconfigured iOS project tree named `app`.
    pub fn with_ios_tree(self, app: &str) -> Self {
        let pbxproj = format!("ios/{app}.xcodeproj/project.pbxproj");
        self.with_file(&pbxproj, fixtures::PBXPROJ)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Turn the fixture into a git repository with a clean initial commit.
    #[allow(dead_code)]
    pub fn init_git_repo(self) -> Self {
        for args in [
            vec!["init"],
            vec!["config", "user.email", "test@example.com"],
            vec!["config", "user.name", "Test"],
            vec!["add", "-A"],
            vec!["commit", "-m", "Initial commit"],
        ] {
            let output = Command::new("git")
                .arg("-C")
                .arg(self.path())
                .args(&args)
                .output()
                .expect("Failed to run git");
            assert!(
                output.status.success(),
                "git {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Read a project file back as a string.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Whether a project file exists.
    #[allow(dead_code)]
    pub fn has_file(&self, path: &str) -> bool {
        self.path().join(path).is_file()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("ota-sync");
        cmd.current_dir(self.path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_file() {
        let fixture = TestFixture::new().with_file("test.txt", "hello");
        assert_eq!(fixture.read("test.txt"), "hello");
    }

    #[test]
    fn test_bare_project_layout() {
        let fixture = TestFixture::new().with_bare_project();
        assert!(fixture.has_file("app.json"));
        assert!(fixture.has_file("package.json"));
        assert!(fixture.has_file("android/app/build.gradle"));
        assert!(fixture.has_file("android/app/src/main/AndroidManifest.xml"));
        assert!(fixture.has_file("ios/Demo.xcodeproj/project.pbxproj"));
    }

    #[test]
    fn test_json_fixtures_are_valid() {
        for json in [
            fixtures::APP_JSON,
            fixtures::APP_JSON_NO_VERSION,
            fixtures::PACKAGE_JSON,
            fixtures::PACKAGE_JSON_NO_UPDATES,
        ] {
            serde_json::from_str::<serde_json::Value>(json).expect("Fixture should be valid JSON");
        }
    }
}
