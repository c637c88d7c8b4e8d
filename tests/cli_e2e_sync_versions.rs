//! End-to-end tests for the `sync-versions` command
//!
//! These tests invoke the actual CLI binary and validate its behavior
//! from a user's perspective.

mod common;
use common::prelude::*;

/// Test that --help flag shows help information
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_sync_versions_help() {
    let mut cmd = cargo_bin_cmd!("ota-sync");

    cmd.arg("sync-versions")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Sync only the runtime/SDK version entries",
        ));
}

/// Test that a missing project directory produces an error
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_sync_versions_missing_project_dir() {
    let mut cmd = cargo_bin_cmd!("ota-sync");

    cmd.arg("sync-versions")
        .arg("/nonexistent/project")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project directory not found"));
}

/// Test that a project without the expo-updates dependency is skipped
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_sync_versions_skips_without_updates_dependency() {
    let fixture = TestFixture::new()
        .with_file("app.json", fixtures::APP_JSON)
        .with_file("package.json", fixtures::PACKAGE_JSON_NO_UPDATES)
        .with_android_tree()
        .with_ios_tree("Demo");

    fixture
        .command()
        .arg("sync-versions")
        .assert()
        .success()
        .stdout(predicate::str::contains("not installed"));

    assert_eq!(
        fixture.read("android/app/build.gradle"),
        fixtures::BUILD_GRADLE
    );
}

/// Test that only the version entries move after a version bump
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_sync_versions_updates_version_entries_only() {
    let fixture = TestFixture::new().with_bare_project();

    fixture.command().arg("configure").assert().success();

    // Bump the declared runtime version.
    let app_json = fixture.read("app.json").replace("1.0.0", "1.1.0");
    std::fs::write(fixture.path().join("app.json"), app_json).unwrap();

    let gradle = fixture.read("android/app/build.gradle");
    let pbxproj = fixture.read("ios/Demo.xcodeproj/project.pbxproj");

    fixture
        .command()
        .arg("sync-versions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced update versions"));

    let manifest = fixture.read("android/app/src/main/AndroidManifest.xml");
    assert!(manifest.contains("1.1.0"));
    assert!(!manifest.contains("1.0.0"));

    let plist = fixture.read("ios/Demo/Supporting/Expo.plist");
    assert!(plist.contains("1.1.0"));

    // Hook and URL carriers stay byte-identical.
    assert_eq!(fixture.read("android/app/build.gradle"), gradle);
    assert_eq!(fixture.read("ios/Demo.xcodeproj/project.pbxproj"), pbxproj);
}

/// Test that sync-versions on an unconfigured project writes the version
/// entries without installing the hook or URL
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_sync_versions_does_not_install_hook_or_url() {
    let fixture = TestFixture::new().with_bare_project();

    fixture
        .command()
        .arg("sync-versions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced update versions"));

    assert_eq!(
        fixture.read("android/app/build.gradle"),
        fixtures::BUILD_GRADLE
    );

    let manifest = fixture.read("android/app/src/main/AndroidManifest.xml");
    assert!(manifest.contains("expo.modules.updates.EXPO_RUNTIME_VERSION"));
    assert!(!manifest.contains("expo.modules.updates.EXPO_UPDATE_URL"));

    let plist = fixture.read("ios/Demo/Supporting/Expo.plist");
    assert!(plist.contains("EXUpdatesRuntimeVersion"));
    assert!(!plist.contains("EXUpdatesURL"));
}

/// Test that matching versions produce no writes
#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_sync_versions_already_in_sync() {
    let fixture = TestFixture::new().with_bare_project();

    fixture.command().arg("configure").assert().success();

    let manifest = fixture.read("android/app/src/main/AndroidManifest.xml");
    let plist = fixture.read("ios/Demo/Supporting/Expo.plist");

    fixture
        .command()
        .arg("sync-versions")
        .assert()
        .success()
        .stdout(predicate::str::contains("already in sync"));

    assert_eq!(
        fixture.read("android/app/src/main/AndroidManifest.xml"),
        manifest
    );
    assert_eq!(fixture.read("ios/Demo/Supporting/Expo.plist"), plist);
}
