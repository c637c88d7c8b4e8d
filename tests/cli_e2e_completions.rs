//! End-to-end tests for the `ota-sync completions` command.
//!
//! These tests verify the CLI behavior of the `completions` command by invoking
//! the binary directly and checking its output.

#[allow(dead_code)]
mod common;
#[allow(unused_imports)]
use common::prelude::*;

#[test]
fn test_completions_help() {
    let mut cmd = cargo_bin_cmd!("ota-sync");
    cmd.arg("completions")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generate shell completion scripts",
        ))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"))
        .stdout(predicate::str::contains("fish"))
        .stdout(predicate::str::contains("powershell"))
        .stdout(predicate::str::contains("elvish"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("ota-sync");
    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        // Bash completions should contain the completion function
        .stdout(predicate::str::contains("_ota-sync()"))
        // And should reference our subcommands
        .stdout(predicate::str::contains("configure"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_completions_zsh() {
    let mut cmd = cargo_bin_cmd!("ota-sync");
    cmd.arg("completions")
        .arg("zsh")
        .assert()
        .success()
        // Zsh completions should start with compdef
        .stdout(predicate::str::contains("#compdef ota-sync"))
        // And should reference subcommands
        .stdout(predicate::str::contains("configure"))
        .stdout(predicate::str::contains("sync-versions"));
}

#[test]
fn test_completions_fish() {
    let mut cmd = cargo_bin_cmd!("ota-sync");
    cmd.arg("completions")
        .arg("fish")
        .assert()
        .success()
        // Fish completions use function syntax
        .stdout(predicate::str::contains("function __fish_ota_sync"))
        // And should reference subcommands
        .stdout(predicate::str::contains("configure"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_completions_powershell() {
    let mut cmd = cargo_bin_cmd!("ota-sync");
    cmd.arg("completions")
        .arg("powershell")
        .assert()
        .success()
        // PowerShell uses Register-ArgumentCompleter
        .stdout(predicate::str::contains("Register-ArgumentCompleter"))
        .stdout(predicate::str::contains("ota-sync"));
}

#[test]
fn test_completions_elvish() {
    let mut cmd = cargo_bin_cmd!("ota-sync");
    cmd.arg("completions")
        .arg("elvish")
        .assert()
        .success()
        // Elvish sets up completion in edit:completion
        .stdout(predicate::str::contains(
            "edit:completion:arg-completer[ota-sync]",
        ))
        // And should contain command completions
        .stdout(predicate::str::contains("configure"));
}

#[test]
fn test_completions_invalid_shell() {
    let mut cmd = cargo_bin_cmd!("ota-sync");
    cmd.arg("completions")
        .arg("invalid-shell")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_completions_missing_shell_argument() {
    let mut cmd = cargo_bin_cmd!("ota-sync");
    cmd.arg("completions")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}
