// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for setting up a tracker: `init`, `user`, `project`, `member`,
//! `issue`, `mr`, `milestone`, `note` and `show`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn relo() -> Command {
    cargo_bin_cmd!("relo")
}

fn run(temp: &TempDir, args: &[&str]) -> assert_cmd::assert::Assert {
    relo().args(args).current_dir(temp.path()).assert()
}

fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    run(&temp, &["init", "--user", "alice"]).success();
    run(&temp, &["project", "add", "group/app"]).success();
    run(&temp, &["member", "add", "group/app", "alice", "owner"]).success();
    temp
}

#[test]
fn commands_require_init() {
    let temp = TempDir::new().unwrap();
    run(&temp, &["project", "add", "group/app"])
        .failure()
        .stderr(predicate::str::contains("relo init"));
}

#[test]
fn init_twice_fails() {
    let temp = init_temp();
    run(&temp, &["init"])
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_reports_location() {
    let temp = TempDir::new().unwrap();
    run(&temp, &["init", "--user", "alice"])
        .success()
        .stdout(predicate::str::contains("Initialized issue tracker"))
        .stdout(predicate::str::contains("Acting as: alice"));
    assert!(temp.path().join(".relo").join("config.toml").exists());
}

#[test]
fn works_from_subdirectory() {
    let temp = init_temp();
    let sub = temp.path().join("deep").join("er");
    std::fs::create_dir_all(&sub).unwrap();

    relo()
        .args(["issue", "new", "group/app", "From below"])
        .current_dir(&sub)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created group/app#1"));
}

#[test]
fn issue_new_numbers_per_project() {
    let temp = init_temp();
    run(&temp, &["project", "add", "group/web"]).success();

    run(&temp, &["issue", "new", "group/app", "One"])
        .success()
        .stdout(predicate::str::contains("Created group/app#1: One"));
    run(&temp, &["issue", "new", "group/app", "Two"])
        .success()
        .stdout(predicate::str::contains("Created group/app#2: Two"));
    run(&temp, &["issue", "new", "group/web", "Other"])
        .success()
        .stdout(predicate::str::contains("Created group/web#1: Other"));
}

#[test]
fn mr_and_milestone_references() {
    let temp = init_temp();
    run(&temp, &["mr", "new", "group/app", "Feature"])
        .success()
        .stdout(predicate::str::contains("Created group/app!1: Feature"));
    run(&temp, &["milestone", "new", "group/app", "v1"])
        .success()
        .stdout(predicate::str::contains("Created group/app%1: v1"));
}

#[test]
fn unknown_project_has_hint() {
    let temp = init_temp();
    run(&temp, &["issue", "new", "group/nope", "Lost"])
        .failure()
        .stderr(predicate::str::contains("project not found: group/nope"))
        .stderr(predicate::str::contains("relo project add group/nope"));
}

#[test]
fn invalid_project_path_is_rejected() {
    let temp = init_temp();
    run(&temp, &["project", "add", "group/.hidden"])
        .failure()
        .stderr(predicate::str::contains("invalid path"));
}

#[test]
fn member_add_rejects_unknown_level() {
    let temp = init_temp();
    run(&temp, &["user", "add", "bob"]).success();
    run(&temp, &["member", "add", "group/app", "bob", "admin"])
        .failure()
        .stderr(predicate::str::contains("invalid access level"));
}

#[test]
fn note_and_show() {
    let temp = init_temp();
    run(&temp, &["issue", "new", "group/app", "Crash", "-d", "see #1", "-l", "bug"]).success();
    run(&temp, &["note", "group/app#1", "Seen again"])
        .success()
        .stdout(predicate::str::contains("Added note to group/app#1"));

    run(&temp, &["show", "group/app#1"])
        .success()
        .stdout(predicate::str::contains("[open] group/app#1: Crash"))
        .stdout(predicate::str::contains("Labels: bug"))
        .stdout(predicate::str::contains("    see #1"))
        .stdout(predicate::str::contains("alice\n    Seen again"));
}

#[test]
fn show_json() {
    let temp = init_temp();
    run(&temp, &["issue", "new", "group/app", "Crash"]).success();

    let output = relo()
        .args(["show", "group/app#1", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["reference"], "group/app#1");
    assert_eq!(value["state"], "open");
    assert_eq!(value["author"], "alice");
}

#[test]
fn show_rejects_short_reference() {
    let temp = init_temp();
    run(&temp, &["show", "#1"])
        .failure()
        .stderr(predicate::str::contains("invalid issue reference"));
}

#[test]
fn project_issues_lists_state() {
    let temp = init_temp();
    run(&temp, &["issue", "new", "group/app", "One"]).success();
    run(&temp, &["issue", "new", "group/app", "Two"]).success();

    run(&temp, &["project", "issues", "group/app"])
        .success()
        .stdout(predicate::str::contains("- [open] group/app#1: One"))
        .stdout(predicate::str::contains("- [open] group/app#2: Two"));
}

#[test]
fn no_acting_user() {
    let temp = TempDir::new().unwrap();
    run(&temp, &["init"]).success();
    run(&temp, &["project", "add", "group/app"]).success();

    run(&temp, &["issue", "new", "group/app", "Anon"])
        .failure()
        .stderr(predicate::str::contains("no acting user"));
}
