// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `relo move`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

fn relo() -> Command {
    cargo_bin_cmd!("relo")
}

fn run(temp: &TempDir, args: &[&str]) -> assert_cmd::assert::Assert {
    relo().args(args).current_dir(temp.path()).assert()
}

fn show_json(temp: &TempDir, reference: &str) -> serde_json::Value {
    let output = relo()
        .args(["show", reference, "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "show {reference} failed");
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Projects `A`, `A/B` and `C`; alice owns all three and wrote `A#6`
/// ("see #5 and A/B!3") with three notes. `A#5` is "Bug X", `A/B!3` is
/// "Feature Y", and `C` already has an issue of its own.
fn setup() -> TempDir {
    let temp = TempDir::new().unwrap();
    run(&temp, &["init", "--user", "alice"]).success();
    for path in ["A", "A/B", "C"] {
        run(&temp, &["project", "add", path]).success();
        run(&temp, &["member", "add", path, "alice", "owner"]).success();
    }
    for i in 1..=4 {
        run(&temp, &["issue", "new", "A", &format!("Filler {i}")]).success();
    }
    run(&temp, &["issue", "new", "A", "Bug X"]).success();
    for title in ["MR 1", "MR 2", "Feature Y"] {
        run(&temp, &["mr", "new", "A/B", title]).success();
    }
    run(&temp, &["issue", "new", "C", "Native"]).success();
    run(&temp, &["issue", "new", "A", "Move me", "-d", "see #5 and A/B!3"]).success();
    for body in ["one", "two", "three"] {
        run(&temp, &["note", "A#6", body]).success();
    }
    temp
}

#[test]
fn move_reports_new_reference() {
    let temp = setup();
    run(&temp, &["move", "A#6", "--to", "C"])
        .success()
        .stdout(predicate::str::contains("Moved A#6 to C#2"));
}

#[test]
fn moved_description_keeps_pointing_at_the_same_things() {
    let temp = setup();
    run(&temp, &["move", "A#6", "--to", "C"]).success();

    let moved = show_json(&temp, "C#2");
    assert_eq!(moved["description"], "see A#5 and A/B!3");
    assert_eq!(show_json(&temp, "A#5")["title"], "Bug X");
    assert_eq!(show_json(&temp, "C#1")["title"], "Native");
}

#[test]
fn move_copies_notes_and_closes_source() {
    let temp = setup();
    run(&temp, &["move", "A#6", "--to", "C"]).success();

    let old = show_json(&temp, "A#6");
    let new = show_json(&temp, "C#2");
    assert_eq!(old["state"], "closed");
    assert_eq!(new["state"], "open");

    let bodies = |v: &serde_json::Value| -> Vec<String> {
        v["notes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["body"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(bodies(&old), vec!["one", "two", "three", "moved to C#2"]);
    assert_eq!(bodies(&new), vec!["one", "two", "three", "moved from A#6"]);
    assert_eq!(new["notes"][3]["system"], true);
    assert_eq!(new["notes"][3]["author"], "alice");
}

#[test]
fn move_applies_overrides() {
    let temp = setup();
    run(
        &temp,
        &["move", "A#6", "--to", "C", "--title", "Renamed", "-a", "dave"],
    )
    .success();

    let new = show_json(&temp, "C#2");
    assert_eq!(new["title"], "Renamed");
    assert_eq!(new["assignee"], "dave");
}

#[test]
fn move_to_missing_project_is_not_moved() {
    let temp = setup();
    run(&temp, &["move", "A#6", "--to", "nowhere"])
        .failure()
        .stderr(predicate::str::contains("A#6 was not moved"));
    assert_eq!(show_json(&temp, "A#6")["state"], "open");
}

#[parameterized(
    no_access = { None, None },
    guest_in_both = { Some("guest"), Some("guest") },
    source_only = { Some("reporter"), None },
    destination_only = { None, Some("reporter") },
)]
fn move_needs_reporter_in_both(source: Option<&str>, destination: Option<&str>) {
    let temp = setup();
    run(&temp, &["user", "add", "bob"]).success();
    if let Some(level) = source {
        run(&temp, &["member", "add", "A", "bob", level]).success();
    }
    if let Some(level) = destination {
        run(&temp, &["member", "add", "C", "bob", level]).success();
    }

    run(&temp, &["move", "A#6", "--to", "C", "--as", "bob"])
        .failure()
        .stderr(predicate::str::contains("was not moved"));
    assert_eq!(show_json(&temp, "A#6")["state"], "open");
}

#[test]
fn reporter_can_move_and_is_recorded() {
    let temp = setup();
    run(&temp, &["user", "add", "bob"]).success();
    run(&temp, &["member", "add", "A", "bob", "reporter"]).success();
    run(&temp, &["member", "add", "C", "bob", "reporter"]).success();

    run(&temp, &["move", "A#6", "--to", "C", "--as", "bob"]).success();

    let new = show_json(&temp, "C#2");
    assert_eq!(new["author"], "alice");
    assert_eq!(new["notes"][3]["author"], "bob");
}

#[test]
fn move_with_blank_title_fails_cleanly() {
    let temp = setup();
    run(&temp, &["move", "A#6", "--to", "C", "--title", " "])
        .failure()
        .stderr(predicate::str::contains("invalid title"));

    assert_eq!(show_json(&temp, "A#6")["state"], "open");
    run(&temp, &["show", "C#2"])
        .failure()
        .stderr(predicate::str::contains("issue not found"));
}

#[test]
fn move_to_same_project_is_rejected() {
    let temp = setup();
    run(&temp, &["move", "A#6", "--to", "A"])
        .failure()
        .stderr(predicate::str::contains("cannot move issue to the project it originates from"));
}

#[test]
fn atomic_config_is_honoured() {
    let temp = setup();
    std::fs::write(
        temp.path().join(".relo").join("config.toml"),
        "user = \"alice\"\n\n[relocation]\natomic = true\nbatch_size = 2\n",
    )
    .unwrap();

    run(&temp, &["move", "A#6", "--to", "C"]).success();
    assert_eq!(show_json(&temp, "C#2")["notes"].as_array().unwrap().len(), 4);
}

#[test]
fn debug_logging_goes_to_stderr() {
    let temp = setup();
    relo()
        .args(["move", "A#6", "--to", "C"])
        .env("RELO_LOG", "relo_core=info")
        .current_dir(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("issue relocated"));
}
