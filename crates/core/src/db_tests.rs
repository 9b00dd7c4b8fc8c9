// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

struct Fixture {
    db: Database,
    alice: Principal,
    project: Project,
}

fn fixture() -> Fixture {
    let db = Database::open_in_memory().unwrap();
    let alice = db.create_user("alice").unwrap();
    let project = db.create_project("group/app", Visibility::Private).unwrap();
    Fixture { db, alice, project }
}

#[test]
fn open_creates_file_and_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("issues.db");

    let db = Database::open(&path).unwrap();
    db.create_user("alice").unwrap();
    drop(db);

    let db = Database::open(&path).unwrap();
    assert!(db.find_user_by_name("alice").unwrap().is_some());
}

#[test]
fn create_and_get_user() {
    let db = Database::open_in_memory().unwrap();
    let user = db.create_user("alice").unwrap();

    assert_eq!(db.get_user(user.id).unwrap(), user);
    assert_eq!(db.find_user_by_name("alice").unwrap(), Some(user));
    assert!(db.find_user_by_name("bob").unwrap().is_none());
}

#[parameterized(
    empty = { "" },
    spaces = { "a b" },
)]
fn create_user_rejects_bad_names(name: &str) {
    let db = Database::open_in_memory().unwrap();
    assert!(matches!(
        db.create_user(name),
        Err(Error::Validation { field: "username", .. })
    ));
}

#[test]
fn create_user_rejects_duplicate() {
    let db = Database::open_in_memory().unwrap();
    db.create_user("alice").unwrap();
    assert!(db.create_user("alice").is_err());
}

#[test]
fn get_user_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(matches!(db.get_user(42), Err(Error::UserNotFound(_))));
}

#[test]
fn create_and_find_project() {
    let f = fixture();
    assert_eq!(f.project.path, "group/app");
    assert_eq!(f.project.visibility, Visibility::Private);

    let found = f.db.find_project_by_path("group/app").unwrap().unwrap();
    assert_eq!(found, f.project);
    assert_eq!(f.db.get_project(f.project.id).unwrap(), f.project);
    assert!(f.db.find_project_by_path("group/other").unwrap().is_none());
}

#[parameterized(
    empty = { "" },
    trailing_slash = { "group/" },
    dot_segment = { "group/.hidden" },
    space = { "my app" },
)]
fn create_project_rejects_bad_paths(path: &str) {
    let db = Database::open_in_memory().unwrap();
    assert!(matches!(
        db.create_project(path, Visibility::Public),
        Err(Error::Validation { field: "path", .. })
    ));
}

#[test]
fn create_project_rejects_duplicate() {
    let f = fixture();
    let err = f
        .db
        .create_project("group/app", Visibility::Public)
        .unwrap_err();
    assert!(err.to_string().contains("already been taken"));
}

#[test]
fn get_project_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(matches!(db.get_project(9), Err(Error::ProjectNotFound(_))));
    assert!(matches!(
        db.get_project_by_path("nope"),
        Err(Error::ProjectNotFound(_))
    ));
}

#[test]
fn create_issue_assigns_sequential_iids_per_project() {
    let f = fixture();
    let other = f.db.create_project("group/web", Visibility::Private).unwrap();

    let a = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "First"))
        .unwrap();
    let b = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "Second"))
        .unwrap();
    let c = f
        .db
        .create_issue(&NewIssue::new(other.id, f.alice.id, "Elsewhere"))
        .unwrap();

    assert_eq!((a.iid, b.iid, c.iid), (1, 2, 1));
    assert_ne!(a.id, c.id);
    assert_eq!(a.state, IssueState::Open);
    assert_eq!(a.project_id, f.project.id);
}

#[test]
fn create_issue_stores_labels_and_milestone() {
    let f = fixture();
    let milestone = f.db.create_milestone(f.project.id, "v1").unwrap();

    let issue = f
        .db
        .create_issue(
            &NewIssue::new(f.project.id, f.alice.id, "Labelled")
                .with_description("body")
                .with_labels(vec!["bug".to_string(), "api".to_string()])
                .with_milestone(Some(milestone.id)),
        )
        .unwrap();

    assert_eq!(issue.labels, vec!["api", "bug"]);
    assert_eq!(issue.milestone_id, Some(milestone.id));
    assert_eq!(issue.description.as_deref(), Some("body"));
}

#[test]
fn create_issue_rejects_foreign_milestone() {
    let f = fixture();
    let other = f.db.create_project("group/web", Visibility::Private).unwrap();
    let milestone = f.db.create_milestone(other.id, "v1").unwrap();

    let result = f.db.create_issue(
        &NewIssue::new(f.project.id, f.alice.id, "Wrong milestone").with_milestone(Some(milestone.id)),
    );
    assert!(matches!(
        result,
        Err(Error::Validation { field: "milestone", .. })
    ));
}

#[test]
fn create_issue_in_missing_project_is_validation_error() {
    let f = fixture();
    let result = f
        .db
        .create_issue(&NewIssue::new(999, f.alice.id, "Nowhere"));
    assert!(matches!(
        result,
        Err(Error::Validation { field: "project", .. })
    ));
}

#[test]
fn create_issue_rejects_blank_title_without_writing() {
    let f = fixture();
    let result = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "   "));
    assert!(matches!(result, Err(Error::Validation { field: "title", .. })));
    assert!(f.db.list_issues(f.project.id).unwrap().is_empty());
}

#[test]
fn create_issue_logs_created_event() {
    let f = fixture();
    let issue = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "Evented"))
        .unwrap();

    let events = f.db.get_events(issue.id).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, Action::Created);
    assert_eq!(events[0].actor_id, Some(f.alice.id));
}

#[test]
fn find_issue_by_iid() {
    let f = fixture();
    let issue = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "Findable"))
        .unwrap();

    assert_eq!(
        f.db.find_issue_by_iid(f.project.id, issue.iid).unwrap(),
        Some(issue)
    );
    assert!(f.db.find_issue_by_iid(f.project.id, 99).unwrap().is_none());
}

#[test]
fn get_issue_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(matches!(db.get_issue(7), Err(Error::IssueNotFound(_))));
}

#[test]
fn update_issue_state_records_actor_and_event() {
    let f = fixture();
    let bob = f.db.create_user("bob").unwrap();
    let issue = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "Closable"))
        .unwrap();

    let closed = f
        .db
        .update_issue_state(issue.id, IssueState::Closed, bob.id)
        .unwrap();
    assert_eq!(closed.state, IssueState::Closed);
    assert_eq!(closed.updated_by_id, Some(bob.id));

    let reopened = f
        .db
        .update_issue_state(issue.id, IssueState::Open, bob.id)
        .unwrap();
    assert_eq!(reopened.state, IssueState::Open);

    let actions: Vec<Action> = f
        .db
        .get_events(issue.id)
        .unwrap()
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(actions, vec![Action::Created, Action::Closed, Action::Reopened]);
}

#[test]
fn update_issue_state_missing_issue() {
    let f = fixture();
    assert!(matches!(
        f.db.update_issue_state(42, IssueState::Closed, f.alice.id),
        Err(Error::IssueNotFound(_))
    ));
}

#[test]
fn merge_requests_and_milestones_have_own_iids() {
    let f = fixture();
    let mr1 = f.db.create_merge_request(f.project.id, "Feature").unwrap();
    let mr2 = f.db.create_merge_request(f.project.id, "Fix").unwrap();
    let ms = f.db.create_milestone(f.project.id, "v1").unwrap();

    assert_eq!((mr1.iid, mr2.iid, ms.iid), (1, 2, 1));
    assert_eq!(
        f.db.find_merge_request_by_iid(f.project.id, 2).unwrap(),
        Some(mr2)
    );
    assert_eq!(f.db.find_milestone_by_iid(f.project.id, 1).unwrap(), Some(ms));
    assert!(f.db.find_milestone_by_iid(f.project.id, 2).unwrap().is_none());
}

#[test]
fn create_milestone_requires_title() {
    let f = fixture();
    assert!(f.db.create_milestone(f.project.id, " ").is_err());
    assert!(f.db.create_merge_request(f.project.id, "").is_err());
}

#[test]
fn notes_are_listed_in_order() {
    let f = fixture();
    let issue = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "Chatty"))
        .unwrap();

    f.db.add_note(issue.id, f.alice.id, "first").unwrap();
    f.db.add_note(issue.id, f.alice.id, "second").unwrap();

    let notes = f.db.get_notes(issue.id).unwrap();
    let bodies: Vec<&str> = notes.iter().map(|n| n.body.as_str()).collect();
    assert_eq!(bodies, vec!["first", "second"]);
    assert!(notes.iter().all(|n| n.project_id == f.project.id && !n.system));
}

#[test]
fn add_note_to_missing_issue() {
    let f = fixture();
    assert!(matches!(
        f.db.add_note(5, f.alice.id, "orphan"),
        Err(Error::IssueNotFound(_))
    ));
}

#[test]
fn find_notes_pages_by_id() {
    let f = fixture();
    let issue = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "Paged"))
        .unwrap();
    for i in 0..5 {
        f.db.add_note(issue.id, f.alice.id, &format!("note {i}")).unwrap();
    }

    let first = f.db.find_notes(issue.id, None, 2).unwrap();
    assert_eq!(first.len(), 2);
    let second = f.db.find_notes(issue.id, Some(first[1].id), 2).unwrap();
    assert_eq!(second[0].body, "note 2");
    let last = f.db.find_notes(issue.id, Some(second[1].id), 2).unwrap();
    assert_eq!(last.len(), 1);
    assert!(f
        .db
        .find_notes(issue.id, Some(last[0].id), 2)
        .unwrap()
        .is_empty());
}

#[test]
fn duplicate_note_keeps_author_body_and_time() {
    let f = fixture();
    let bob = f.db.create_user("bob").unwrap();
    let other = f.db.create_project("group/web", Visibility::Private).unwrap();
    let source = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "Source"))
        .unwrap();
    let target = f
        .db
        .create_issue(&NewIssue::new(other.id, f.alice.id, "Target"))
        .unwrap();
    let note = f.db.add_note(source.id, bob.id, "see #1").unwrap();

    let copy = f.db.duplicate_note(&note, &target, &other).unwrap();

    assert_ne!(copy.id, note.id);
    assert_eq!(copy.issue_id, target.id);
    assert_eq!(copy.project_id, other.id);
    assert_eq!(copy.author_id, bob.id);
    assert_eq!(copy.body, "see #1");
    assert_eq!(copy.created_at, note.created_at);
    assert_eq!(f.db.get_notes(target.id).unwrap(), vec![copy]);
}

#[test]
fn duplicate_note_rejects_project_mismatch() {
    let f = fixture();
    let other = f.db.create_project("group/web", Visibility::Private).unwrap();
    let issue = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "Here"))
        .unwrap();
    let note = f.db.add_note(issue.id, f.alice.id, "hello").unwrap();

    assert!(f.db.duplicate_note(&note, &issue, &other).is_err());
}

#[test]
fn member_access_roundtrip_and_replace() {
    let f = fixture();
    assert_eq!(f.db.member_access(f.project.id, f.alice.id).unwrap(), None);

    f.db.add_member(f.project.id, f.alice.id, AccessLevel::Guest)
        .unwrap();
    f.db.add_member(f.project.id, f.alice.id, AccessLevel::Maintainer)
        .unwrap();

    assert_eq!(
        f.db.member_access(f.project.id, f.alice.id).unwrap(),
        Some(AccessLevel::Maintainer)
    );
}

#[parameterized(
    guest = { Some(AccessLevel::Guest), false },
    reporter = { Some(AccessLevel::Reporter), true },
    owner = { Some(AccessLevel::Owner), true },
    outsider = { None, false },
)]
fn can_relocate_requires_reporter(level: Option<AccessLevel>, allowed: bool) {
    let f = fixture();
    if let Some(level) = level {
        f.db.add_member(f.project.id, f.alice.id, level).unwrap();
    }
    assert_eq!(f.db.can_relocate(&f.alice, &f.project), allowed);
}

#[test]
fn can_read_public_or_member() {
    let f = fixture();
    let public = f.db.create_project("group/docs", Visibility::Public).unwrap();

    assert!(f.db.can_read(&f.alice, &public));
    assert!(!f.db.can_read(&f.alice, &f.project));

    f.db.add_member(f.project.id, f.alice.id, AccessLevel::Guest)
        .unwrap();
    assert!(f.db.can_read(&f.alice, &f.project));
}

#[test]
fn record_moved_writes_system_note_and_event() {
    let f = fixture();
    let issue = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "Moved"))
        .unwrap();
    let record = MovedRecord {
        direction: MoveDirection::To,
        issue_id: issue.id,
        project_id: f.project.id,
        counterpart_issue_id: 77,
        counterpart_project_id: 8,
        counterpart_reference: "group/web#3".to_string(),
        principal_id: f.alice.id,
    };

    f.db.record_moved(&record).unwrap();

    let notes = f.db.get_notes(issue.id).unwrap();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].system);
    assert_eq!(notes[0].system_action, Some(SystemAction::Moved));
    assert_eq!(notes[0].body, "moved to group/web#3");

    let last = f.db.get_events(issue.id).unwrap().pop().unwrap();
    assert_eq!(last.action, Action::MovedTo);
    assert_eq!(last.detail.as_deref(), Some("group/web#3"));
}

#[test]
fn in_transaction_rolls_back_on_error() {
    let f = fixture();
    let result: Result<()> = f.db.in_transaction(|db| {
        db.create_issue(&NewIssue::new(f.project.id, f.alice.id, "Doomed"))?;
        Err(Error::IssueNotFound("boom".to_string()))
    });

    assert!(result.is_err());
    assert!(f.db.list_issues(f.project.id).unwrap().is_empty());
}

#[test]
fn in_transaction_commits_on_success() {
    let f = fixture();
    let issue = f
        .db
        .in_transaction(|db| db.create_issue(&NewIssue::new(f.project.id, f.alice.id, "Kept")))
        .unwrap();

    assert_eq!(f.db.get_issue(issue.id).unwrap().title, "Kept");
}

#[test]
fn corrupted_state_is_reported() {
    let f = fixture();
    let issue = f
        .db
        .create_issue(&NewIssue::new(f.project.id, f.alice.id, "Corrupt"))
        .unwrap();
    f.db.conn
        .execute(
            "UPDATE issues SET state = 'bogus' WHERE id = ?1",
            params![issue.id],
        )
        .unwrap();

    assert!(f.db.get_issue(issue.id).is_err());
}
