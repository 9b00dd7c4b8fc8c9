// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Capabilities the relocator depends on.
//!
//! [`Database`](crate::Database) implements all of them; tests and embedders
//! can substitute their own.

use crate::error::Result;
use crate::issue::{Issue, IssueState, MergeRequest, Milestone, NewIssue, Note};
use crate::project::{Principal, Project};
use crate::relocate::MovedRecord;

/// Permission checks consulted by the relocator and the reference rewriter.
pub trait Authorizer {
    /// May `principal` move issues out of and into `project`?
    fn can_relocate(&self, principal: &Principal, project: &Project) -> bool;

    /// May `principal` see entities inside `project`?
    fn can_read(&self, principal: &Principal, project: &Project) -> bool;
}

pub trait ProjectStore {
    fn get_project(&self, id: i64) -> Result<Project>;

    fn find_project_by_path(&self, path: &str) -> Result<Option<Project>>;
}

pub trait IssueStore {
    fn get_issue(&self, id: i64) -> Result<Issue>;

    /// Validates and persists a new issue, assigning `id` and `iid`.
    fn create_issue(&self, params: &NewIssue) -> Result<Issue>;

    fn update_issue_state(&self, id: i64, state: IssueState, actor_id: i64) -> Result<Issue>;

    /// One page of an issue's notes in id order, starting after `after_id`.
    fn find_notes(&self, issue_id: i64, after_id: Option<i64>, limit: usize) -> Result<Vec<Note>>;
}

pub trait NoteStore {
    /// Copies `note` onto `issue`, which must belong to `project`.
    fn duplicate_note(&self, note: &Note, issue: &Issue, project: &Project) -> Result<Note>;
}

/// Lookups used to decide whether a reference points at something real.
pub trait ReferenceLookup {
    fn find_issue_by_iid(&self, project_id: i64, iid: i64) -> Result<Option<Issue>>;

    fn find_merge_request_by_iid(
        &self,
        project_id: i64,
        iid: i64,
    ) -> Result<Option<MergeRequest>>;

    fn find_milestone_by_iid(&self, project_id: i64, iid: i64) -> Result<Option<Milestone>>;
}

/// Receiver of relocation audit records.
pub trait AuditSink {
    fn record_moved(&self, record: &MovedRecord) -> Result<()>;
}
