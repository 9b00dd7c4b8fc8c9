// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Moving an issue, with its discussion, from one project to another.
//!
//! A relocation runs in a fixed order:
//!
//! 1. check the principal may relocate in both projects,
//! 2. create the replacement issue in the destination project,
//! 3. duplicate every note of the source issue onto it,
//! 4. write the paired "moved from" / "moved to" system notes,
//! 5. close the source issue.
//!
//! Nothing is written before step 2 succeeds. Later failures are returned to
//! the caller without undoing earlier steps; callers that need all-or-nothing
//! behaviour run the relocation inside a store transaction
//! (see [`Database::in_transaction`](crate::Database::in_transaction)).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::issue::{Issue, IssueOverrides, IssueState, NewIssue, Note};
use crate::project::{Principal, Project};
use crate::reference::Mentionable;
use crate::rewrite::ReferenceRewriter;
use crate::store::{AuditSink, Authorizer, IssueStore, NoteStore, ProjectStore, ReferenceLookup};

/// Notes fetched per page while migrating a discussion.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// A request to move one issue into another project.
#[derive(Debug, Clone, PartialEq)]
pub struct RelocateRequest {
    pub source_issue_id: i64,
    /// `None` makes the request a no-op.
    pub destination_project_id: Option<i64>,
    pub principal: Principal,
    pub overrides: IssueOverrides,
}

/// Outcome of a relocation that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub struct Relocation {
    /// The replacement issue, when the move happened.
    pub new_issue: Option<Issue>,
    pub moved: bool,
}

impl Relocation {
    fn not_moved() -> Self {
        Relocation {
            new_issue: None,
            moved: false,
        }
    }
}

/// Which side of a move an audit record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    /// Written on the source issue, pointing at its replacement.
    To,
    /// Written on the replacement issue, pointing at its source.
    From,
}

impl MoveDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveDirection::To => "to",
            MoveDirection::From => "from",
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit record for one side of a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovedRecord {
    pub direction: MoveDirection,
    /// The issue the record is written on.
    pub issue_id: i64,
    pub project_id: i64,
    /// The issue on the other side of the move.
    pub counterpart_issue_id: i64,
    pub counterpart_project_id: i64,
    /// Full-form reference to the counterpart, e.g. `group/app#12`.
    pub counterpart_reference: String,
    pub principal_id: i64,
}

impl MovedRecord {
    /// Body of the system note, e.g. `moved to group/app#12`.
    pub fn body(&self) -> String {
        format!("moved {} {}", self.direction, self.counterpart_reference)
    }
}

/// Pages through an issue's notes in id order.
///
/// Each item is one page of at most `batch_size` notes. The cursor holds no
/// state beyond the last id seen, so a new cursor restarts from the first note.
pub struct NoteCursor<'a, S> {
    store: &'a S,
    issue_id: i64,
    batch_size: usize,
    after_id: Option<i64>,
    exhausted: bool,
}

impl<'a, S: IssueStore> NoteCursor<'a, S> {
    pub fn new(store: &'a S, issue_id: i64, batch_size: usize) -> Self {
        NoteCursor {
            store,
            issue_id,
            batch_size: batch_size.max(1),
            after_id: None,
            exhausted: false,
        }
    }
}

impl<S: IssueStore> Iterator for NoteCursor<'_, S> {
    type Item = Result<Vec<Note>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self
            .store
            .find_notes(self.issue_id, self.after_id, self.batch_size)
        {
            Ok(page) => {
                if page.len() < self.batch_size {
                    self.exhausted = true;
                }
                match page.last() {
                    Some(last) => {
                        self.after_id = Some(last.id);
                        Some(Ok(page))
                    }
                    None => None,
                }
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

/// Moves issues between projects.
///
/// The store, the authorization capability and the audit sink are injected;
/// a single [`Database`](crate::Database) can play all three roles.
pub struct Relocator<'a, S, A, N> {
    store: &'a S,
    authorizer: &'a A,
    audit: &'a N,
    batch_size: usize,
}

impl<'a, S, A, N> Relocator<'a, S, A, N>
where
    S: ProjectStore + IssueStore + NoteStore + ReferenceLookup,
    A: Authorizer,
    N: AuditSink,
{
    pub fn new(store: &'a S, authorizer: &'a A, audit: &'a N) -> Self {
        Relocator {
            store,
            authorizer,
            audit,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Sets the note page size (builder pattern). Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// True when `principal` may relocate in both `source` and `destination`.
    pub fn can_relocate(
        &self,
        principal: &Principal,
        source: &Project,
        destination: &Project,
    ) -> bool {
        self.authorizer.can_relocate(principal, source)
            && self.authorizer.can_relocate(principal, destination)
    }

    /// Moves the requested issue.
    ///
    /// Returns `moved: false` without touching anything when no destination
    /// is given, the destination does not exist, or the principal lacks
    /// permission on either side.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when the replacement issue is rejected; nothing
    /// has been written in that case. Store errors from later steps are
    /// returned as-is, leaving earlier steps in place.
    pub fn relocate(&self, request: &RelocateRequest) -> Result<Relocation> {
        let Some(destination_id) = request.destination_project_id else {
            tracing::debug!(issue = request.source_issue_id, "no destination given");
            return Ok(Relocation::not_moved());
        };

        let destination = match self.store.get_project(destination_id) {
            Ok(project) => project,
            Err(Error::ProjectNotFound(_)) => {
                tracing::warn!(project = destination_id, "destination project not found");
                return Ok(Relocation::not_moved());
            }
            Err(e) => return Err(e),
        };

        let old_issue = self.store.get_issue(request.source_issue_id)?;
        let source = self.store.get_project(old_issue.project_id)?;
        let principal = &request.principal;

        if !self.can_relocate(principal, &source, &destination) {
            tracing::warn!(
                user = %principal.username,
                from = %source.path,
                to = %destination.path,
                "relocation not permitted"
            );
            return Ok(Relocation::not_moved());
        }

        if source.id == destination.id {
            return Err(Error::Validation {
                field: "project",
                reason: "cannot move issue to the project it originates from".to_string(),
            });
        }

        tracing::info!(
            issue = %old_issue.to_reference(&source.path),
            to = %destination.path,
            user = %principal.username,
            "relocating issue"
        );

        let new_issue = self.replicate(
            &old_issue,
            &source,
            &destination,
            principal,
            &request.overrides,
        )?;
        let migrated = self.migrate_notes(&old_issue, &new_issue, &destination)?;
        self.annotate(&old_issue, &source, &new_issue, &destination, principal);
        self.store
            .update_issue_state(old_issue.id, IssueState::Closed, principal.id)?;

        tracing::info!(
            from = %old_issue.to_reference(&source.path),
            to = %new_issue.to_reference(&destination.path),
            notes = migrated,
            "issue relocated"
        );

        Ok(Relocation {
            new_issue: Some(new_issue),
            moved: true,
        })
    }

    /// Creates the replacement issue in `destination`.
    fn replicate(
        &self,
        old_issue: &Issue,
        source: &Project,
        destination: &Project,
        principal: &Principal,
        overrides: &IssueOverrides,
    ) -> Result<Issue> {
        let description = match old_issue.description.as_deref() {
            Some(text) => {
                let rewriter =
                    ReferenceRewriter::new(self.store, self.authorizer, principal, source);
                Some(rewriter.rewrite(Mentionable::IssueDescription(text))?)
            }
            None => None,
        };

        // Milestones and labels are project-scoped and do not carry over.
        let params = NewIssue {
            project_id: destination.id,
            author_id: old_issue.author_id,
            title: overrides
                .title
                .clone()
                .unwrap_or_else(|| old_issue.title.clone()),
            description,
            assignee: overrides
                .assignee
                .clone()
                .or_else(|| old_issue.assignee.clone()),
            milestone_id: None,
            labels: Vec::new(),
            updated_by_id: Some(principal.id),
        };

        self.store.create_issue(&params)
    }

    /// Duplicates every note of `old_issue` onto `new_issue`, bodies verbatim.
    fn migrate_notes(
        &self,
        old_issue: &Issue,
        new_issue: &Issue,
        destination: &Project,
    ) -> Result<usize> {
        let mut migrated = 0;
        for page in NoteCursor::new(self.store, old_issue.id, self.batch_size) {
            let page = page?;
            for note in &page {
                self.store.duplicate_note(note, new_issue, destination)?;
            }
            migrated += page.len();
            tracing::debug!(page = page.len(), total = migrated, "duplicated notes");
        }
        Ok(migrated)
    }

    /// Writes the "moved from" note on the new issue and "moved to" on the old.
    ///
    /// Sink failures are logged and do not stop the relocation.
    fn annotate(
        &self,
        old_issue: &Issue,
        source: &Project,
        new_issue: &Issue,
        destination: &Project,
        principal: &Principal,
    ) {
        let moved_from = MovedRecord {
            direction: MoveDirection::From,
            issue_id: new_issue.id,
            project_id: destination.id,
            counterpart_issue_id: old_issue.id,
            counterpart_project_id: source.id,
            counterpart_reference: old_issue.to_reference(&source.path),
            principal_id: principal.id,
        };
        let moved_to = MovedRecord {
            direction: MoveDirection::To,
            issue_id: old_issue.id,
            project_id: source.id,
            counterpart_issue_id: new_issue.id,
            counterpart_project_id: destination.id,
            counterpart_reference: new_issue.to_reference(&destination.path),
            principal_id: principal.id,
        };

        for record in [moved_from, moved_to] {
            if let Err(e) = self.audit.record_moved(&record) {
                tracing::warn!(
                    issue = record.issue_id,
                    direction = %record.direction,
                    error = %e,
                    "failed to record move"
                );
            }
        }
    }
}

#[cfg(test)]
#[path = "relocate_tests.rs"]
mod tests;
