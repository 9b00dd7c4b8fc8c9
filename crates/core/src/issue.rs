// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core record types: issues, notes, merge requests, milestones and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::reference::{full_form, ReferenceKind};

/// Maximum length of an issue title, in characters.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Lifecycle state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    /// Accepting work and discussion.
    Open,
    /// Finished, rejected, or moved elsewhere.
    Closed,
}

impl IssueState {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IssueState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            _ => Err(Error::InvalidState(s.to_string())),
        }
    }
}

/// The aggregate root: a tracked issue and, through its id, its notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Database-assigned identifier, unique across projects.
    pub id: i64,
    /// Display sequence number, unique within the owning project.
    pub iid: i64,
    /// The single project this issue belongs to.
    pub project_id: i64,
    pub author_id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub state: IssueState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Project-scoped milestone association.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<i64>,
    /// Project-scoped labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Last principal to modify the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Full-form reference to this issue inside the project at `project_path`.
    pub fn to_reference(&self, project_path: &str) -> String {
        full_form(ReferenceKind::Issue, project_path, self.iid)
    }
}

/// Parameters for creating an issue. The store assigns `id` and `iid`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewIssue {
    pub project_id: i64,
    pub author_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub milestone_id: Option<i64>,
    pub labels: Vec<String>,
    pub updated_by_id: Option<i64>,
}

impl NewIssue {
    /// Creates parameters for an issue with only the required fields set.
    pub fn new(project_id: i64, author_id: i64, title: impl Into<String>) -> Self {
        NewIssue {
            project_id,
            author_id,
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the description (builder pattern).
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the labels (builder pattern).
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Sets the milestone (builder pattern).
    pub fn with_milestone(mut self, milestone_id: Option<i64>) -> Self {
        self.milestone_id = milestone_id;
        self
    }

    /// Checks the fields every issue must carry before it is persisted.
    pub fn validate(&self) -> Result<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::Validation {
                field: "title",
                reason: "can't be blank".to_string(),
            });
        }
        let len = title.chars().count();
        if len > MAX_TITLE_LENGTH {
            return Err(Error::Validation {
                field: "title",
                reason: format!("is too long ({len} chars, max {MAX_TITLE_LENGTH})"),
            });
        }
        Ok(())
    }
}

/// Caller-supplied attribute overrides applied when an issue is replicated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueOverrides {
    pub title: Option<String>,
    pub assignee: Option<String>,
}

/// Kind of automatically generated note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemAction {
    /// The issue was relocated to or from another project.
    Moved,
}

impl SystemAction {
    /// Returns the string representation used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemAction::Moved => "moved",
        }
    }
}

impl fmt::Display for SystemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SystemAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "moved" => Ok(SystemAction::Moved),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

/// A discussion note attached to an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Database-assigned identifier.
    pub id: i64,
    /// The issue this note belongs to.
    pub issue_id: i64,
    /// Project of the owning issue, denormalized for display and access checks.
    pub project_id: i64,
    pub author_id: i64,
    pub body: String,
    /// True for generated audit notes.
    pub system: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_action: Option<SystemAction>,
    pub created_at: DateTime<Utc>,
}

/// A merge request, addressable from text as `!iid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: i64,
    pub iid: i64,
    pub project_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl MergeRequest {
    /// Full-form reference, e.g. `group/app!3`.
    pub fn to_reference(&self, project_path: &str) -> String {
        full_form(ReferenceKind::MergeRequest, project_path, self.iid)
    }
}

/// A milestone, addressable from text as `%iid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: i64,
    pub iid: i64,
    pub project_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl Milestone {
    pub fn to_reference(&self, project_path: &str) -> String {
        full_form(ReferenceKind::Milestone, project_path, self.iid)
    }
}

/// Types of actions recorded in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Issue was created.
    Created,
    /// Issue was closed.
    Closed,
    /// Issue was reopened.
    Reopened,
    /// A note was added.
    Noted,
    /// Issue was moved to another project.
    MovedTo,
    /// Issue was created by moving another one.
    MovedFrom,
}

impl Action {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Created => "created",
            Action::Closed => "closed",
            Action::Reopened => "reopened",
            Action::Noted => "noted",
            Action::MovedTo => "moved_to",
            Action::MovedFrom => "moved_from",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "created" => Ok(Action::Created),
            "closed" => Ok(Action::Closed),
            "reopened" => Ok(Action::Reopened),
            "noted" => Ok(Action::Noted),
            "moved_to" => Ok(Action::MovedTo),
            "moved_from" => Ok(Action::MovedFrom),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

/// An audit log entry recording a change to an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Database-assigned identifier.
    pub id: i64,
    pub issue_id: i64,
    pub action: Action,
    /// Principal that caused the change, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<i64>,
    /// Free-form detail (new state, counterpart reference).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event with the current timestamp.
    pub fn new(issue_id: i64, action: Action) -> Self {
        Event {
            id: 0, // Will be set by database
            issue_id,
            action,
            actor_id: None,
            detail: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the acting principal (builder pattern).
    pub fn with_actor(mut self, actor_id: Option<i64>) -> Self {
        self.actor_id = actor_id;
        self
    }

    /// Sets the detail (builder pattern).
    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
