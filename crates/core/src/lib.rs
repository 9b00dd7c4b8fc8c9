// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! relo-core: Shared library for the relo issue tracker
//!
//! This crate provides the data structures, SQLite storage, reference
//! rewriting and the cross-project issue relocator used by the relo CLI.

pub mod db;
pub mod error;
pub mod issue;
pub mod project;
pub mod reference;
pub mod relocate;
pub mod rewrite;
pub mod store;

pub use db::Database;
pub use error::{Error, Result};
pub use issue::{
    Action, Event, Issue, IssueOverrides, IssueState, MergeRequest, Milestone, NewIssue, Note,
    SystemAction,
};
pub use project::{AccessLevel, Principal, Project, Visibility};
pub use reference::{Mentionable, Reference, ReferenceKind, ReferenceSet};
pub use relocate::{
    MoveDirection, MovedRecord, NoteCursor, RelocateRequest, Relocation, Relocator,
    DEFAULT_BATCH_SIZE,
};
pub use rewrite::ReferenceRewriter;
pub use store::{AuditSink, Authorizer, IssueStore, NoteStore, ProjectStore, ReferenceLookup};
