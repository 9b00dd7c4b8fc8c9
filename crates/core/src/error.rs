// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for relo-core operations.

use thiserror::Error;

/// All possible errors that can occur in relo-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("issue not found: {0}")]
    IssueNotFound(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("unsupported content type: '{0}'\n  hint: only issue descriptions and note bodies carry references")]
    UnsupportedContentType(String),

    #[error("invalid issue state: '{0}'\n  hint: valid states are: open, closed")]
    InvalidState(String),

    #[error("invalid access level: '{0}'\n  hint: valid levels are: guest, reporter, developer, maintainer, owner")]
    InvalidAccessLevel(String),

    #[error("invalid visibility: '{0}'\n  hint: valid values are: private, public")]
    InvalidVisibility(String),

    #[error("invalid action: '{0}'")]
    InvalidAction(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for relo-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
