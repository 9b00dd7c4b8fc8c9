// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the relors library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'relo init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("issue not found: {0}")]
    IssueNotFound(String),

    #[error("project not found: {0}\n  hint: create it with 'relo project add {0}'")]
    ProjectNotFound(String),

    #[error("user not found: {0}\n  hint: create it with 'relo user add {0}'")]
    UserNotFound(String),

    #[error("invalid issue reference '{0}'\n  hint: use the full form, e.g. group/app#12")]
    InvalidReference(String),

    #[error("no acting user\n  hint: pass --as <user> or set 'user' in .relo/config.toml")]
    NoUser,

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{0}")]
    InvalidValue(String),

    #[error("{reference} was not moved\n  hint: the destination must exist and you need reporter access in both projects")]
    NotMoved { reference: String },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("corrupted data in database: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for relors operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<relo_core::Error> for Error {
    fn from(e: relo_core::Error) -> Self {
        match e {
            relo_core::Error::IssueNotFound(id) => Error::IssueNotFound(id),
            relo_core::Error::ProjectNotFound(id) => Error::ProjectNotFound(id),
            relo_core::Error::UserNotFound(id) => Error::UserNotFound(id),
            relo_core::Error::Validation { field, reason } => Error::Validation { field, reason },
            e @ (relo_core::Error::UnsupportedContentType(_)
            | relo_core::Error::InvalidState(_)
            | relo_core::Error::InvalidAccessLevel(_)
            | relo_core::Error::InvalidVisibility(_)
            | relo_core::Error::InvalidAction(_)) => Error::InvalidValue(e.to_string()),
            relo_core::Error::Database(e) => Error::Database(e),
            relo_core::Error::Io(e) => Error::Io(e),
            relo_core::Error::CorruptedData(s) => Error::CorruptedData(s),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
