// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Projects, users and memberships.
//!
//! A project is the namespace issues, merge requests and milestones live in.
//! Its full path (e.g. `group/app`) doubles as the prefix of full-form
//! references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Pattern a project path must match as a whole.
pub const PROJECT_PATH_PATTERN: &str = r"[A-Za-z0-9_.-]+(?:/[A-Za-z0-9_.-]+)*";

static PROJECT_PATH_RE: LazyLock<Regex> =
    LazyLock::new(
        || match Regex::new(&format!("^{PROJECT_PATH_PATTERN}$")) {
            Ok(re) => re,
            Err(_) => unreachable!("static regex pattern"),
        },
    );

/// Returns true if `path` is usable as a project path.
///
/// Segments may not be `.` or `..` and may not start with a dot.
pub fn validate_project_path(path: &str) -> bool {
    PROJECT_PATH_RE.is_match(path) && path.split('/').all(|seg| !seg.starts_with('.'))
}

/// Who can see a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Only members can read the project.
    Private,
    /// Anyone can read the project.
    Public,
}

impl Visibility {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "private" => Ok(Visibility::Private),
            "public" => Ok(Visibility::Public),
            _ => Err(Error::InvalidVisibility(s.to_string())),
        }
    }
}

/// A namespace under which issues, merge requests and milestones are addressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Database-assigned identifier.
    pub id: i64,
    /// Unique full path, e.g. `group/app`.
    pub path: String,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// The prefix used when rendering full-form references.
    pub fn to_reference(&self) -> &str {
        &self.path
    }
}

/// The acting user of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Database-assigned identifier.
    pub id: i64,
    pub username: String,
}

/// Role of a user inside a project, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Guest,
    Reporter,
    Developer,
    Maintainer,
    Owner,
}

impl AccessLevel {
    /// Returns the string representation used in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Guest => "guest",
            AccessLevel::Reporter => "reporter",
            AccessLevel::Developer => "developer",
            AccessLevel::Maintainer => "maintainer",
            AccessLevel::Owner => "owner",
        }
    }

    /// Numeric value stored in the `members` table.
    pub fn as_i64(&self) -> i64 {
        match self {
            AccessLevel::Guest => 10,
            AccessLevel::Reporter => 20,
            AccessLevel::Developer => 30,
            AccessLevel::Maintainer => 40,
            AccessLevel::Owner => 50,
        }
    }

    /// Inverse of [`AccessLevel::as_i64`].
    pub fn from_i64(value: i64) -> Result<Self> {
        match value {
            10 => Ok(AccessLevel::Guest),
            20 => Ok(AccessLevel::Reporter),
            30 => Ok(AccessLevel::Developer),
            40 => Ok(AccessLevel::Maintainer),
            50 => Ok(AccessLevel::Owner),
            _ => Err(Error::InvalidAccessLevel(value.to_string())),
        }
    }

    /// Lowest level allowed to move issues in and out of a project.
    pub const RELOCATE: AccessLevel = AccessLevel::Reporter;
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "guest" => Ok(AccessLevel::Guest),
            "reporter" => Ok(AccessLevel::Reporter),
            "developer" => Ok(AccessLevel::Developer),
            "maintainer" => Ok(AccessLevel::Maintainer),
            "owner" => Ok(AccessLevel::Owner),
            _ => Err(Error::InvalidAccessLevel(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
