// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod init;
pub mod issue;
pub mod milestone;
pub mod mr;
pub mod mv;
pub mod note;
pub mod project;
pub mod show;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod user;

use std::path::PathBuf;

use relo_core::{Database, Issue, Principal, Project, Reference, ReferenceKind};

use crate::config::{find_work_dir, get_db_path, Config};
use crate::error::{Error, Result};

/// Helper to open the database from the current context.
pub fn open_db() -> Result<(Database, Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let db_path = get_db_path(&work_dir, &config);
    let db = Database::open(&db_path)?;
    Ok((db, config, work_dir))
}

/// The user a command acts as: `--as` if given, else the configured user.
pub fn resolve_principal(
    db: &Database,
    config: &Config,
    as_user: Option<&str>,
) -> Result<Principal> {
    let name = as_user
        .or(config.user.as_deref())
        .ok_or(Error::NoUser)?;
    db.find_user_by_name(name)?
        .ok_or_else(|| Error::UserNotFound(name.to_string()))
}

/// Look up a project by path.
pub fn resolve_project(db: &Database, path: &str) -> Result<Project> {
    db.find_project_by_path(path)?
        .ok_or_else(|| Error::ProjectNotFound(path.to_string()))
}

/// Look up an issue from its full-form reference, e.g. `group/app#3`.
pub fn resolve_issue(db: &Database, reference: &str) -> Result<(Project, Issue)> {
    let parsed = Reference::parse_full(reference)
        .filter(|r| r.kind == ReferenceKind::Issue)
        .ok_or_else(|| Error::InvalidReference(reference.to_string()))?;
    let path = parsed
        .project_path
        .as_deref()
        .ok_or_else(|| Error::InvalidReference(reference.to_string()))?;
    let project = resolve_project(db, path)?;
    let issue = db
        .find_issue_by_iid(project.id, parsed.iid)?
        .ok_or_else(|| Error::IssueNotFound(reference.trim().to_string()))?;
    Ok((project, issue))
}

/// Display name for a user id, falling back to `#id` for unknown users.
pub fn username(db: &Database, user_id: i64) -> Result<String> {
    match db.get_user(user_id) {
        Ok(user) => Ok(user.username),
        Err(relo_core::Error::UserNotFound(_)) => Ok(format!("#{}", user_id)),
        Err(e) => Err(e.into()),
    }
}
