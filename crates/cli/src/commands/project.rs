// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use relo_core::{AccessLevel, Database, Project, Visibility};

use super::{open_db, resolve_project};
use crate::display::format_issue_line;
use crate::error::{Error, Result};

pub fn add(path: &str, public: bool) -> Result<()> {
    let (db, _config, _work_dir) = open_db()?;
    let project = add_impl(&db, path, public)?;
    println!("Created project {} ({})", project.path, project.visibility);
    Ok(())
}

pub(crate) fn add_impl(db: &Database, path: &str, public: bool) -> Result<Project> {
    let visibility = if public {
        Visibility::Public
    } else {
        Visibility::Private
    };
    Ok(db.create_project(path, visibility)?)
}

pub fn add_member(project: &str, user: &str, level: &str) -> Result<()> {
    let (db, _config, _work_dir) = open_db()?;
    let level = add_member_impl(&db, project, user, level)?;
    println!("Added {} to {} as {}", user, project, level);
    Ok(())
}

pub(crate) fn add_member_impl(
    db: &Database,
    project: &str,
    user: &str,
    level: &str,
) -> Result<AccessLevel> {
    let level: AccessLevel = level.parse()?;
    let project = resolve_project(db, project)?;
    let user = db
        .find_user_by_name(user)?
        .ok_or_else(|| Error::UserNotFound(user.to_string()))?;
    db.add_member(project.id, user.id, level)?;
    Ok(level)
}

pub fn issues(path: &str) -> Result<()> {
    let (db, _config, _work_dir) = open_db()?;
    for line in issues_impl(&db, path)? {
        println!("{}", line);
    }
    Ok(())
}

pub(crate) fn issues_impl(db: &Database, path: &str) -> Result<Vec<String>> {
    let project = resolve_project(db, path)?;
    let lines = db
        .list_issues(project.id)?
        .iter()
        .map(|issue| format_issue_line(&issue.to_reference(&project.path), issue))
        .collect();
    Ok(lines)
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
