// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use relo_core::{Database, Issue, NewIssue};

use super::{open_db, resolve_principal, resolve_project};
use crate::config::Config;
use crate::error::{Error, Result};

/// Arguments of `relo issue new`.
#[derive(Debug, Clone, Default)]
pub struct NewArgs {
    pub project: String,
    pub title: String,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub milestone: Option<i64>,
    pub assignee: Option<String>,
    pub as_user: Option<String>,
}

pub fn new(args: NewArgs) -> Result<()> {
    let (db, config, _work_dir) = open_db()?;
    let project = args.project.clone();
    let issue = new_impl(&db, &config, args)?;
    println!(
        "Created {}: {}",
        issue.to_reference(&project),
        issue.title
    );
    Ok(())
}

pub(crate) fn new_impl(db: &Database, config: &Config, args: NewArgs) -> Result<Issue> {
    let author = resolve_principal(db, config, args.as_user.as_deref())?;
    let project = resolve_project(db, &args.project)?;

    let milestone_id = match args.milestone {
        Some(iid) => Some(
            db.find_milestone_by_iid(project.id, iid)?
                .ok_or_else(|| Error::Validation {
                    field: "milestone",
                    reason: format!("{}%{} does not exist", project.path, iid),
                })?
                .id,
        ),
        None => None,
    };

    // Labels may be comma-separated or repeated
    let labels: Vec<String> = args
        .labels
        .iter()
        .flat_map(|l| l.split(','))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    let mut params = NewIssue::new(project.id, author.id, args.title)
        .with_labels(labels)
        .with_milestone(milestone_id);
    params.description = args.description;
    params.assignee = args.assignee;

    Ok(db.create_issue(&params)?)
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
