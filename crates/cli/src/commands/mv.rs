// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `relo move`: relocate an issue into another project.

use relo_core::{Database, Issue, IssueOverrides, RelocateRequest, Relocation, Relocator};

use super::{open_db, resolve_issue, resolve_principal};
use crate::config::Config;
use crate::error::{Error, Result};

/// Arguments of `relo move`.
#[derive(Debug, Clone, Default)]
pub struct MoveArgs {
    pub issue: String,
    pub to: String,
    pub as_user: Option<String>,
    pub title: Option<String>,
    pub assignee: Option<String>,
}

pub fn run(args: MoveArgs) -> Result<()> {
    let (db, config, _work_dir) = open_db()?;
    let from = args.issue.trim().to_string();
    let to = args.to.clone();
    let new_issue = run_impl(&db, &config, args)?;
    println!("Moved {} to {}", from, new_issue.to_reference(&to));
    Ok(())
}

/// Internal implementation that accepts db/config for testing.
///
/// A destination that does not exist is handed to the relocator as "no
/// destination", which reports the issue as not moved.
pub(crate) fn run_impl(db: &Database, config: &Config, args: MoveArgs) -> Result<Issue> {
    let principal = resolve_principal(db, config, args.as_user.as_deref())?;
    let (project, issue) = resolve_issue(db, &args.issue)?;
    let destination = db.find_project_by_path(&args.to)?;
    if destination.is_none() {
        tracing::warn!(path = %args.to, "destination project does not exist");
    }

    let request = RelocateRequest {
        source_issue_id: issue.id,
        destination_project_id: destination.map(|p| p.id),
        principal,
        overrides: IssueOverrides {
            title: args.title,
            assignee: args.assignee,
        },
    };

    let relocation = if config.relocation.atomic {
        db.in_transaction(|db| relocate(db, config, &request))?
    } else {
        relocate(db, config, &request)?
    };

    match relocation.new_issue {
        Some(new_issue) if relocation.moved => Ok(new_issue),
        _ => Err(Error::NotMoved {
            reference: issue.to_reference(&project.path),
        }),
    }
}

fn relocate(
    db: &Database,
    config: &Config,
    request: &RelocateRequest,
) -> relo_core::Result<Relocation> {
    Relocator::new(db, db, db)
        .with_batch_size(config.relocation.batch_size)
        .relocate(request)
}

#[cfg(test)]
#[path = "mv_tests.rs"]
mod tests;
