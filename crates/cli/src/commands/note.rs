// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use relo_core::{Database, Note};

use super::{open_db, resolve_issue, resolve_principal};
use crate::config::Config;
use crate::error::{Error, Result};

pub fn run(issue: &str, body: &str, as_user: Option<&str>) -> Result<()> {
    let (db, config, _work_dir) = open_db()?;
    run_impl(&db, &config, issue, body, as_user)?;
    println!("Added note to {}", issue.trim());
    Ok(())
}

/// Internal implementation that accepts db/config for testing.
pub(crate) fn run_impl(
    db: &Database,
    config: &Config,
    issue: &str,
    body: &str,
    as_user: Option<&str>,
) -> Result<Note> {
    let author = resolve_principal(db, config, as_user)?;
    let (_project, issue) = resolve_issue(db, issue)?;

    let body = body.trim();
    if body.is_empty() {
        return Err(Error::Validation {
            field: "note",
            reason: "can't be blank".to_string(),
        });
    }

    Ok(db.add_note(issue.id, author.id, body)?)
}

#[cfg(test)]
#[path = "note_tests.rs"]
mod tests;
