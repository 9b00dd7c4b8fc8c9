// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use relo_core::{Database, Event, Issue, Note};
use serde::Serialize;

use super::{open_db, resolve_issue, username};
use crate::cli::OutputFormat;
use crate::display::{format_issue_details, format_note};
use crate::error::Result;

/// JSON shape of `relo show -o json`.
#[derive(Debug, Serialize)]
struct IssueDetails<'a> {
    reference: String,
    project: &'a str,
    author: String,
    #[serde(flatten)]
    issue: &'a Issue,
    notes: Vec<NoteDetails<'a>>,
    events: Vec<Event>,
}

#[derive(Debug, Serialize)]
struct NoteDetails<'a> {
    author: String,
    #[serde(flatten)]
    note: &'a Note,
}

pub fn run(reference: &str, format: OutputFormat) -> Result<()> {
    let (db, _config, _work_dir) = open_db()?;
    println!("{}", run_impl(&db, reference, format)?);
    Ok(())
}

/// Internal implementation that accepts db for testing.
pub(crate) fn run_impl(db: &Database, reference: &str, format: OutputFormat) -> Result<String> {
    let (project, issue) = resolve_issue(db, reference)?;
    let reference = issue.to_reference(&project.path);
    let author = username(db, issue.author_id)?;
    let notes = db.get_notes(issue.id)?;

    match format {
        OutputFormat::Text => {
            let updated_by = issue.updated_by_id.map(|id| username(db, id)).transpose()?;
            let mut out =
                format_issue_details(&reference, &issue, &author, updated_by.as_deref());
            if !notes.is_empty() {
                out.push_str("\n\nNotes:");
                for note in &notes {
                    out.push('\n');
                    out.push_str(&format_note(note, &username(db, note.author_id)?));
                }
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let notes = notes
                .iter()
                .map(|note| {
                    Ok(NoteDetails {
                        author: username(db, note.author_id)?,
                        note,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let details = IssueDetails {
                reference,
                project: &project.path,
                author,
                issue: &issue,
                notes,
                events: db.get_events(issue.id)?,
            };
            Ok(serde_json::to_string_pretty(&details)?)
        }
    }
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
