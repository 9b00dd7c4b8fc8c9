// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use relo_core::{Issue, Note};

/// Indentation applied to multi-line bodies.
const BODY_INDENT: &str = "    ";

/// Timestamp format for notes.
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Indent every line of `text`, keeping blank lines blank.
pub fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line summary: `- [open] group/app#3: Fix crash`
pub fn format_issue_line(reference: &str, issue: &Issue) -> String {
    format!("- [{}] {}: {}", issue.state, reference, issue.title)
}

/// Header block of `relo show`.
pub fn format_issue_details(
    reference: &str,
    issue: &Issue,
    author: &str,
    updated_by: Option<&str>,
) -> String {
    let mut lines = vec![format!("[{}] {}: {}", issue.state, reference, issue.title)];
    lines.push(format!("Author: {}", author));
    if let Some(assignee) = &issue.assignee {
        lines.push(format!("Assignee: {}", assignee));
    }
    if !issue.labels.is_empty() {
        lines.push(format!("Labels: {}", issue.labels.join(", ")));
    }
    if let Some(name) = updated_by {
        lines.push(format!("Updated by: {}", name));
    }
    lines.push(format!(
        "Created: {}",
        issue.created_at.format(TIME_FORMAT)
    ));

    if let Some(description) = issue.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(String::new());
        lines.push("Description:".to_string());
        lines.push(indent(description, BODY_INDENT));
    }

    lines.join("\n")
}

/// A note with its author and time, body indented below.
pub fn format_note(note: &Note, author: &str) -> String {
    let marker = if note.system { " (system)" } else { "" };
    format!(
        "  {} {}{}\n{}",
        note.created_at.format(TIME_FORMAT),
        author,
        marker,
        indent(&note.body, BODY_INDENT)
    )
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
