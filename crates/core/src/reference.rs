// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-references embedded in free text.
//!
//! A reference is written either in short form (`#5`, `!3`, `%2`), which only
//! resolves inside the project the text belongs to, or in full form
//! (`group/app#5`), which resolves from anywhere.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::project::PROJECT_PATH_PATTERN;

// Characters that may not directly precede a short-form reference. `&`
// guards HTML entities like `&#39;`.
const SHORT_GUARD: &str = "A-Za-z0-9_#!%&";

// A full-form reference additionally may not follow a path character, or the
// match would start in the middle of a longer path or URL.
const FULL_GUARD: &str = "A-Za-z0-9_./#!%&-";

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?:(?:^|[^{FULL_GUARD}])(?P<path>{PROJECT_PATH_PATTERN})|(?:^|[^{SHORT_GUARD}]))(?P<sigil>[#!%])(?P<iid>\d+)\b"
    );
    match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

static FULL_REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"^(?P<path>{PROJECT_PATH_PATTERN})(?P<sigil>[#!%])(?P<iid>\d+)$");
    match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    }
});

/// The kinds of entity a reference can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Issue,
    MergeRequest,
    Milestone,
}

impl ReferenceKind {
    /// Processing order used when rewriting.
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::Issue,
        ReferenceKind::MergeRequest,
        ReferenceKind::Milestone,
    ];

    /// The character separating project path and iid.
    pub fn sigil(&self) -> char {
        match self {
            ReferenceKind::Issue => '#',
            ReferenceKind::MergeRequest => '!',
            ReferenceKind::Milestone => '%',
        }
    }

    pub fn from_sigil(sigil: char) -> Option<Self> {
        match sigil {
            '#' => Some(ReferenceKind::Issue),
            '!' => Some(ReferenceKind::MergeRequest),
            '%' => Some(ReferenceKind::Milestone),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Issue => "issue",
            ReferenceKind::MergeRequest => "merge_request",
            ReferenceKind::Milestone => "milestone",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reference as found in text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub kind: ReferenceKind,
    /// Qualifying project path, absent for short-form references.
    pub project_path: Option<String>,
    pub iid: i64,
    /// The text exactly as written.
    pub literal: String,
}

impl Reference {
    /// Parses a single full-form reference such as `group/app#12`.
    pub fn parse_full(input: &str) -> Option<Self> {
        let caps = FULL_REFERENCE_RE.captures(input.trim())?;
        let sigil = caps.name("sigil")?.as_str().chars().next()?;
        Some(Reference {
            kind: ReferenceKind::from_sigil(sigil)?,
            project_path: caps.name("path").map(|m| m.as_str().to_string()),
            iid: caps.name("iid")?.as_str().parse().ok()?,
            literal: input.trim().to_string(),
        })
    }

    pub fn is_short(&self) -> bool {
        self.project_path.is_none()
    }
}

/// Renders the full form of a reference to an entity in `project_path`.
pub fn full_form(kind: ReferenceKind, project_path: &str, iid: i64) -> String {
    format!("{project_path}{}{iid}", kind.sigil())
}

/// References found in a body of text, partitioned by kind.
///
/// Each partition keeps first-appearance order and holds one entry per
/// distinct literal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSet {
    pub issues: Vec<Reference>,
    pub merge_requests: Vec<Reference>,
    pub milestones: Vec<Reference>,
}

impl ReferenceSet {
    /// Scans `text` for issue, merge request and milestone references.
    pub fn extract(text: &str) -> Self {
        let mut set = ReferenceSet::default();
        let mut seen = HashSet::new();

        for caps in REFERENCE_RE.captures_iter(text) {
            let (Some(sigil), Some(iid)) = (caps.name("sigil"), caps.name("iid")) else {
                continue;
            };
            let path = caps.name("path");
            let start = path.map_or(sigil.start(), |m| m.start());
            let literal = &text[start..iid.end()];
            // Out-of-range numbers cannot name a record.
            let Ok(iid) = iid.as_str().parse::<i64>() else {
                continue;
            };
            let Some(kind) = sigil.as_str().chars().next().and_then(ReferenceKind::from_sigil)
            else {
                continue;
            };
            if !seen.insert(literal) {
                continue;
            }
            let reference = Reference {
                kind,
                project_path: path.map(|m| m.as_str().to_string()),
                iid,
                literal: literal.to_string(),
            };
            set.partition_mut(kind).push(reference);
        }

        set
    }

    pub fn of_kind(&self, kind: ReferenceKind) -> &[Reference] {
        match kind {
            ReferenceKind::Issue => &self.issues,
            ReferenceKind::MergeRequest => &self.merge_requests,
            ReferenceKind::Milestone => &self.milestones,
        }
    }

    fn partition_mut(&mut self, kind: ReferenceKind) -> &mut Vec<Reference> {
        match kind {
            ReferenceKind::Issue => &mut self.issues,
            ReferenceKind::MergeRequest => &mut self.merge_requests,
            ReferenceKind::Milestone => &mut self.milestones,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty() && self.merge_requests.is_empty() && self.milestones.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len() + self.merge_requests.len() + self.milestones.len()
    }
}

/// Text-bearing content that may contain references, tagged by origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mentionable<'a> {
    IssueDescription(&'a str),
    NoteBody(&'a str),
}

impl<'a> Mentionable<'a> {
    pub const ISSUE_DESCRIPTION: &'static str = "issue_description";
    pub const NOTE_BODY: &'static str = "note_body";

    /// Builds content from a stored kind tag.
    ///
    /// Any tag other than an issue description or note body is rejected with
    /// [`Error::UnsupportedContentType`].
    #[allow(dead_code)]
    pub(crate) fn from_tagged(tag: &str, text: &'a str) -> Result<Self> {
        match tag {
            "issue_description" => Ok(Mentionable::IssueDescription(text)),
            "note_body" => Ok(Mentionable::NoteBody(text)),
            other => Err(Error::UnsupportedContentType(other.to_string())),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Mentionable::IssueDescription(_) => Self::ISSUE_DESCRIPTION,
            Mentionable::NoteBody(_) => Self::NOTE_BODY,
        }
    }

    pub fn text(&self) -> &'a str {
        match self {
            Mentionable::IssueDescription(text) | Mentionable::NoteBody(text) => text,
        }
    }
}

fn is_leading_guard(c: char, full_form: bool) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '_' | '#' | '!' | '%' | '&')
        || (full_form && matches!(c, '.' | '/' | '-'))
}

fn is_trailing_guard(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Replaces every standalone occurrence of `literal` in `text`.
///
/// An occurrence is standalone when it is not glued to a longer reference or
/// word: `#5` is replaced in `see #5.` and `#4-#5` but not in `#50` or
/// `app#5`. A full-form literal such as `B#5` is also left alone inside a
/// longer path like `A/B#5`.
pub fn replace_literal(text: &str, literal: &str, replacement: &str) -> String {
    let Some(first) = literal.chars().next() else {
        return text.to_string();
    };
    let full_form = ReferenceKind::from_sigil(first).is_none();

    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for (start, matched) in text.match_indices(literal) {
        // Overlapping occurrence already inside a replaced span.
        if start < last {
            continue;
        }
        let end = start + matched.len();
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_leading_guard(c, full_form));
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_trailing_guard(c));
        if before_ok && after_ok {
            out.push_str(&text[last..start]);
            out.push_str(replacement);
            last = end;
        }
    }

    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
#[path = "reference_tests.rs"]
mod tests;
