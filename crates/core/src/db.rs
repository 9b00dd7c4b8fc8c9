// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed store for projects, issues and their discussions.
//!
//! The [`Database`] struct provides all data access operations and implements
//! every capability trait in [`crate::store`], so one handle can drive a
//! [`Relocator`](crate::Relocator) on its own.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::error::{Error, Result};
use crate::issue::{
    Action, Event, Issue, IssueState, MergeRequest, Milestone, NewIssue, Note, SystemAction,
};
use crate::project::{validate_project_path, AccessLevel, Principal, Project, Visibility};
use crate::relocate::{MoveDirection, MovedRecord};
use crate::store::{AuditSink, Authorizer, IssueStore, NoteStore, ProjectStore, ReferenceLookup};

/// SQL schema for the tracker database.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

-- Path doubles as the full-form reference prefix
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path TEXT NOT NULL UNIQUE,
    visibility TEXT NOT NULL DEFAULT 'private',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS members (
    project_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    access_level INTEGER NOT NULL,
    PRIMARY KEY (project_id, user_id),
    FOREIGN KEY (project_id) REFERENCES projects(id),
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS milestones (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL,
    iid INTEGER NOT NULL,
    title TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (project_id, iid),
    FOREIGN KEY (project_id) REFERENCES projects(id)
);

CREATE TABLE IF NOT EXISTS merge_requests (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL,
    iid INTEGER NOT NULL,
    title TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (project_id, iid),
    FOREIGN KEY (project_id) REFERENCES projects(id)
);

CREATE TABLE IF NOT EXISTS issues (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL,
    iid INTEGER NOT NULL,
    author_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    state TEXT NOT NULL DEFAULT 'open',
    assignee TEXT,
    milestone_id INTEGER,
    updated_by_id INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (project_id, iid),
    FOREIGN KEY (project_id) REFERENCES projects(id),
    FOREIGN KEY (author_id) REFERENCES users(id),
    FOREIGN KEY (milestone_id) REFERENCES milestones(id)
);

-- Labels as raw strings
CREATE TABLE IF NOT EXISTS labels (
    issue_id INTEGER NOT NULL,
    label TEXT NOT NULL,
    PRIMARY KEY (issue_id, label),
    FOREIGN KEY (issue_id) REFERENCES issues(id)
);

-- project_id mirrors the owning issue's project
CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    issue_id INTEGER NOT NULL,
    project_id INTEGER NOT NULL,
    author_id INTEGER NOT NULL,
    body TEXT NOT NULL,
    system INTEGER NOT NULL DEFAULT 0,
    system_action TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (issue_id) REFERENCES issues(id),
    FOREIGN KEY (project_id) REFERENCES projects(id)
);

-- Event log (audit trail)
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    issue_id INTEGER NOT NULL,
    action TEXT NOT NULL,
    actor_id INTEGER,
    detail TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (issue_id) REFERENCES issues(id)
);

CREATE INDEX IF NOT EXISTS idx_issues_project ON issues(project_id);
CREATE INDEX IF NOT EXISTS idx_notes_issue ON notes(issue_id, id);
CREATE INDEX IF NOT EXISTS idx_events_issue ON events(issue_id);
CREATE INDEX IF NOT EXISTS idx_members_user ON members(user_id);
"#;

const ISSUE_COLUMNS: &str = "id, project_id, iid, author_id, title, description, state, \
     assignee, milestone_id, updated_by_id, created_at, updated_at";

const NOTE_COLUMNS: &str =
    "id, issue_id, project_id, author_id, body, system, system_action, created_at";

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

fn issue_from_row(row: &Row<'_>) -> std::result::Result<Issue, rusqlite::Error> {
    let state_str: String = row.get(6)?;
    let created_str: String = row.get(10)?;
    let updated_str: String = row.get(11)?;
    Ok(Issue {
        id: row.get(0)?,
        project_id: row.get(1)?,
        iid: row.get(2)?,
        author_id: row.get(3)?,
        title: row.get(4)?,
        description: row.get(5)?,
        state: parse_db(&state_str, "state")?,
        assignee: row.get(7)?,
        milestone_id: row.get(8)?,
        updated_by_id: row.get(9)?,
        labels: Vec::new(),
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

fn note_from_row(row: &Row<'_>) -> std::result::Result<Note, rusqlite::Error> {
    let action_str: Option<String> = row.get(6)?;
    let created_str: String = row.get(7)?;
    Ok(Note {
        id: row.get(0)?,
        issue_id: row.get(1)?,
        project_id: row.get(2)?,
        author_id: row.get(3)?,
        body: row.get(4)?,
        system: row.get(5)?,
        system_action: action_str
            .map(|s| parse_db(&s, "system_action"))
            .transpose()?,
        created_at: parse_timestamp(&created_str, "created_at")?,
    })
}

fn project_from_row(row: &Row<'_>) -> std::result::Result<Project, rusqlite::Error> {
    let visibility_str: String = row.get(2)?;
    let created_str: String = row.get(3)?;
    Ok(Project {
        id: row.get(0)?,
        path: row.get(1)?,
        visibility: parse_db(&visibility_str, "visibility")?,
        created_at: parse_timestamp(&created_str, "created_at")?,
    })
}

/// Run schema creation on a database connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite database connection with tracker operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Run `f` inside a single transaction, committing only if it succeeds.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Users and membership
    // ─────────────────────────────────────────────────────────────────────

    /// Create a user.
    pub fn create_user(&self, username: &str) -> Result<Principal> {
        let username = username.trim();
        if username.is_empty() || username.contains(char::is_whitespace) {
            return Err(Error::Validation {
                field: "username",
                reason: format!("'{username}' must be a single non-empty word"),
            });
        }
        if self.find_user_by_name(username)?.is_some() {
            return Err(Error::Validation {
                field: "username",
                reason: format!("'{username}' has already been taken"),
            });
        }
        self.conn.execute(
            "INSERT INTO users (username, created_at) VALUES (?1, ?2)",
            params![username, Utc::now().to_rfc3339()],
        )?;
        Ok(Principal {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
        })
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: i64) -> Result<Principal> {
        self.conn
            .query_row(
                "SELECT id, username FROM users WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Principal {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| Error::UserNotFound(id.to_string()))
    }

    /// Look up a user by name.
    pub fn find_user_by_name(&self, username: &str) -> Result<Option<Principal>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(Principal {
                        id: row.get(0)?,
                        username: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Grant `user_id` the given access level on a project, replacing any previous grant.
    pub fn add_member(&self, project_id: i64, user_id: i64, level: AccessLevel) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO members (project_id, user_id, access_level)
             VALUES (?1, ?2, ?3)",
            params![project_id, user_id, level.as_i64()],
        )?;
        Ok(())
    }

    /// Access level of a user on a project, if they are a member.
    pub fn member_access(&self, project_id: i64, user_id: i64) -> Result<Option<AccessLevel>> {
        let level: Option<i64> = self
            .conn
            .query_row(
                "SELECT access_level FROM members WHERE project_id = ?1 AND user_id = ?2",
                params![project_id, user_id],
                |row| row.get(0),
            )
            .optional()?;
        level.map(AccessLevel::from_i64).transpose()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Projects
    // ─────────────────────────────────────────────────────────────────────

    /// Create a project.
    pub fn create_project(&self, path: &str, visibility: Visibility) -> Result<Project> {
        if !validate_project_path(path) {
            return Err(Error::Validation {
                field: "path",
                reason: format!("'{path}' must be slash-separated letters, digits, '_', '-' or '.'"),
            });
        }
        if self.find_project_by_path(path)?.is_some() {
            return Err(Error::Validation {
                field: "path",
                reason: format!("'{path}' has already been taken"),
            });
        }
        self.conn.execute(
            "INSERT INTO projects (path, visibility, created_at) VALUES (?1, ?2, ?3)",
            params![path, visibility.as_str(), Utc::now().to_rfc3339()],
        )?;
        self.get_project(self.conn.last_insert_rowid())
    }

    /// Get a project by ID.
    pub fn get_project(&self, id: i64) -> Result<Project> {
        self.conn
            .query_row(
                "SELECT id, path, visibility, created_at FROM projects WHERE id = ?1",
                params![id],
                project_from_row,
            )
            .optional()?
            .ok_or_else(|| Error::ProjectNotFound(id.to_string()))
    }

    /// Look up a project by its full path.
    pub fn find_project_by_path(&self, path: &str) -> Result<Option<Project>> {
        let project = self
            .conn
            .query_row(
                "SELECT id, path, visibility, created_at FROM projects WHERE path = ?1",
                params![path],
                project_from_row,
            )
            .optional()?;
        Ok(project)
    }

    /// Get a project by its full path.
    pub fn get_project_by_path(&self, path: &str) -> Result<Project> {
        self.find_project_by_path(path)?
            .ok_or_else(|| Error::ProjectNotFound(path.to_string()))
    }

    /// Next free display number for a project-scoped table.
    fn next_iid(&self, table: &str, project_id: i64) -> Result<i64> {
        let sql = format!("SELECT COALESCE(MAX(iid), 0) + 1 FROM {table} WHERE project_id = ?1");
        let iid = self
            .conn
            .query_row(&sql, params![project_id], |row| row.get(0))?;
        Ok(iid)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Issues
    // ─────────────────────────────────────────────────────────────────────

    /// Validate and insert a new issue, assigning its `id` and `iid`.
    pub fn create_issue(&self, params: &NewIssue) -> Result<Issue> {
        params.validate()?;

        let project = match self.get_project(params.project_id) {
            Ok(project) => project,
            Err(Error::ProjectNotFound(id)) => {
                return Err(Error::Validation {
                    field: "project",
                    reason: format!("project {id} does not exist"),
                })
            }
            Err(e) => return Err(e),
        };

        if let Some(milestone_id) = params.milestone_id {
            let owner: Option<i64> = self
                .conn
                .query_row(
                    "SELECT project_id FROM milestones WHERE id = ?1",
                    params![milestone_id],
                    |row| row.get(0),
                )
                .optional()?;
            if owner != Some(project.id) {
                return Err(Error::Validation {
                    field: "milestone",
                    reason: format!("milestone {milestone_id} is not in {}", project.path),
                });
            }
        }

        let iid = self.next_iid("issues", project.id)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO issues (project_id, iid, author_id, title, description, state,
             assignee, milestone_id, updated_by_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                project.id,
                iid,
                params.author_id,
                params.title.trim(),
                params.description,
                IssueState::Open.as_str(),
                params.assignee,
                params.milestone_id,
                params.updated_by_id,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();

        for label in &params.labels {
            self.add_label(id, label)?;
        }

        self.log_event(
            &Event::new(id, Action::Created)
                .with_actor(Some(params.updated_by_id.unwrap_or(params.author_id))),
        )?;

        self.get_issue(id)
    }

    /// Get an issue by ID.
    pub fn get_issue(&self, id: i64) -> Result<Issue> {
        let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?1");
        let issue = self
            .conn
            .query_row(&sql, params![id], issue_from_row)
            .optional()?
            .ok_or_else(|| Error::IssueNotFound(id.to_string()))?;
        self.with_labels(issue)
    }

    /// Look up an issue by its display number within a project.
    pub fn find_issue_by_iid(&self, project_id: i64, iid: i64) -> Result<Option<Issue>> {
        let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE project_id = ?1 AND iid = ?2");
        let issue = self
            .conn
            .query_row(&sql, params![project_id, iid], issue_from_row)
            .optional()?;
        issue.map(|i| self.with_labels(i)).transpose()
    }

    /// List a project's issues in display order.
    pub fn list_issues(&self, project_id: i64) -> Result<Vec<Issue>> {
        let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE project_id = ?1 ORDER BY iid");
        let mut stmt = self.conn.prepare(&sql)?;
        let issues = stmt
            .query_map(params![project_id], issue_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        issues.into_iter().map(|i| self.with_labels(i)).collect()
    }

    fn with_labels(&self, mut issue: Issue) -> Result<Issue> {
        issue.labels = self.get_labels(issue.id)?;
        Ok(issue)
    }

    /// Set the state of an issue, recording who did it.
    pub fn update_issue_state(&self, id: i64, state: IssueState, actor_id: i64) -> Result<Issue> {
        let affected = self.conn.execute(
            "UPDATE issues SET state = ?1, updated_by_id = ?2, updated_at = ?3 WHERE id = ?4",
            params![state.as_str(), actor_id, Utc::now().to_rfc3339(), id],
        )?;

        if affected == 0 {
            return Err(Error::IssueNotFound(id.to_string()));
        }

        let action = match state {
            IssueState::Open => Action::Reopened,
            IssueState::Closed => Action::Closed,
        };
        self.log_event(&Event::new(id, action).with_actor(Some(actor_id)))?;

        self.get_issue(id)
    }

    /// Add a label to an issue.
    pub fn add_label(&self, issue_id: i64, label: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO labels (issue_id, label) VALUES (?1, ?2)",
            params![issue_id, label],
        )?;
        Ok(())
    }

    /// Get all labels for an issue.
    pub fn get_labels(&self, issue_id: i64) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT label FROM labels WHERE issue_id = ?1 ORDER BY label")?;

        let labels = stmt
            .query_map(params![issue_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(labels)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Merge requests and milestones
    // ─────────────────────────────────────────────────────────────────────

    fn require_title(title: &str) -> Result<&str> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::Validation {
                field: "title",
                reason: "can't be blank".to_string(),
            });
        }
        Ok(title)
    }

    /// Create a merge request in a project.
    pub fn create_merge_request(&self, project_id: i64, title: &str) -> Result<MergeRequest> {
        let title = Self::require_title(title)?;
        let project = self.get_project(project_id)?;
        let iid = self.next_iid("merge_requests", project.id)?;
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO merge_requests (project_id, iid, title, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![project.id, iid, title, created_at.to_rfc3339()],
        )?;
        Ok(MergeRequest {
            id: self.conn.last_insert_rowid(),
            iid,
            project_id: project.id,
            title: title.to_string(),
            created_at,
        })
    }

    /// Look up a merge request by its display number within a project.
    pub fn find_merge_request_by_iid(
        &self,
        project_id: i64,
        iid: i64,
    ) -> Result<Option<MergeRequest>> {
        let mr = self
            .conn
            .query_row(
                "SELECT id, iid, project_id, title, created_at
                 FROM merge_requests WHERE project_id = ?1 AND iid = ?2",
                params![project_id, iid],
                |row| {
                    let created_str: String = row.get(4)?;
                    Ok(MergeRequest {
                        id: row.get(0)?,
                        iid: row.get(1)?,
                        project_id: row.get(2)?,
                        title: row.get(3)?,
                        created_at: parse_timestamp(&created_str, "created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(mr)
    }

    /// Create a milestone in a project.
    pub fn create_milestone(&self, project_id: i64, title: &str) -> Result<Milestone> {
        let title = Self::require_title(title)?;
        let project = self.get_project(project_id)?;
        let iid = self.next_iid("milestones", project.id)?;
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO milestones (project_id, iid, title, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![project.id, iid, title, created_at.to_rfc3339()],
        )?;
        Ok(Milestone {
            id: self.conn.last_insert_rowid(),
            iid,
            project_id: project.id,
            title: title.to_string(),
            created_at,
        })
    }

    /// Look up a milestone by its display number within a project.
    pub fn find_milestone_by_iid(&self, project_id: i64, iid: i64) -> Result<Option<Milestone>> {
        let milestone = self
            .conn
            .query_row(
                "SELECT id, iid, project_id, title, created_at
                 FROM milestones WHERE project_id = ?1 AND iid = ?2",
                params![project_id, iid],
                |row| {
                    let created_str: String = row.get(4)?;
                    Ok(Milestone {
                        id: row.get(0)?,
                        iid: row.get(1)?,
                        project_id: row.get(2)?,
                        title: row.get(3)?,
                        created_at: parse_timestamp(&created_str, "created_at")?,
                    })
                },
            )
            .optional()?;
        Ok(milestone)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Notes
    // ─────────────────────────────────────────────────────────────────────

    /// Add a user note to an issue. The note inherits the issue's project.
    pub fn add_note(&self, issue_id: i64, author_id: i64, body: &str) -> Result<Note> {
        let issue = self.get_issue(issue_id)?;
        let note = self.insert_note(&Note {
            id: 0,
            issue_id: issue.id,
            project_id: issue.project_id,
            author_id,
            body: body.to_string(),
            system: false,
            system_action: None,
            created_at: Utc::now(),
        })?;
        self.log_event(&Event::new(issue.id, Action::Noted).with_actor(Some(author_id)))?;
        Ok(note)
    }

    fn insert_note(&self, note: &Note) -> Result<Note> {
        self.conn.execute(
            "INSERT INTO notes (issue_id, project_id, author_id, body, system, system_action,
             created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                note.issue_id,
                note.project_id,
                note.author_id,
                note.body,
                note.system,
                note.system_action.map(|a| a.as_str()),
                note.created_at.to_rfc3339(),
            ],
        )?;
        Ok(Note {
            id: self.conn.last_insert_rowid(),
            ..note.clone()
        })
    }

    /// Get all notes for an issue, in the order they were written.
    pub fn get_notes(&self, issue_id: i64) -> Result<Vec<Note>> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE issue_id = ?1 ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;

        let notes = stmt
            .query_map(params![issue_id], note_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    /// One page of an issue's notes with ids greater than `after_id`.
    pub fn find_notes(
        &self,
        issue_id: i64,
        after_id: Option<i64>,
        limit: usize,
    ) -> Result<Vec<Note>> {
        let sql = format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE issue_id = ?1 AND id > ?2 ORDER BY id LIMIT ?3"
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let notes = stmt
            .query_map(params![issue_id, after_id.unwrap_or(0), limit_i64], note_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    /// Copy a note onto another issue, keeping author, body and timestamp.
    pub fn duplicate_note(&self, note: &Note, issue: &Issue, project: &Project) -> Result<Note> {
        if issue.project_id != project.id {
            return Err(Error::Validation {
                field: "project",
                reason: format!(
                    "issue {} belongs to project {}, not {}",
                    issue.id, issue.project_id, project.path
                ),
            });
        }
        self.insert_note(&Note {
            id: 0,
            issue_id: issue.id,
            project_id: project.id,
            ..note.clone()
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────

    /// Log an event.
    pub fn log_event(&self, event: &Event) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO events (issue_id, action, actor_id, detail, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.issue_id,
                event.action.as_str(),
                event.actor_id,
                event.detail,
                event.created_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all events for an issue, oldest first.
    pub fn get_events(&self, issue_id: i64) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, issue_id, action, actor_id, detail, created_at
             FROM events WHERE issue_id = ?1 ORDER BY id",
        )?;

        let events = stmt
            .query_map(params![issue_id], |row| {
                let action_str: String = row.get(2)?;
                let created_str: String = row.get(5)?;
                Ok(Event {
                    id: row.get(0)?,
                    issue_id: row.get(1)?,
                    action: parse_db(&action_str, "action")?,
                    actor_id: row.get(3)?,
                    detail: row.get(4)?,
                    created_at: parse_timestamp(&created_str, "created_at")?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(events)
    }
}

impl ProjectStore for Database {
    fn get_project(&self, id: i64) -> Result<Project> {
        Database::get_project(self, id)
    }

    fn find_project_by_path(&self, path: &str) -> Result<Option<Project>> {
        Database::find_project_by_path(self, path)
    }
}

impl IssueStore for Database {
    fn get_issue(&self, id: i64) -> Result<Issue> {
        Database::get_issue(self, id)
    }

    fn create_issue(&self, params: &NewIssue) -> Result<Issue> {
        Database::create_issue(self, params)
    }

    fn update_issue_state(&self, id: i64, state: IssueState, actor_id: i64) -> Result<Issue> {
        Database::update_issue_state(self, id, state, actor_id)
    }

    fn find_notes(&self, issue_id: i64, after_id: Option<i64>, limit: usize) -> Result<Vec<Note>> {
        Database::find_notes(self, issue_id, after_id, limit)
    }
}

impl NoteStore for Database {
    fn duplicate_note(&self, note: &Note, issue: &Issue, project: &Project) -> Result<Note> {
        Database::duplicate_note(self, note, issue, project)
    }
}

impl ReferenceLookup for Database {
    fn find_issue_by_iid(&self, project_id: i64, iid: i64) -> Result<Option<Issue>> {
        Database::find_issue_by_iid(self, project_id, iid)
    }

    fn find_merge_request_by_iid(
        &self,
        project_id: i64,
        iid: i64,
    ) -> Result<Option<MergeRequest>> {
        Database::find_merge_request_by_iid(self, project_id, iid)
    }

    fn find_milestone_by_iid(&self, project_id: i64, iid: i64) -> Result<Option<Milestone>> {
        Database::find_milestone_by_iid(self, project_id, iid)
    }
}

/// Membership-based policy: relocating needs reporter access, reading needs
/// membership or a public project.
impl Authorizer for Database {
    fn can_relocate(&self, principal: &Principal, project: &Project) -> bool {
        match self.member_access(project.id, principal.id) {
            Ok(level) => level.is_some_and(|l| l >= AccessLevel::RELOCATE),
            Err(e) => {
                tracing::warn!(project = %project.path, error = %e, "membership lookup failed");
                false
            }
        }
    }

    fn can_read(&self, principal: &Principal, project: &Project) -> bool {
        if project.visibility == Visibility::Public {
            return true;
        }
        match self.member_access(project.id, principal.id) {
            Ok(level) => level.is_some(),
            Err(e) => {
                tracing::warn!(project = %project.path, error = %e, "membership lookup failed");
                false
            }
        }
    }
}

/// Writes each record as a `moved` system note plus an event log entry.
impl AuditSink for Database {
    fn record_moved(&self, record: &MovedRecord) -> Result<()> {
        self.insert_note(&Note {
            id: 0,
            issue_id: record.issue_id,
            project_id: record.project_id,
            author_id: record.principal_id,
            body: record.body(),
            system: true,
            system_action: Some(SystemAction::Moved),
            created_at: Utc::now(),
        })?;

        let action = match record.direction {
            MoveDirection::To => Action::MovedTo,
            MoveDirection::From => Action::MovedFrom,
        };
        self.log_event(
            &Event::new(record.issue_id, action)
                .with_actor(Some(record.principal_id))
                .with_detail(Some(record.counterpart_reference.clone())),
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
