// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! relors - a project-scoped issue tracker that can move issues between projects.
//!
//! This crate provides the command layer for the `relo` CLI tool. Storage,
//! reference rewriting and the relocator itself live in [`relo_core`].
//!
//! # Main Components
//!
//! - [`Config`] - Tracker configuration (default user, workspace, relocation settings)
//! - [`Error`] - Error types for all operations
//! - [`run`] - Execute a parsed [`Command`]
//!
//! # Initialization
//!
//! Use [`init_work_dir`] to create a new `.relo/` directory, then open the database:
//!
//! ```rust,ignore
//! use relors::{init_work_dir, find_work_dir, get_db_path, Config};
//! use relo_core::Database;
//!
//! let work_dir = init_work_dir(Path::new("."), &Config::default())?;
//!
//! // Later, find and open an existing tracker
//! let work_dir = find_work_dir()?;
//! let config = Config::load(&work_dir)?;
//! let db = Database::open(&get_db_path(&work_dir, &config))?;
//! ```

mod cli;
mod commands;
mod display;

pub mod config;
pub mod error;

pub use cli::{
    Cli, Command, IssueCommand, MemberCommand, MilestoneCommand, MrCommand, OutputFormat,
    ProjectCommand, UserCommand,
};
pub use config::{find_work_dir, get_db_path, init_work_dir, Config, RelocationConfig};
pub use error::{Error, Result};

/// Environment variable holding the log filter, e.g. `RELO_LOG=debug`.
pub const LOG_ENV: &str = "RELO_LOG";

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init {
            path,
            user,
            workspace,
        } => commands::init::run(path, user, workspace),
        Command::User(UserCommand::Add { name }) => commands::user::add(&name),
        Command::Project(cmd) => match cmd {
            ProjectCommand::Add { path, public } => commands::project::add(&path, public),
            ProjectCommand::Issues { path } => commands::project::issues(&path),
        },
        Command::Member(MemberCommand::Add {
            project,
            user,
            level,
        }) => commands::project::add_member(&project, &user, &level),
        Command::Issue(IssueCommand::New {
            project,
            title,
            description,
            label,
            milestone,
            assignee,
            as_user,
        }) => commands::issue::new(commands::issue::NewArgs {
            project,
            title,
            description,
            labels: label,
            milestone,
            assignee,
            as_user,
        }),
        Command::Mr(MrCommand::New { project, title }) => commands::mr::new(&project, &title),
        Command::Milestone(MilestoneCommand::New { project, title }) => {
            commands::milestone::new(&project, &title)
        }
        Command::Note {
            issue,
            body,
            as_user,
        } => commands::note::run(&issue, &body, as_user.as_deref()),
        Command::Show { issue, output } => commands::show::run(&issue, output),
        Command::Move {
            issue,
            to,
            as_user,
            title,
            assignee,
        } => commands::mv::run(commands::mv::MoveArgs {
            issue,
            to,
            as_user,
            title,
            assignee,
        }),
    }
}
