// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "relo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A project-scoped issue tracker that can move issues between projects")]
#[command(
    long_about = "A project-scoped issue tracker that can move issues between projects.\n\n\
    Moving an issue copies its discussion, rewrites references in its description so \
    they keep pointing at the same things, and closes the original."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a tracker in the current directory
    #[command(after_help = "\
Examples:
  relo init                       Initialize in the current directory
  relo init --user alice          Also create alice and act as her by default
  relo init --workspace ../db     Keep the database in another directory")]
    Init {
        /// Directory to initialize (defaults to the current directory)
        #[arg(long)]
        path: Option<String>,

        /// Default acting user; created if it does not exist
        #[arg(long, short)]
        user: Option<String>,

        /// Directory for the database (relative to the project root or absolute)
        #[arg(long)]
        workspace: Option<String>,
    },

    /// Manage users
    #[command(subcommand)]
    User(UserCommand),

    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage project membership
    #[command(subcommand)]
    Member(MemberCommand),

    /// Manage issues
    #[command(subcommand)]
    Issue(IssueCommand),

    /// Manage merge requests
    #[command(subcommand)]
    Mr(MrCommand),

    /// Manage milestones
    #[command(subcommand)]
    Milestone(MilestoneCommand),

    /// Add a note to an issue
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  relo note group/app#3 \"Seen again on 2.1\"   Add a note as the default user
  relo note group/app#3 \"LGTM\" --as bob       Add a note as bob"
    )]
    Note {
        /// Issue reference, e.g. group/app#3
        issue: String,

        /// Note text
        #[arg(value_parser = non_empty_string)]
        body: String,

        /// Act as this user instead of the configured one
        #[arg(long = "as", value_name = "USER")]
        as_user: Option<String>,
    },

    /// Show an issue with its notes
    #[command(arg_required_else_help = true)]
    Show {
        /// Issue reference, e.g. group/app#3
        issue: String,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Move an issue to another project
    #[command(
        name = "move",
        arg_required_else_help = true,
        after_help = "\
Examples:
  relo move group/app#3 --to group/web                Move as the default user
  relo move group/app#3 --to group/web --as bob       Move as bob
  relo move group/app#3 --to group/web --title New    Rename while moving"
    )]
    Move {
        /// Issue reference, e.g. group/app#3
        issue: String,

        /// Destination project path
        #[arg(long)]
        to: String,

        /// Act as this user instead of the configured one
        #[arg(long = "as", value_name = "USER")]
        as_user: Option<String>,

        /// Title for the new issue
        #[arg(long)]
        title: Option<String>,

        /// Assignee for the new issue
        #[arg(long, short)]
        assignee: Option<String>,
    },
}

/// User management commands.
#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a user
    #[command(arg_required_else_help = true)]
    Add {
        /// Username (a single word)
        name: String,
    },
}

/// Project management commands.
#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Create a project
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  relo project add group/app            Create a private project
  relo project add group/docs --public  Create a project anyone can read"
    )]
    Add {
        /// Full path, e.g. group/app
        path: String,

        /// Make the project readable by everyone
        #[arg(long)]
        public: bool,
    },

    /// List a project's issues
    #[command(arg_required_else_help = true)]
    Issues {
        /// Full path, e.g. group/app
        path: String,
    },
}

/// Membership commands.
#[derive(Subcommand)]
pub enum MemberCommand {
    /// Grant a user access to a project
    #[command(
        arg_required_else_help = true,
        after_help = "\
Access levels: guest, reporter, developer, maintainer, owner.
Moving issues needs reporter access in both projects."
    )]
    Add {
        /// Project path
        project: String,

        /// Username
        user: String,

        /// Access level
        #[arg(default_value = "developer")]
        level: String,
    },
}

/// Issue commands.
#[derive(Subcommand)]
pub enum IssueCommand {
    /// Create an issue
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  relo issue new group/app \"Fix crash\"                 Create an issue
  relo issue new group/app \"Crash\" -d \"see #2\"         With a description
  relo issue new group/app \"Crash\" -l bug -m 1         With label and milestone %1"
    )]
    New {
        /// Project path
        project: String,

        /// Issue title
        #[arg(value_parser = non_empty_string)]
        title: String,

        /// Description (may contain references like #5, !3 or %2)
        #[arg(long, short)]
        description: Option<String>,

        /// Add label(s) (comma-separated or repeated)
        #[arg(long, short)]
        label: Vec<String>,

        /// Milestone number within the project
        #[arg(long, short)]
        milestone: Option<i64>,

        /// Assign the issue to someone
        #[arg(long, short)]
        assignee: Option<String>,

        /// Act as this user instead of the configured one
        #[arg(long = "as", value_name = "USER")]
        as_user: Option<String>,
    },
}

/// Merge request commands.
#[derive(Subcommand)]
pub enum MrCommand {
    /// Create a merge request
    #[command(arg_required_else_help = true)]
    New {
        /// Project path
        project: String,

        /// Merge request title
        #[arg(value_parser = non_empty_string)]
        title: String,
    },
}

/// Milestone commands.
#[derive(Subcommand)]
pub enum MilestoneCommand {
    /// Create a milestone
    #[command(arg_required_else_help = true)]
    New {
        /// Project path
        project: String,

        /// Milestone title
        #[arg(value_parser = non_empty_string)]
        title: String,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
