// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use relo_core::Database;

use crate::config::{get_db_path, init_work_dir, Config};
use crate::error::Result;

pub fn run(path: Option<String>, user: Option<String>, workspace: Option<String>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let work_dir = run_impl(&target_path, user.as_deref(), workspace)?;

    println!("Initialized issue tracker at {}", work_dir.display());
    if let Some(name) = user {
        println!("Acting as: {}", name);
    }
    Ok(())
}

/// Creates `.relo/` under `target_path` and the database it points at.
pub(crate) fn run_impl(
    target_path: &Path,
    user: Option<&str>,
    workspace: Option<String>,
) -> Result<PathBuf> {
    let config = Config {
        user: user.map(str::to_string),
        workspace,
        ..Config::default()
    };
    let work_dir = init_work_dir(target_path, &config)?;

    let db = Database::open(&get_db_path(&work_dir, &config))?;
    if let Some(name) = user {
        if db.find_user_by_name(name)?.is_none() {
            db.create_user(name)?;
        }
    }

    Ok(work_dir)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
