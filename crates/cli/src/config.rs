// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker configuration management.
//!
//! Configuration is stored in `.relo/config.toml` and includes:
//! - `user`: The default acting user for commands that take `--as`
//! - `workspace`: Optional path to store the database in a different location
//! - `[relocation]`: How `relo move` writes its changes

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use relo_core::DEFAULT_BATCH_SIZE;

use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".relo";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "issues.db";

/// Tracker configuration stored in `.relo/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default acting username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Optional path for the database (relative to the tracker root or absolute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    #[serde(default)]
    pub relocation: RelocationConfig,
}

/// Settings for `relo move`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelocationConfig {
    /// Run the whole move in one transaction, so a failure part-way leaves
    /// nothing behind.
    #[serde(default)]
    pub atomic: bool,
    /// Notes copied per page.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for RelocationConfig {
    fn default() -> Self {
        RelocationConfig {
            atomic: false,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Config {
    /// Loads configuration from the given `.relo/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if config.relocation.batch_size == 0 {
            return Err(Error::Config(
                "relocation.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Saves configuration to the given `.relo/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .relo directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Get the database path from config
pub fn get_db_path(work_dir: &Path, config: &Config) -> PathBuf {
    match &config.workspace {
        Some(workspace) => {
            let workspace_path = Path::new(workspace);
            if workspace_path.is_absolute() {
                workspace_path.join(DB_FILE_NAME)
            } else {
                // Relative to work_dir's parent (the tracker root)
                work_dir
                    .parent()
                    .unwrap_or(work_dir)
                    .join(workspace)
                    .join(DB_FILE_NAME)
            }
        }
        None => work_dir.join(DB_FILE_NAME),
    }
}

/// Initialize a new .relo directory at the given path
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
