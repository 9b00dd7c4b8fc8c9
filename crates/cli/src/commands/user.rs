// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use relo_core::{Database, Principal};

use super::open_db;
use crate::error::Result;

pub fn add(name: &str) -> Result<()> {
    let (db, _config, _work_dir) = open_db()?;
    let user = add_impl(&db, name)?;
    println!("Created user {}", user.username);
    Ok(())
}

pub(crate) fn add_impl(db: &Database, name: &str) -> Result<Principal> {
    Ok(db.create_user(name)?)
}
