// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use relo_core::{Database, MergeRequest};

use super::{open_db, resolve_project};
use crate::error::Result;

pub fn new(project: &str, title: &str) -> Result<()> {
    let (db, _config, _work_dir) = open_db()?;
    let mr = new_impl(&db, project, title)?;
    println!("Created {}: {}", mr.to_reference(project), mr.title);
    Ok(())
}

pub(crate) fn new_impl(db: &Database, project: &str, title: &str) -> Result<MergeRequest> {
    let project = resolve_project(db, project)?;
    Ok(db.create_merge_request(project.id, title)?)
}
