// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rewriting references so text keeps its meaning in another project.

use std::collections::HashMap;

use crate::error::Result;
use crate::project::{Principal, Project};
use crate::reference::{
    full_form, replace_literal, Mentionable, Reference, ReferenceKind, ReferenceSet,
};
use crate::store::{Authorizer, ProjectStore, ReferenceLookup};

/// Re-renders every resolvable reference in a body of text in full form.
///
/// `context` is the project the text was written in; short-form references
/// resolve against it. Full form is self-qualifying, so the output reads the
/// same from whichever project displays it.
pub struct ReferenceRewriter<'a, S, A> {
    store: &'a S,
    authorizer: &'a A,
    principal: &'a Principal,
    context: &'a Project,
}

impl<'a, S, A> ReferenceRewriter<'a, S, A>
where
    S: ProjectStore + ReferenceLookup,
    A: Authorizer,
{
    pub fn new(
        store: &'a S,
        authorizer: &'a A,
        principal: &'a Principal,
        context: &'a Project,
    ) -> Self {
        ReferenceRewriter {
            store,
            authorizer,
            principal,
            context,
        }
    }

    /// Returns `content` with each resolvable reference replaced by its full form.
    ///
    /// References to entities that do not exist, or that the principal cannot
    /// read, are left exactly as written.
    pub fn rewrite(&self, content: Mentionable<'_>) -> Result<String> {
        let text = match content {
            Mentionable::IssueDescription(text) | Mentionable::NoteBody(text) => text,
        };

        let references = ReferenceSet::extract(text);
        if references.is_empty() {
            return Ok(text.to_string());
        }

        let mut projects: HashMap<String, Option<Project>> = HashMap::new();
        let mut rewritten = text.to_string();
        let mut replaced = 0;

        for kind in ReferenceKind::ALL {
            for reference in references.of_kind(kind) {
                let Some(rendered) = self.resolve(reference, &mut projects)? else {
                    tracing::debug!(literal = %reference.literal, "reference left as written");
                    continue;
                };
                if rendered != reference.literal {
                    rewritten = replace_literal(&rewritten, &reference.literal, &rendered);
                    replaced += 1;
                }
            }
        }

        tracing::debug!(
            kind = content.tag(),
            found = references.len(),
            replaced,
            "rewrote references"
        );
        Ok(rewritten)
    }

    /// Full-form rendering of `reference`, if it names a readable entity.
    fn resolve(
        &self,
        reference: &Reference,
        projects: &mut HashMap<String, Option<Project>>,
    ) -> Result<Option<String>> {
        let path = reference
            .project_path
            .as_deref()
            .unwrap_or(&self.context.path);

        let project = if path == self.context.path {
            Some(self.context.clone())
        } else if let Some(cached) = projects.get(path) {
            cached.clone()
        } else {
            let found = self.store.find_project_by_path(path)?;
            projects.insert(path.to_string(), found.clone());
            found
        };

        let Some(project) = project else {
            return Ok(None);
        };
        if !self.authorizer.can_read(self.principal, &project) {
            return Ok(None);
        }

        let exists = match reference.kind {
            ReferenceKind::Issue => self
                .store
                .find_issue_by_iid(project.id, reference.iid)?
                .is_some(),
            ReferenceKind::MergeRequest => self
                .store
                .find_merge_request_by_iid(project.id, reference.iid)?
                .is_some(),
            ReferenceKind::Milestone => self
                .store
                .find_milestone_by_iid(project.id, reference.iid)?
                .is_some(),
        };

        Ok(exists.then(|| full_form(reference.kind, &project.path, reference.iid)))
    }
}

#[cfg(test)]
#[path = "rewrite_tests.rs"]
mod tests;
