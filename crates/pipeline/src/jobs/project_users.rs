// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `ss_project_management.pr_members` → `project_users`.
//!
//! Members are stored as a JSON object keyed by the legacy `id_key`. Each
//! member is resolved to a target user, creating a placeholder user when
//! nothing matches, and the `(project_code, user_id)` pair is inserted
//! once. Every readable payload is authoritative for its project: stored
//! pairs whose user no longer resolves from it are deleted.

use std::collections::BTreeSet;

use clocking_domain::{DataIssue, Parsed, ProjectMember, normalize_position, parse_members};
use clocking_persistence::{ProjectUserRecord, SourceProject};
use tracing::{debug, info, warn};

use super::JobContext;
use crate::error::PipelineError;
use crate::watermark::{Checkpoint, Selection};

pub fn migrate(ctx: &mut JobContext<'_>, selection: Selection) -> Result<Checkpoint, PipelineError> {
    let rows: Vec<SourceProject> = ctx.source.fetch_projects(selection.cutoff(), ctx.limit)?;
    let mut checkpoint: Checkpoint = Checkpoint::default();

    for row in rows {
        ctx.stats.processed += 1;
        checkpoint.observe(row.changed_at(), None);

        let project_code: &str = &row.pr_project_code;
        let parsed: Parsed<ProjectMember> = parse_members(row.pr_members.as_deref());
        if let Parsed::Invalid(reason) = &parsed {
            warn!(project_code, %reason, "Unreadable pr_members payload");
            ctx.stats.note(DataIssue::InvalidPayload);
            continue;
        }
        let rejected: u64 = parsed.rejected() as u64;
        ctx.stats.skipped += rejected;
        ctx.stats.note_many(DataIssue::MalformedEntry, rejected);

        let members: Vec<ProjectMember> = parsed.into_items();
        if !ctx.target.project_exists(project_code)? {
            if !members.is_empty() {
                warn!(project_code, "Project not in target, members skipped");
                ctx.stats.skipped += members.len() as u64;
                ctx.stats
                    .note_many(DataIssue::MissingProject, members.len() as u64);
            }
            continue;
        }

        let resolved: BTreeSet<i64> = add_members(ctx, project_code, &members)?;
        remove_departed(ctx, project_code, &resolved)?;
    }

    Ok(checkpoint)
}

/// Resolves and records each member, returning the user ids the payload names.
fn add_members(
    ctx: &mut JobContext<'_>,
    project_code: &str,
    members: &[ProjectMember],
) -> Result<BTreeSet<i64>, PipelineError> {
    let mut resolved: BTreeSet<i64> = BTreeSet::new();

    for member in members {
        if member.id_key.trim().is_empty() {
            ctx.stats.skipped += 1;
            ctx.stats.note(DataIssue::MissingKey);
            continue;
        }

        let user_id: i64 = ctx.users.resolve_or_create(
            ctx.source,
            ctx.target,
            &member.id_key,
            member.email(),
            member.display_name(),
            normalize_position(member.jabatan.as_deref()),
            &mut ctx.stats,
        )?;

        let first_in_payload: bool = resolved.insert(user_id);
        if !first_in_payload || ctx.target.project_user_exists(project_code, user_id)? {
            ctx.stats.unchanged += 1;
            continue;
        }

        if !ctx.dry_run {
            ctx.target.insert_project_user(&ProjectUserRecord {
                project_code: project_code.to_string(),
                user_id,
            })?;
        }
        ctx.stats.inserted += 1;
        debug!(project_code, user_id, "Project member added");
    }

    Ok(resolved)
}

/// Deletes stored pairs of `project_code` whose user is not in `resolved`.
fn remove_departed(
    ctx: &mut JobContext<'_>,
    project_code: &str,
    resolved: &BTreeSet<i64>,
) -> Result<(), PipelineError> {
    let departed: Vec<i64> = ctx
        .target
        .list_project_member_ids(project_code)?
        .into_iter()
        .filter(|user_id| !resolved.contains(user_id))
        .collect();
    if departed.is_empty() {
        return Ok(());
    }

    let removed: usize = if ctx.dry_run {
        departed.len()
    } else {
        ctx.target.delete_project_users(project_code, &departed)?
    };
    ctx.stats.deleted += removed as u64;
    info!(project_code, ?departed, "Project members removed");
    Ok(())
}
