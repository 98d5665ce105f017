// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `ss_user` → `users`.
//!
//! Legacy users keep their numeric id. A placeholder user synthesized by an
//! earlier run may already hold that id; it is moved to a fresh id, taking
//! its memberships and daily activities along, before the legacy row is
//! written.

use clocking_domain::{DataIssue, is_placeholder_email, normalize_position, placeholder_email};
use clocking_persistence::{SourceUser, UserRecord};
use tracing::{debug, info, warn};

use super::{JobContext, non_blank, upsert};
use crate::error::PipelineError;
use crate::watermark::{Checkpoint, Selection};

pub fn migrate(ctx: &mut JobContext<'_>, selection: Selection) -> Result<Checkpoint, PipelineError> {
    let rows: Vec<SourceUser> = ctx.source.fetch_users(selection.cutoff(), ctx.limit)?;
    let mut checkpoint: Checkpoint = Checkpoint::default();

    for row in rows {
        ctx.stats.processed += 1;
        checkpoint.observe(row.changed_at(), Some(row.id));

        let record: UserRecord = user_record(&row);
        if let Some(owner) = ctx.users.email_owner(ctx.target, &record.email)?
            && owner != record.user_id
        {
            warn!(
                user_id = record.user_id,
                email = %record.email,
                owner,
                "Email already belongs to another user, row skipped"
            );
            ctx.stats.skipped += 1;
            ctx.stats.note(DataIssue::EmailConflict);
            continue;
        }

        if let Some(stored) = ctx.target.find_user(record.user_id)?
            && held_by_other_placeholder(&stored, &row, &record)
        {
            relocate_placeholder(ctx, &stored)?;
        }

        let outcome = upsert(ctx.target, &record, ctx.dry_run, &mut ctx.stats)?;
        debug!(user_id = record.user_id, ?outcome, "User migrated");
        ctx.users.claim_email(&record.email, record.user_id);
    }

    Ok(checkpoint)
}

/// Whether `stored` is a placeholder synthesized for someone other than `row`.
fn held_by_other_placeholder(stored: &UserRecord, row: &SourceUser, record: &UserRecord) -> bool {
    is_placeholder_email(&stored.email)
        && stored.email != record.email
        && stored.email != own_placeholder(row)
}

/// Moves a placeholder user off the id a legacy user needs.
///
/// The copy keeps the placeholder email, so later runs still resolve the
/// same key to it.
fn relocate_placeholder(
    ctx: &mut JobContext<'_>,
    stored: &UserRecord,
) -> Result<(), PipelineError> {
    let from: i64 = stored.user_id;
    let to: i64 = ctx.users.allocate_user_id(ctx.source, ctx.target)?;
    if !ctx.dry_run {
        // users.email is unique: park the old row on a scratch address first.
        ctx.target.update_user(&UserRecord {
            email: placeholder_email(&format!("relocated-{from}")),
            ..stored.clone()
        })?;
        ctx.target.insert_user(&UserRecord {
            user_id: to,
            ..stored.clone()
        })?;
        ctx.target.reassign_user(from, to)?;
    }
    ctx.users.claim_email(&stored.email, to);
    ctx.stats.dependencies_created += 1;
    ctx.stats.note(DataIssue::PlaceholderRelocated);
    info!(from, to, email = %stored.email, "Placeholder user moved off a legacy id");
    Ok(())
}

/// The placeholder email a legacy user without an email is stored under.
fn own_placeholder(row: &SourceUser) -> String {
    let key: String =
        non_blank(row.id_key.as_deref()).map_or_else(|| row.id.to_string(), str::to_string);
    placeholder_email(&key)
}

/// Maps a legacy user, synthesizing a placeholder email when it has none.
fn user_record(row: &SourceUser) -> UserRecord {
    let email: String =
        non_blank(row.email.as_deref()).map_or_else(|| own_placeholder(row), str::to_string);

    UserRecord {
        user_id: row.id,
        full_name: row.name.clone(),
        email,
        position: normalize_position(row.jabatan.as_deref()),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
