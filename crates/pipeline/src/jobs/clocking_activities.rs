// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `ss_daily_activity.da_clocking` → `clocking_activities`.
//!
//! Each source daily activity expands into its JSON clocking entries.
//! Before any child is written the parent must exist in the target
//! (synthesized from the same source row when missing) and every
//! category id must be one the target knows.
//!
//! Children are reconciled per parent by position: stored rows in
//! `activity_id` order are updated in place, extra entries are inserted
//! and surplus rows are deleted. A parent whose list is empty gets one
//! fallback row built from its own columns, and only when it has no
//! children at all.

use std::collections::HashSet;

use clocking_domain::{ClockingEntry, DataIssue, Interval, Parsed, parse_clocking_entries};
use clocking_persistence::{
    ClockingActivityRecord, DailyActivityRecord, SourceDailyActivity, StoredClocking,
};
use tracing::{debug, info, warn};

use super::JobContext;
use super::daily_activities::{daily_activity_record, resolve_owner};
use crate::error::PipelineError;
use crate::resolver::CategoryGuard;
use crate::watermark::{Checkpoint, Selection};

/// Target state preloaded once per run and kept current as rows are written.
struct KnownRows {
    parents: HashSet<i64>,
    parents_with_children: HashSet<i64>,
    categories: CategoryGuard,
}

pub fn migrate(ctx: &mut JobContext<'_>, selection: Selection) -> Result<Checkpoint, PipelineError> {
    let mut known: KnownRows = KnownRows {
        parents: ctx.target.list_daily_activity_ids()?.into_iter().collect(),
        parents_with_children: ctx
            .target
            .list_parents_with_clockings()?
            .into_iter()
            .collect(),
        categories: CategoryGuard::load(ctx.target, ctx.default_category_id)?,
    };
    known
        .categories
        .ensure_default(ctx.target, ctx.dry_run, &mut ctx.stats)?;

    let rows: Vec<SourceDailyActivity> = ctx
        .source
        .fetch_daily_activities(selection.cutoff(), ctx.limit)?;
    let mut checkpoint: Checkpoint = Checkpoint::default();

    for row in rows {
        ctx.stats.processed += 1;
        checkpoint.observe(row.changed_at(), Some(row.da_id));

        let parsed: Parsed<ClockingEntry> = parse_clocking_entries(row.da_clocking.as_deref());
        if let Parsed::Invalid(reason) = &parsed {
            warn!(daily_activity_id = row.da_id, %reason, "Unreadable da_clocking payload");
            ctx.stats.note(DataIssue::InvalidPayload);
        }
        ctx.stats
            .note_many(DataIssue::MalformedEntry, parsed.rejected() as u64);
        let entries: Vec<ClockingEntry> = parsed.into_items();

        ensure_parent(ctx, &mut known, &row)?;

        if entries.is_empty() {
            write_fallback(ctx, &mut known, &row)?;
        } else {
            let records: Vec<ClockingActivityRecord> = entries
                .iter()
                .map(|entry| entry_record(row.da_id, entry, &known.categories, ctx))
                .collect();
            reconcile(ctx, &mut known, row.da_id, &records)?;
        }
    }

    Ok(checkpoint)
}

/// Inserts the parent daily activity from `row` if the target lacks it.
fn ensure_parent(
    ctx: &mut JobContext<'_>,
    known: &mut KnownRows,
    row: &SourceDailyActivity,
) -> Result<(), PipelineError> {
    if known.parents.contains(&row.da_id) {
        return Ok(());
    }

    let user_id: Option<i64> = resolve_owner(ctx, row)?;
    let parent: DailyActivityRecord = daily_activity_record(row, user_id);
    if !ctx.dry_run {
        ctx.target.insert_daily_activity(&parent)?;
    }
    known.parents.insert(row.da_id);
    ctx.stats.dependencies_created += 1;
    info!(daily_activity_id = row.da_id, "Created missing parent daily activity");
    Ok(())
}

/// Maps one JSON entry, guarding its category and rejecting negative durations.
///
/// Missing or negative durations become `0` and task `0` becomes no task,
/// matching what the backfill pass stores.
fn entry_record(
    daily_activity_id: i64,
    entry: &ClockingEntry,
    categories: &CategoryGuard,
    ctx: &mut JobContext<'_>,
) -> ClockingActivityRecord {
    let interval: Interval = entry.interval();
    let duration_minutes: i64 = match entry.duration_minutes() {
        Some(minutes) if minutes < 0 => {
            debug!(daily_activity_id, minutes, "Negative clocking duration zeroed");
            ctx.stats.note(DataIssue::NegativeDuration);
            0
        }
        other => other.unwrap_or(0),
    };
    let candidate: i64 = entry.candidate_category_id(categories.default_id());

    ClockingActivityRecord {
        daily_activity_id,
        task_id: entry.resolved_task_id(),
        activity_description: entry.activity.clone(),
        duration_minutes: Some(duration_minutes),
        start_date: interval.start_date,
        start_time: interval.start_time,
        end_date: interval.end_date,
        end_time: interval.end_time,
        category_id: categories.check(candidate, &mut ctx.stats),
    }
}

/// The single child synthesized for a parent with no clocking entries.
///
/// Duration prefers the parent's own positive `da_duration`, then its
/// start/end span, then zero.
fn fallback_record(row: &SourceDailyActivity, category_id: i64) -> ClockingActivityRecord {
    let interval: Interval = Interval::from_timestamps(row.da_start_tm, row.da_end_tm);
    let duration_minutes: i64 = row
        .da_duration
        .map(i64::from)
        .filter(|minutes| *minutes > 0)
        .or_else(|| interval.minutes().filter(|minutes| *minutes >= 0))
        .unwrap_or(0);

    ClockingActivityRecord {
        daily_activity_id: row.da_id,
        task_id: None,
        activity_description: row.da_activity.clone(),
        duration_minutes: Some(duration_minutes),
        start_date: interval.start_date,
        start_time: interval.start_time,
        end_date: interval.end_date,
        end_time: interval.end_time,
        category_id,
    }
}

fn write_fallback(
    ctx: &mut JobContext<'_>,
    known: &mut KnownRows,
    row: &SourceDailyActivity,
) -> Result<(), PipelineError> {
    if known.parents_with_children.contains(&row.da_id) {
        ctx.stats.unchanged += 1;
        return Ok(());
    }

    let category_id: i64 = known
        .categories
        .check(known.categories.default_id(), &mut ctx.stats);
    let record: ClockingActivityRecord = fallback_record(row, category_id);
    if !ctx.dry_run {
        ctx.target.insert_clocking(&record)?;
    }
    known.parents_with_children.insert(row.da_id);
    ctx.stats.inserted += 1;
    debug!(daily_activity_id = row.da_id, "Fallback clocking row written");
    Ok(())
}

/// Converges the stored children of one parent to `records`.
fn reconcile(
    ctx: &mut JobContext<'_>,
    known: &mut KnownRows,
    daily_activity_id: i64,
    records: &[ClockingActivityRecord],
) -> Result<(), PipelineError> {
    let stored: Vec<StoredClocking> = if known.parents_with_children.contains(&daily_activity_id) {
        ctx.target.list_clockings_for_parent(daily_activity_id)?
    } else {
        Vec::new()
    };

    for (position, record) in records.iter().enumerate() {
        match stored.get(position) {
            Some((_, current)) if current == record => ctx.stats.unchanged += 1,
            Some((activity_id, _)) => {
                if !ctx.dry_run {
                    ctx.target.update_clocking(*activity_id, record)?;
                }
                ctx.stats.updated += 1;
            }
            None => {
                if !ctx.dry_run {
                    ctx.target.insert_clocking(record)?;
                }
                ctx.stats.inserted += 1;
            }
        }
    }

    let surplus: Vec<i64> = stored
        .iter()
        .skip(records.len())
        .map(|(activity_id, _)| *activity_id)
        .collect();
    if !surplus.is_empty() {
        if !ctx.dry_run {
            ctx.target.delete_clockings(&surplus)?;
        }
        ctx.stats.deleted += surplus.len() as u64;
        debug!(daily_activity_id, removed = surplus.len(), "Surplus clocking rows removed");
    }

    known.parents_with_children.insert(daily_activity_id);
    Ok(())
}
