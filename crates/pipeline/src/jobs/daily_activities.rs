// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `ss_daily_activity` → `daily_activities`.

use clocking_domain::{ActivityData, DataIssue, Parsed, Priority, parse_activity_data};
use clocking_persistence::{DailyActivityRecord, SourceDailyActivity};
use tracing::debug;

use super::{JobContext, upsert};
use crate::error::PipelineError;
use crate::watermark::{Checkpoint, Selection};

pub fn migrate(ctx: &mut JobContext<'_>, selection: Selection) -> Result<Checkpoint, PipelineError> {
    let rows: Vec<SourceDailyActivity> = ctx
        .source
        .fetch_daily_activities(selection.cutoff(), ctx.limit)?;
    let mut checkpoint: Checkpoint = Checkpoint::default();

    for row in rows {
        ctx.stats.processed += 1;
        checkpoint.observe(row.changed_at(), Some(row.da_id));

        let user_id: Option<i64> = resolve_owner(ctx, &row)?;
        let record: DailyActivityRecord = daily_activity_record(&row, user_id);
        let outcome = upsert(ctx.target, &record, ctx.dry_run, &mut ctx.stats)?;
        debug!(daily_activity_id = row.da_id, ?user_id, ?outcome, "Daily activity migrated");
    }

    Ok(checkpoint)
}

/// Resolves the owner named by `da_data.id_key`.
///
/// An absent or unreadable payload leaves the owner unresolved and is
/// counted. A key that matches no user gets a placeholder user.
pub fn resolve_owner(
    ctx: &mut JobContext<'_>,
    row: &SourceDailyActivity,
) -> Result<Option<i64>, PipelineError> {
    let parsed: Parsed<ActivityData> = parse_activity_data(row.da_data.as_deref());
    if let Parsed::Invalid(reason) = &parsed {
        debug!(daily_activity_id = row.da_id, %reason, "Unreadable da_data payload");
        ctx.stats.note(DataIssue::InvalidPayload);
        return Ok(None);
    }

    let id_key: Option<String> = parsed
        .into_items()
        .first()
        .and_then(ActivityData::id_key)
        .map(str::to_string);
    let Some(id_key) = id_key else {
        ctx.stats.note(DataIssue::MissingUserKey);
        return Ok(None);
    };

    let user_id: i64 = ctx.users.resolve_or_create(
        ctx.source,
        ctx.target,
        &id_key,
        None,
        &id_key,
        None,
        &mut ctx.stats,
    )?;
    Ok(Some(user_id))
}

/// Maps the non-JSON columns of a legacy daily activity.
pub fn daily_activity_record(
    row: &SourceDailyActivity,
    user_id: Option<i64>,
) -> DailyActivityRecord {
    DailyActivityRecord {
        daily_activity_id: row.da_id,
        project_code: row.da_project_code.clone(),
        activity_date: row.da_date,
        priority: Priority::from_legacy_code(row.da_priority.as_deref())
            .map(|priority| priority.as_str().to_string()),
        start_time: row.da_start_tm,
        end_time: row.da_end_tm,
        created_by: row.da_created_by.clone(),
        created_at: row.da_created_date,
        updated_at: row.da_updated_date,
        activity_type: row.da_activity.clone(),
        description: row.da_keterangan.clone(),
        activity_duration_minutes: row.da_duration.map(i64::from),
        user_id,
    }
}
