// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes for daily activities and their clocking rows.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{ClockingActivityRecord, DailyActivityRecord};
use crate::diesel_schema::{clocking_activities, daily_activities};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a daily activity.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_daily_activity(
    conn: &mut _,
    record: &DailyActivityRecord,
) -> Result<(), PersistenceError> {
    debug!(daily_activity_id = record.daily_activity_id, "Inserting daily activity");
    diesel::insert_into(daily_activities::table)
        .values(record)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Replaces every column of an existing daily activity.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_daily_activity(
    conn: &mut _,
    record: &DailyActivityRecord,
) -> Result<(), PersistenceError> {
    debug!(daily_activity_id = record.daily_activity_id, "Updating daily activity");
    diesel::update(daily_activities::table.find(record.daily_activity_id))
        .set(record)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Inserts a clocking row. The database assigns `activity_id`.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_clocking(
    conn: &mut _,
    record: &ClockingActivityRecord,
) -> Result<(), PersistenceError> {
    debug!(
        daily_activity_id = record.daily_activity_id,
        category_id = record.category_id,
        "Inserting clocking activity"
    );
    diesel::insert_into(clocking_activities::table)
        .values(record)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Replaces the values of the clocking row `activity_id`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_clocking(
    conn: &mut _,
    activity_id: i64,
    record: &ClockingActivityRecord,
) -> Result<(), PersistenceError> {
    debug!(activity_id, "Updating clocking activity");
    diesel::update(clocking_activities::table.find(activity_id))
        .set(record)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Deletes the given clocking rows and returns how many were removed.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_clockings(conn: &mut _, activity_ids: &[i64]) -> Result<usize, PersistenceError> {
    if activity_ids.is_empty() {
        return Ok(0);
    }
    debug!(?activity_ids, "Deleting surplus clocking activities");
    Ok(diesel::delete(
        clocking_activities::table.filter(clocking_activities::activity_id.eq_any(activity_ids)),
    )
    .execute(conn)?)
}
}
