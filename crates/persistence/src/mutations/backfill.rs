// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Portable bulk updates for the backfill pass.
//!
//! Each statement only matches rows that are not yet normalized, so
//! running the pass twice changes nothing the second time. Duration
//! derivation needs date arithmetic and lives in the backend modules.

use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use diesel::{MysqlConnection, SqliteConnection};

use crate::diesel_schema::clocking_activities;
use crate::error::PersistenceError;

backend_fn! {
/// Sets `task_id` on unmapped rows whose description equals `label`,
/// ignoring case. Returns the number of rows updated.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn map_task_label(
    conn: &mut _,
    label: &str,
    task_id: i64,
) -> Result<usize, PersistenceError> {
    // NOTE: raw SQL (justified - Diesel has no portable LOWER() DSL)
    Ok(diesel::sql_query(
        "UPDATE clocking_activities SET task_id = ? \
         WHERE (task_id IS NULL OR task_id = 0) \
         AND LOWER(TRIM(activity_description)) = ?",
    )
    .bind::<BigInt, _>(task_id)
    .bind::<Text, _>(label.to_lowercase())
    .execute(conn)?)
}
}

backend_fn! {
/// Replaces `task_id = 0` with `NULL`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn clear_zero_task_ids(conn: &mut _) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        clocking_activities::table.filter(clocking_activities::task_id.eq(0_i64)),
    )
    .set(clocking_activities::task_id.eq(None::<i64>))
    .execute(conn)?)
}
}

backend_fn! {
/// Replaces a `NULL` duration with `0`.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn default_missing_durations(conn: &mut _) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        clocking_activities::table.filter(clocking_activities::duration_minutes.is_null()),
    )
    .set(clocking_activities::duration_minutes.eq(Some(0_i64)))
    .execute(conn)?)
}
}
