// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delta reads over the legacy schema.
//!
//! Timestamped tables are selected by their change timestamp, the
//! `updated` column falling back to the `created` column, and always
//! ordered by that timestamp then by primary key. The maximum value seen
//! in a slice is therefore a valid watermark even when `limit` truncates
//! it. Rows sharing the watermark timestamp are re-read by the next slice;
//! when more of them exist than `limit`, the surplus is only reached by a
//! larger limit or a full run. `ss_category_clocking` has no timestamps
//! and is selected by key.

use diesel::dsl::{max, sql};
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Timestamp};
use diesel::{MysqlConnection, SqliteConnection};
use time::PrimitiveDateTime;
use tracing::debug;

use crate::data_models::{SourceCategory, SourceDailyActivity, SourceProject, SourceUser};
use crate::error::PersistenceError;
use crate::source_schema::{ss_category_clocking, ss_daily_activity, ss_project_management, ss_user};

// NOTE: COALESCE is raw SQL (justified - Diesel has no portable coalesce DSL)
fn user_changed_at() -> SqlLiteral<Nullable<Timestamp>> {
    sql::<Nullable<Timestamp>>("COALESCE(updated_at, created_at)")
}

fn project_changed_at() -> SqlLiteral<Nullable<Timestamp>> {
    sql::<Nullable<Timestamp>>("COALESCE(pr_last_update, pr_created_date)")
}

fn daily_activity_changed_at() -> SqlLiteral<Nullable<Timestamp>> {
    sql::<Nullable<Timestamp>>("COALESCE(da_updated_date, da_created_date)")
}

backend_fn! {
/// Reads `ss_user` rows changed at or after `cutoff` (all rows when `None`).
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn fetch_users(
    conn: &mut _,
    cutoff: Option<PrimitiveDateTime>,
    limit: Option<i64>,
) -> Result<Vec<SourceUser>, PersistenceError> {
    debug!(?cutoff, ?limit, "Fetching ss_user slice");

    let mut query = ss_user::table.select(SourceUser::as_select()).into_boxed();
    if let Some(cutoff) = cutoff {
        query = query.filter(user_changed_at().ge(cutoff));
    }
    query = query.order((user_changed_at().asc(), ss_user::id.asc()));
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    Ok(query.load(conn)?)
}
}

backend_fn! {
/// Reads `ss_project_management` rows changed at or after `cutoff`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn fetch_projects(
    conn: &mut _,
    cutoff: Option<PrimitiveDateTime>,
    limit: Option<i64>,
) -> Result<Vec<SourceProject>, PersistenceError> {
    debug!(?cutoff, ?limit, "Fetching ss_project_management slice");

    let mut query = ss_project_management::table
        .select(SourceProject::as_select())
        .into_boxed();
    if let Some(cutoff) = cutoff {
        query = query.filter(project_changed_at().ge(cutoff));
    }
    query = query.order((
        project_changed_at().asc(),
        ss_project_management::pr_project_code.asc(),
    ));
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    Ok(query.load(conn)?)
}
}

backend_fn! {
/// Reads `ss_category_clocking` rows with `cc_id` above `after_id`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn fetch_categories(
    conn: &mut _,
    after_id: Option<i64>,
    limit: Option<i64>,
) -> Result<Vec<SourceCategory>, PersistenceError> {
    debug!(?after_id, ?limit, "Fetching ss_category_clocking slice");

    let mut query = ss_category_clocking::table
        .select(SourceCategory::as_select())
        .order(ss_category_clocking::cc_id.asc())
        .into_boxed();
    if let Some(after_id) = after_id {
        query = query.filter(ss_category_clocking::cc_id.gt(after_id));
    }
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    Ok(query.load(conn)?)
}
}

backend_fn! {
/// Reads `ss_daily_activity` rows changed at or after `cutoff`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn fetch_daily_activities(
    conn: &mut _,
    cutoff: Option<PrimitiveDateTime>,
    limit: Option<i64>,
) -> Result<Vec<SourceDailyActivity>, PersistenceError> {
    debug!(?cutoff, ?limit, "Fetching ss_daily_activity slice");

    let mut query = ss_daily_activity::table
        .select(SourceDailyActivity::as_select())
        .into_boxed();
    if let Some(cutoff) = cutoff {
        query = query.filter(daily_activity_changed_at().ge(cutoff));
    }
    query = query.order((
        daily_activity_changed_at().asc(),
        ss_daily_activity::da_id.asc(),
    ));
    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    Ok(query.load(conn)?)
}
}

backend_fn! {
/// Looks up the legacy numeric id for an opaque `id_key`.
///
/// # Errors
///
/// Returns an error if the query fails.
/// Returns `Ok(None)` if no user carries the key.
pub fn find_legacy_user_id(
    conn: &mut _,
    id_key: &str,
) -> Result<Option<i64>, PersistenceError> {
    Ok(ss_user::table
        .filter(ss_user::id_key.eq(id_key))
        .select(ss_user::id)
        .order(ss_user::id.asc())
        .first::<i64>(conn)
        .optional()?)
}
}

backend_fn! {
/// The highest legacy user id, or `None` when `ss_user` is empty.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn max_legacy_user_id(conn: &mut _) -> Result<Option<i64>, PersistenceError> {
    Ok(ss_user::table
        .select(max(ss_user::id))
        .first::<Option<i64>>(conn)?)
}
}
