// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Writes for users, projects, membership pairs and categories.
//!
//! Every update replaces the whole row from the record, so a rerun over
//! the same source slice converges instead of drifting.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::{CategoryRecord, ProjectRecord, ProjectUserRecord, UserRecord};
use crate::diesel_schema::{category_clocking, daily_activities, project_users, projects, users};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a user.
///
/// # Errors
///
/// Returns an error if the insert fails (including a duplicate email).
pub fn insert_user(conn: &mut _, record: &UserRecord) -> Result<(), PersistenceError> {
    debug!(user_id = record.user_id, "Inserting user");
    diesel::insert_into(users::table)
        .values(record)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Replaces every column of an existing user.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_user(conn: &mut _, record: &UserRecord) -> Result<(), PersistenceError> {
    debug!(user_id = record.user_id, "Updating user");
    diesel::update(users::table.find(record.user_id))
        .set(record)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Inserts a project.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_project(conn: &mut _, record: &ProjectRecord) -> Result<(), PersistenceError> {
    debug!(project_code = %record.project_code, "Inserting project");
    diesel::insert_into(projects::table)
        .values(record)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Replaces every column of an existing project.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_project(conn: &mut _, record: &ProjectRecord) -> Result<(), PersistenceError> {
    debug!(project_code = %record.project_code, "Updating project");
    diesel::update(projects::table.find(&record.project_code))
        .set(record)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Records a `(project_code, user_id)` membership pair.
///
/// # Errors
///
/// Returns an error if the insert fails (including a duplicate pair).
pub fn insert_project_user(
    conn: &mut _,
    record: &ProjectUserRecord,
) -> Result<(), PersistenceError> {
    debug!(
        project_code = %record.project_code,
        user_id = record.user_id,
        "Inserting project member"
    );
    diesel::insert_into(project_users::table)
        .values(record)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Removes the given members from one project and returns how many pairs went.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_project_users(
    conn: &mut _,
    project_code: &str,
    user_ids: &[i64],
) -> Result<usize, PersistenceError> {
    if user_ids.is_empty() {
        return Ok(0);
    }
    debug!(project_code, ?user_ids, "Deleting stale project members");
    Ok(diesel::delete(
        project_users::table
            .filter(project_users::project_code.eq(project_code))
            .filter(project_users::user_id.eq_any(user_ids)),
    )
    .execute(conn)?)
}
}

backend_fn! {
/// Points every membership pair and daily activity owned by `from` at `to`.
///
/// Returns the number of rows repointed. `to` must already exist.
///
/// # Errors
///
/// Returns an error if either update fails.
pub fn reassign_user(conn: &mut _, from: i64, to: i64) -> Result<usize, PersistenceError> {
    debug!(from, to, "Reassigning user references");
    let members: usize =
        diesel::update(project_users::table.filter(project_users::user_id.eq(from)))
            .set(project_users::user_id.eq(to))
            .execute(conn)?;
    let activities: usize =
        diesel::update(daily_activities::table.filter(daily_activities::user_id.eq(from)))
            .set(daily_activities::user_id.eq(to))
            .execute(conn)?;
    Ok(members + activities)
}
}

backend_fn! {
/// Inserts a category.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_category(conn: &mut _, record: &CategoryRecord) -> Result<(), PersistenceError> {
    debug!(category_id = record.category_id, "Inserting category");
    diesel::insert_into(category_clocking::table)
        .values(record)
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Replaces every column of an existing category.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_category(conn: &mut _, record: &CategoryRecord) -> Result<(), PersistenceError> {
    debug!(category_id = record.category_id, "Updating category");
    diesel::update(category_clocking::table.find(record.category_id))
        .set(record)
        .execute(conn)?;
    Ok(())
}
}
