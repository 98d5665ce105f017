// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reporting-schema lookups.
//!
//! The migrators use these for existence checks, for preloading id sets,
//! and for comparing stored values against freshly mapped ones.

use diesel::dsl::{exists, max};
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};

use crate::data_models::{
    CategoryRecord, ClockingActivityRecord, ClockingHealth, DailyActivityRecord, ProjectRecord,
    ProjectUserRecord, StoredClocking, TableCounts, UserRecord,
};
use crate::diesel_schema::{
    category_clocking, clocking_activities, daily_activities, project_users, projects, users,
};
use crate::error::PersistenceError;

// ============================================================================
// Users
// ============================================================================

backend_fn! {
/// Retrieves a user by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_user(conn: &mut _, user_id: i64) -> Result<Option<UserRecord>, PersistenceError> {
    Ok(users::table
        .find(user_id)
        .select(UserRecord::as_select())
        .first(conn)
        .optional()?)
}
}

backend_fn! {
/// Retrieves the id of the user owning `email`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_user_id_by_email(
    conn: &mut _,
    email: &str,
) -> Result<Option<i64>, PersistenceError> {
    Ok(users::table
        .filter(users::email.eq(email))
        .select(users::user_id)
        .first::<i64>(conn)
        .optional()?)
}
}

backend_fn! {
/// Highest `user_id` in the table, `None` when it is empty.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn max_user_id(conn: &mut _) -> Result<Option<i64>, PersistenceError> {
    Ok(users::table
        .select(max(users::user_id))
        .first::<Option<i64>>(conn)?)
}
}

backend_fn! {
/// Lists every user ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &mut _) -> Result<Vec<UserRecord>, PersistenceError> {
    Ok(users::table
        .select(UserRecord::as_select())
        .order(users::user_id.asc())
        .load(conn)?)
}
}

// ============================================================================
// Projects and membership
// ============================================================================

backend_fn! {
/// Retrieves a project by code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_project(
    conn: &mut _,
    project_code: &str,
) -> Result<Option<ProjectRecord>, PersistenceError> {
    Ok(projects::table
        .find(project_code)
        .select(ProjectRecord::as_select())
        .first(conn)
        .optional()?)
}
}

backend_fn! {
/// Lists every project ordered by code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_projects(conn: &mut _) -> Result<Vec<ProjectRecord>, PersistenceError> {
    Ok(projects::table
        .select(ProjectRecord::as_select())
        .order(projects::project_code.asc())
        .load(conn)?)
}
}

backend_fn! {
/// Whether the `(project_code, user_id)` pair is already recorded.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn project_user_exists(
    conn: &mut _,
    project_code: &str,
    user_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(exists(
        project_users::table
            .filter(project_users::project_code.eq(project_code))
            .filter(project_users::user_id.eq(user_id)),
    ))
    .get_result::<bool>(conn)?)
}
}

backend_fn! {
/// Lists the user ids recorded as members of one project.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_project_member_ids(
    conn: &mut _,
    project_code: &str,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(project_users::table
        .filter(project_users::project_code.eq(project_code))
        .select(project_users::user_id)
        .order(project_users::user_id.asc())
        .load(conn)?)
}
}

backend_fn! {
/// Lists every membership pair ordered by project then user.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_project_users(conn: &mut _) -> Result<Vec<ProjectUserRecord>, PersistenceError> {
    Ok(project_users::table
        .select(ProjectUserRecord::as_select())
        .order((project_users::project_code.asc(), project_users::user_id.asc()))
        .load(conn)?)
}
}

// ============================================================================
// Categories
// ============================================================================

backend_fn! {
/// Retrieves a category by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_category(
    conn: &mut _,
    category_id: i64,
) -> Result<Option<CategoryRecord>, PersistenceError> {
    Ok(category_clocking::table
        .find(category_id)
        .select(CategoryRecord::as_select())
        .first(conn)
        .optional()?)
}
}

backend_fn! {
/// Every category id currently in the target.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_category_ids(conn: &mut _) -> Result<Vec<i64>, PersistenceError> {
    Ok(category_clocking::table
        .select(category_clocking::category_id)
        .load::<i64>(conn)?)
}
}

backend_fn! {
/// Lists every category ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_categories(conn: &mut _) -> Result<Vec<CategoryRecord>, PersistenceError> {
    Ok(category_clocking::table
        .select(CategoryRecord::as_select())
        .order(category_clocking::category_id.asc())
        .load(conn)?)
}
}

// ============================================================================
// Daily activities
// ============================================================================

backend_fn! {
/// Retrieves a daily activity by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_daily_activity(
    conn: &mut _,
    daily_activity_id: i64,
) -> Result<Option<DailyActivityRecord>, PersistenceError> {
    Ok(daily_activities::table
        .find(daily_activity_id)
        .select(DailyActivityRecord::as_select())
        .first(conn)
        .optional()?)
}
}

backend_fn! {
/// Every daily activity id currently in the target.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_daily_activity_ids(conn: &mut _) -> Result<Vec<i64>, PersistenceError> {
    Ok(daily_activities::table
        .select(daily_activities::daily_activity_id)
        .load::<i64>(conn)?)
}
}

backend_fn! {
/// Lists every daily activity ordered by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_daily_activities(conn: &mut _) -> Result<Vec<DailyActivityRecord>, PersistenceError> {
    Ok(daily_activities::table
        .select(DailyActivityRecord::as_select())
        .order(daily_activities::daily_activity_id.asc())
        .load(conn)?)
}
}

// ============================================================================
// Clocking activities
// ============================================================================

backend_fn! {
/// Distinct parent ids that already have at least one clocking row.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_parents_with_clockings(conn: &mut _) -> Result<Vec<i64>, PersistenceError> {
    Ok(clocking_activities::table
        .select(clocking_activities::daily_activity_id)
        .distinct()
        .load::<i64>(conn)?)
}
}

backend_fn! {
/// The clocking rows of one parent in `activity_id` order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_clockings_for_parent(
    conn: &mut _,
    daily_activity_id: i64,
) -> Result<Vec<StoredClocking>, PersistenceError> {
    Ok(clocking_activities::table
        .filter(clocking_activities::daily_activity_id.eq(daily_activity_id))
        .select((
            clocking_activities::activity_id,
            ClockingActivityRecord::as_select(),
        ))
        .order(clocking_activities::activity_id.asc())
        .load::<StoredClocking>(conn)?)
}
}

backend_fn! {
/// Every clocking row ordered by parent then `activity_id`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_clockings(conn: &mut _) -> Result<Vec<StoredClocking>, PersistenceError> {
    Ok(clocking_activities::table
        .select((
            clocking_activities::activity_id,
            ClockingActivityRecord::as_select(),
        ))
        .order((
            clocking_activities::daily_activity_id.asc(),
            clocking_activities::activity_id.asc(),
        ))
        .load::<StoredClocking>(conn)?)
}
}

backend_fn! {
/// Counts clocking rows still needing normalization.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn inspect_clocking_health(conn: &mut _) -> Result<ClockingHealth, PersistenceError> {
    let zero_task_ids: i64 = clocking_activities::table
        .filter(clocking_activities::task_id.eq(0_i64))
        .count()
        .get_result(conn)?;
    let null_task_ids: i64 = clocking_activities::table
        .filter(clocking_activities::task_id.is_null())
        .count()
        .get_result(conn)?;
    let null_durations: i64 = clocking_activities::table
        .filter(clocking_activities::duration_minutes.is_null())
        .count()
        .get_result(conn)?;

    Ok(ClockingHealth {
        zero_task_ids,
        null_task_ids,
        null_durations,
    })
}
}

backend_fn! {
/// Row counts for every reporting table.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_tables(conn: &mut _) -> Result<TableCounts, PersistenceError> {
    Ok(TableCounts {
        users: users::table.count().get_result(conn)?,
        projects: projects::table.count().get_result(conn)?,
        project_users: project_users::table.count().get_result(conn)?,
        categories: category_clocking::table.count().get_result(conn)?,
        daily_activities: daily_activities::table.count().get_result(conn)?,
        clocking_activities: clocking_activities::table.count().get_result(conn)?,
    })
}
}
