// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic read queries.
//!
//! - `source`: delta slices of the legacy `ss_*` tables
//! - `target`: lookups against the reporting schema
//! - `watermark`: `migration_state` reads

pub mod source;
pub mod target;
pub mod watermark;

pub use source::{
    fetch_categories_mysql, fetch_categories_sqlite, fetch_daily_activities_mysql,
    fetch_daily_activities_sqlite, fetch_projects_mysql, fetch_projects_sqlite,
    fetch_users_mysql, fetch_users_sqlite, find_legacy_user_id_mysql, find_legacy_user_id_sqlite,
    max_legacy_user_id_mysql, max_legacy_user_id_sqlite,
};
pub use target::{
    count_tables_mysql, count_tables_sqlite, find_category_mysql, find_category_sqlite,
    find_daily_activity_mysql, find_daily_activity_sqlite, find_project_mysql,
    find_project_sqlite, find_user_id_by_email_mysql, find_user_id_by_email_sqlite,
    find_user_mysql, find_user_sqlite, inspect_clocking_health_mysql,
    inspect_clocking_health_sqlite, list_categories_mysql, list_categories_sqlite,
    list_category_ids_mysql, list_category_ids_sqlite, list_clockings_for_parent_mysql,
    list_clockings_for_parent_sqlite, list_clockings_mysql, list_clockings_sqlite,
    list_daily_activities_mysql, list_daily_activities_sqlite, list_daily_activity_ids_mysql,
    list_daily_activity_ids_sqlite, list_parents_with_clockings_mysql,
    list_parents_with_clockings_sqlite, list_project_member_ids_mysql,
    list_project_member_ids_sqlite, list_project_users_mysql, list_project_users_sqlite,
    list_projects_mysql, list_projects_sqlite, list_users_mysql, list_users_sqlite,
    max_user_id_mysql, max_user_id_sqlite, project_user_exists_mysql,
    project_user_exists_sqlite,
};
pub use watermark::{
    get_watermark_mysql, get_watermark_sqlite, list_watermarks_mysql, list_watermarks_sqlite,
};
