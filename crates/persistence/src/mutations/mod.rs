// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! All writes to the reporting schema go through here. Mutations use
//! Diesel DSL; the only raw SQL is the label mapping in `backfill`, which
//! needs a case-insensitive comparison Diesel has no portable DSL for.
//!
//! ## Module Organization
//!
//! - `reporting`: users, projects, membership pairs, categories
//! - `activities`: daily activities and their clocking rows
//! - `watermark`: `migration_state` upserts
//! - `backfill`: bulk normalization of `clocking_activities`

pub mod activities;
pub mod backfill;
pub mod reporting;
pub mod watermark;

pub use activities::{
    delete_clockings_mysql, delete_clockings_sqlite, insert_clocking_mysql,
    insert_clocking_sqlite, insert_daily_activity_mysql, insert_daily_activity_sqlite,
    update_clocking_mysql, update_clocking_sqlite, update_daily_activity_mysql,
    update_daily_activity_sqlite,
};
pub use backfill::{
    clear_zero_task_ids_mysql, clear_zero_task_ids_sqlite, default_missing_durations_mysql,
    default_missing_durations_sqlite, map_task_label_mysql, map_task_label_sqlite,
};
pub use reporting::{
    delete_project_users_mysql, delete_project_users_sqlite, insert_category_mysql,
    insert_category_sqlite, insert_project_mysql, insert_project_sqlite,
    insert_project_user_mysql, insert_project_user_sqlite, insert_user_mysql,
    insert_user_sqlite, reassign_user_mysql, reassign_user_sqlite, update_category_mysql,
    update_category_sqlite, update_project_mysql, update_project_sqlite, update_user_mysql,
    update_user_sqlite,
};
pub use watermark::{upsert_watermark_mysql, upsert_watermark_sqlite};
