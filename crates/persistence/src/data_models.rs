// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types for both schemas.
//!
//! Source rows keep the legacy column names so the mapping code reads
//! against the `ss_*` vocabulary. Target records are complete rows that
//! double as insert values and changesets; `treat_none_as_null` makes an
//! update converge every column to the source value, including `NULL`.

use diesel::prelude::*;
use time::{Date, PrimitiveDateTime, Time};

use crate::diesel_schema::{
    category_clocking, clocking_activities, daily_activities, migration_state, project_users,
    projects, users,
};
use crate::source_schema::{ss_category_clocking, ss_daily_activity, ss_project_management, ss_user};

// ============================================================================
// Source rows
// ============================================================================

/// A row of `ss_user`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = ss_user)]
pub struct SourceUser {
    pub id: i64,
    pub id_key: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub jabatan: Option<String>,
    pub created_at: Option<PrimitiveDateTime>,
    pub updated_at: Option<PrimitiveDateTime>,
}

impl SourceUser {
    /// The change timestamp used for incremental selection.
    #[must_use]
    pub const fn changed_at(&self) -> Option<PrimitiveDateTime> {
        match self.updated_at {
            Some(ts) => Some(ts),
            None => self.created_at,
        }
    }
}

/// A row of `ss_project_management`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = ss_project_management)]
pub struct SourceProject {
    pub pr_project_code: String,
    pub pr_project_name: Option<String>,
    pub pr_customer_name: Option<String>,
    pub pr_pic_project: Option<i64>,
    pub pr_created_by: Option<String>,
    pub pr_created_date: Option<PrimitiveDateTime>,
    pub pr_last_update: Option<PrimitiveDateTime>,
    pub pr_status: Option<String>,
    pub pr_members: Option<String>,
}

impl SourceProject {
    #[must_use]
    pub const fn changed_at(&self) -> Option<PrimitiveDateTime> {
        match self.pr_last_update {
            Some(ts) => Some(ts),
            None => self.pr_created_date,
        }
    }
}

/// A row of `ss_category_clocking`. Flags are legacy `0`/`1` integers.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = ss_category_clocking)]
pub struct SourceCategory {
    pub cc_id: i64,
    pub cc_definition: Option<String>,
    pub cc_productive: Option<i32>,
    pub cc_billable: Option<i32>,
    pub cc_used: Option<i32>,
    pub cc_direct: Option<i32>,
}

/// A row of `ss_daily_activity`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = ss_daily_activity)]
pub struct SourceDailyActivity {
    pub da_id: i64,
    pub da_project_code: Option<String>,
    pub da_date: Option<Date>,
    pub da_priority: Option<String>,
    pub da_start_tm: Option<PrimitiveDateTime>,
    pub da_end_tm: Option<PrimitiveDateTime>,
    pub da_created_by: Option<String>,
    pub da_created_date: Option<PrimitiveDateTime>,
    pub da_updated_date: Option<PrimitiveDateTime>,
    pub da_activity: Option<String>,
    pub da_keterangan: Option<String>,
    pub da_duration: Option<i32>,
    pub da_data: Option<String>,
    pub da_clocking: Option<String>,
}

impl SourceDailyActivity {
    #[must_use]
    pub const fn changed_at(&self) -> Option<PrimitiveDateTime> {
        match self.da_updated_date {
            Some(ts) => Some(ts),
            None => self.da_created_date,
        }
    }
}

// ============================================================================
// Target records
// ============================================================================

/// A complete `users` row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(primary_key(user_id))]
#[diesel(treat_none_as_null = true)]
pub struct UserRecord {
    pub user_id: i64,
    pub full_name: Option<String>,
    pub email: String,
    pub position: Option<i16>,
    pub created_at: Option<PrimitiveDateTime>,
    pub updated_at: Option<PrimitiveDateTime>,
}

/// A complete `projects` row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(primary_key(project_code))]
#[diesel(treat_none_as_null = true)]
pub struct ProjectRecord {
    pub project_code: String,
    pub project_name: Option<String>,
    pub customer_name: Option<String>,
    pub project_manager_id: Option<i64>,
    pub created_by: Option<String>,
    pub created_at: Option<PrimitiveDateTime>,
    pub last_update: Option<PrimitiveDateTime>,
    pub status: String,
}

/// A `project_users` pair.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = project_users)]
pub struct ProjectUserRecord {
    pub project_code: String,
    pub user_id: i64,
}

/// A complete `category_clocking` row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = category_clocking)]
#[diesel(primary_key(category_id))]
#[diesel(treat_none_as_null = true)]
pub struct CategoryRecord {
    pub category_id: i64,
    pub category_description: Option<String>,
    pub is_productive: bool,
    pub is_billable: bool,
    pub is_used: bool,
    pub is_direct: bool,
}

/// A complete `daily_activities` row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = daily_activities)]
#[diesel(primary_key(daily_activity_id))]
#[diesel(treat_none_as_null = true)]
pub struct DailyActivityRecord {
    pub daily_activity_id: i64,
    pub project_code: Option<String>,
    pub activity_date: Option<Date>,
    pub priority: Option<String>,
    pub start_time: Option<PrimitiveDateTime>,
    pub end_time: Option<PrimitiveDateTime>,
    pub created_by: Option<String>,
    pub created_at: Option<PrimitiveDateTime>,
    pub updated_at: Option<PrimitiveDateTime>,
    pub activity_type: Option<String>,
    pub description: Option<String>,
    pub activity_duration_minutes: Option<i64>,
    pub user_id: Option<i64>,
}

/// A `clocking_activities` row without its surrogate `activity_id`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = clocking_activities)]
#[diesel(treat_none_as_null = true)]
pub struct ClockingActivityRecord {
    pub daily_activity_id: i64,
    pub task_id: Option<i64>,
    pub activity_description: Option<String>,
    pub duration_minutes: Option<i64>,
    pub start_date: Option<Date>,
    pub start_time: Option<Time>,
    pub end_date: Option<Date>,
    pub end_time: Option<Time>,
    pub category_id: i64,
}

/// A stored clocking row: its `activity_id` and values.
pub type StoredClocking = (i64, ClockingActivityRecord);

/// A `migration_state` row.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = migration_state)]
pub struct Watermark {
    pub job_name: String,
    pub last_updated_at: Option<PrimitiveDateTime>,
    pub last_id: Option<i64>,
    pub updated_at: Option<PrimitiveDateTime>,
}

/// Row counts for every reporting table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub users: i64,
    pub projects: i64,
    pub project_users: i64,
    pub categories: i64,
    pub daily_activities: i64,
    pub clocking_activities: i64,
}

/// Post-backfill health counters over `clocking_activities`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockingHealth {
    pub zero_task_ids: i64,
    pub null_task_ids: i64,
    pub null_durations: i64,
}
