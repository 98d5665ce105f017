// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod backend_validation_tests;
mod initialization_tests;
mod watermark_tests;

use time::macros::{date, datetime, time};

use crate::{
    CategoryRecord, ClockingActivityRecord, DailyActivityRecord, ProjectRecord, TargetStore,
    UserRecord,
};

pub fn create_test_user(user_id: i64, email: &str) -> UserRecord {
    UserRecord {
        user_id,
        full_name: Some(format!("User {user_id}")),
        email: email.to_string(),
        position: None,
        created_at: Some(datetime!(2024-01-01 08:00:00)),
        updated_at: None,
    }
}

pub fn create_test_project(code: &str) -> ProjectRecord {
    ProjectRecord {
        project_code: code.to_string(),
        project_name: Some(format!("Project {code}")),
        customer_name: Some(String::from("ACME")),
        project_manager_id: None,
        created_by: Some(String::from("admin")),
        created_at: Some(datetime!(2024-01-01 08:00:00)),
        last_update: None,
        status: String::from("progress"),
    }
}

pub fn create_test_category(category_id: i64) -> CategoryRecord {
    CategoryRecord {
        category_id,
        category_description: Some(format!("Category {category_id}")),
        is_productive: true,
        is_billable: false,
        is_used: true,
        is_direct: false,
    }
}

pub fn create_test_daily_activity(daily_activity_id: i64) -> DailyActivityRecord {
    DailyActivityRecord {
        daily_activity_id,
        project_code: None,
        activity_date: Some(date!(2024 - 01 - 01)),
        priority: Some(String::from("High")),
        start_time: Some(datetime!(2024-01-01 09:00:00)),
        end_time: Some(datetime!(2024-01-01 17:00:00)),
        created_by: None,
        created_at: Some(datetime!(2024-01-01 18:00:00)),
        updated_at: None,
        activity_type: Some(String::from("WFH")),
        description: None,
        activity_duration_minutes: Some(480),
        user_id: None,
    }
}

pub fn create_test_clocking(daily_activity_id: i64, category_id: i64) -> ClockingActivityRecord {
    ClockingActivityRecord {
        daily_activity_id,
        task_id: None,
        activity_description: None,
        duration_minutes: None,
        start_date: Some(date!(2024 - 01 - 01)),
        start_time: Some(time!(09:00:00)),
        end_date: Some(date!(2024 - 01 - 01)),
        end_time: Some(time!(10:30:00)),
        category_id,
    }
}

/// A target store holding category 1 and daily activity 100.
pub fn create_seeded_target() -> TargetStore {
    let mut store = TargetStore::new_in_memory().expect("in-memory target");
    store
        .insert_category(&create_test_category(1))
        .expect("seed category");
    store
        .insert_daily_activity(&create_test_daily_activity(100))
        .expect("seed daily activity");
    store
}
