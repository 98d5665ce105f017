// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod clocking_tests;
mod project_users_tests;
mod projects_tests;

use clocking_domain::{JobStats, RunOptions};
use clocking_persistence::testing::{
    CategorySeed, DailyActivitySeed, ProjectSeed, SourceFixture, UserSeed,
};
use clocking_persistence::{SourceStore, TargetStore};
use time::{Date, Month, PrimitiveDateTime, Time};
use time::macros::{date, datetime};

use crate::{Job, PipelineConfig, RunReport, run_all, run_job};

/// A legacy source and an empty target, both in memory.
pub struct Harness {
    pub fixture: SourceFixture,
    pub source: SourceStore,
    pub target: TargetStore,
    pub config: PipelineConfig,
}

impl Harness {
    pub fn new() -> Self {
        let fixture = SourceFixture::new().expect("source fixture");
        let source = fixture.open_store().expect("source store");
        let target = TargetStore::new_in_memory().expect("target store");
        Self {
            fixture,
            source,
            target,
            config: PipelineConfig::default(),
        }
    }

    pub fn run(&mut self, job: Job, options: &RunOptions) -> JobStats {
        run_job(job, &mut self.source, &mut self.target, &self.config, options)
            .unwrap_or_else(|e| panic!("job {job} failed: {e}"))
    }

    pub fn run_full(&mut self, job: Job) -> JobStats {
        self.run(job, &RunOptions::full())
    }

    pub fn run_all(&mut self, options: &RunOptions) -> RunReport {
        run_all(&mut self.source, &mut self.target, &self.config, options).expect("pipeline run")
    }
}

pub fn jan(day: u8, hour: u8) -> PrimitiveDateTime {
    PrimitiveDateTime::new(
        Date::from_calendar_date(2024, Month::January, day).unwrap(),
        Time::from_hms(hour, 0, 0).unwrap(),
    )
}

pub fn legacy_user(id: i64, id_key: &str, email: Option<&str>) -> UserSeed {
    UserSeed {
        id,
        id_key: Some(id_key.to_string()),
        name: Some(format!("User {id}")),
        email: email.map(str::to_string),
        jabatan: None,
        created_at: Some(datetime!(2024-01-01 08:00:00)),
        updated_at: None,
    }
}

pub fn legacy_project(code: &str, status: Option<&str>, members: Option<&str>) -> ProjectSeed {
    ProjectSeed {
        pr_project_code: code.to_string(),
        pr_project_name: Some(format!("Project {code}")),
        pr_customer_name: Some(String::from("ACME")),
        pr_pic_project: None,
        pr_created_by: Some(String::from("admin")),
        pr_created_date: Some(datetime!(2024-01-01 08:00:00)),
        pr_last_update: None,
        pr_status: status.map(str::to_string),
        pr_members: members.map(str::to_string),
    }
}

pub fn legacy_category(cc_id: i64) -> CategorySeed {
    CategorySeed {
        cc_id,
        cc_definition: Some(format!("Category {cc_id}")),
        cc_productive: Some(1),
        cc_billable: None,
        cc_used: Some(1),
        cc_direct: Some(0),
    }
}

pub fn legacy_daily_activity(da_id: i64, clocking: Option<&str>) -> DailyActivitySeed {
    DailyActivitySeed {
        da_id,
        da_project_code: Some(String::from("P1")),
        da_date: Some(date!(2024 - 01 - 01)),
        da_priority: Some(String::from("H")),
        da_start_tm: Some(datetime!(2024-01-01 09:00:00)),
        da_end_tm: Some(datetime!(2024-01-01 17:00:00)),
        da_created_by: Some(String::from("ana")),
        da_created_date: Some(datetime!(2024-01-01 18:00:00)),
        da_updated_date: None,
        da_activity: Some(String::from("WFH")),
        da_keterangan: Some(String::from("Daily work")),
        da_duration: Some(480),
        da_data: Some(String::from(r#"{"id_key": "k-ana"}"#)),
        da_clocking: clocking.map(str::to_string),
    }
}

/// Two users, one project with members, categories 1 and 7, and two daily
/// activities: one with clocking entries and one without.
pub fn seed_scenario(fixture: &mut SourceFixture) {
    fixture
        .insert_user(&legacy_user(1, "k-ana", Some("ana@example.com")))
        .unwrap();
    let mut budi = legacy_user(2, "k-budi", None);
    budi.created_at = Some(jan(2, 8));
    fixture.insert_user(&budi).unwrap();

    fixture
        .insert_project(&legacy_project(
            "P1",
            Some("p"),
            Some(r#"{"k-ana": {"email": "ana@example.com"}, "k-budi": {"nickname": "Budi"}}"#),
        ))
        .unwrap();

    fixture.insert_category(&legacy_category(1)).unwrap();
    fixture.insert_category(&legacy_category(7)).unwrap();

    fixture
        .insert_daily_activity(&legacy_daily_activity(
            100,
            Some(
                r#"[
                    {"activity": "WFH", "start_date": "2024-01-01", "start_time": "09:00:00",
                     "end_date": "2024-01-01", "end_time": "10:30:00"},
                    {"activity": "onsite", "duration": 60}
                ]"#,
            ),
        ))
        .unwrap();
    let mut empty = legacy_daily_activity(101, None);
    empty.da_created_date = Some(jan(2, 18));
    empty.da_duration = Some(30);
    fixture.insert_daily_activity(&empty).unwrap();
}
