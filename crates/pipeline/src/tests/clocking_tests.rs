// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clocking_domain::{DataIssue, RunOptions};
use clocking_persistence::ClockingActivityRecord;
use time::macros::{date, time};

use super::{Harness, jan, legacy_category, legacy_daily_activity, legacy_user};
use crate::Job;

/// User `k-ana`, categories 1 and 7, all migrated.
fn prepared() -> Harness {
    let mut h = Harness::new();
    h.fixture
        .insert_user(&legacy_user(1, "k-ana", Some("ana@example.com")))
        .unwrap();
    h.fixture.insert_category(&legacy_category(1)).unwrap();
    h.fixture.insert_category(&legacy_category(7)).unwrap();
    h.run_full(Job::Users);
    h.run_full(Job::Categories);
    h
}

fn children(h: &mut Harness, parent: i64) -> Vec<ClockingActivityRecord> {
    h.target
        .list_clockings_for_parent(parent)
        .unwrap()
        .into_iter()
        .map(|(_, row)| row)
        .collect()
}

#[test]
fn test_duration_is_derived_from_interval() {
    let mut h = prepared();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(
            100,
            Some(
                r#"[{"activity": "Meeting", "start_date": "2024-01-01", "start_time": "09:00:00",
                     "end_date": "2024-01-01", "end_time": "10:30:00"}]"#,
            ),
        ))
        .unwrap();
    h.run_full(Job::DailyActivities);

    h.run_full(Job::ClockingActivities);

    let rows = children(&mut h, 100);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].duration_minutes, Some(90));
    assert_eq!(rows[0].start_date, Some(date!(2024 - 01 - 01)));
    assert_eq!(rows[0].start_time, Some(time!(09:00:00)));
    assert_eq!(rows[0].end_time, Some(time!(10:30:00)));
    assert_eq!(rows[0].task_id, None);
    assert_eq!(rows[0].category_id, 1);
}

#[test]
fn test_task_and_category_are_resolved_and_guarded() {
    let mut h = prepared();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(
            100,
            Some(
                r#"[
                    {"activity": "WFH", "duration": 30},
                    {"activity": "Onsite", "duration": 30},
                    {"activity": "Support", "duration": 30, "category_id": 99},
                    {"activity": "Review", "duration": 30, "task_id": "7", "category_id": 1}
                ]"#,
            ),
        ))
        .unwrap();
    h.run_full(Job::DailyActivities);

    let stats = h.run_full(Job::ClockingActivities);

    assert_eq!(stats.inserted, 4);
    assert_eq!(stats.fixed, 1);
    assert_eq!(stats.issue_count(DataIssue::InvalidCategory), 1);

    let resolved: Vec<(Option<i64>, i64)> = children(&mut h, 100)
        .into_iter()
        .map(|row| (row.task_id, row.category_id))
        .collect();
    assert_eq!(
        resolved,
        vec![(Some(1), 1), (Some(7), 7), (None, 1), (Some(7), 1)]
    );
}

#[test]
fn test_missing_default_category_is_created() {
    let mut h = Harness::new();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(
            100,
            Some(r#"[{"activity": "WFH", "duration": 15}]"#),
        ))
        .unwrap();

    let stats = h.run_full(Job::ClockingActivities);

    // Default category, placeholder owner and parent.
    assert_eq!(stats.dependencies_created, 3);
    let category = h.target.find_category(1).unwrap().unwrap();
    assert_eq!(category.category_description.as_deref(), Some("Uncategorized"));
    assert!(!category.is_productive);
    assert_eq!(children(&mut h, 100)[0].category_id, 1);
}

#[test]
fn test_configured_default_category_is_used() {
    let mut h = prepared();
    h.config.default_category_id = 7;
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(
            100,
            Some(r#"[{"activity": "Support", "duration": 15, "category_id": 42}]"#),
        ))
        .unwrap();
    h.run_full(Job::DailyActivities);

    h.run_full(Job::ClockingActivities);

    assert_eq!(children(&mut h, 100)[0].category_id, 7);
}

#[test]
fn test_empty_list_gets_exactly_one_fallback_row() {
    let mut h = prepared();
    let mut seed = legacy_daily_activity(100, Some("null"));
    seed.da_duration = Some(45);
    h.fixture.insert_daily_activity(&seed).unwrap();
    h.run_full(Job::DailyActivities);

    let first = h.run_full(Job::ClockingActivities);
    let second = h.run_full(Job::ClockingActivities);

    assert_eq!(first.inserted, 1);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.unchanged, 1);

    let rows = children(&mut h, 100);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].duration_minutes, Some(45));
    assert_eq!(rows[0].activity_description.as_deref(), Some("WFH"));
    assert_eq!(rows[0].task_id, None);
    assert_eq!(rows[0].category_id, 1);
    assert_eq!(rows[0].start_time, Some(time!(09:00:00)));
    assert_eq!(rows[0].end_time, Some(time!(17:00:00)));
}

#[test]
fn test_fallback_duration_uses_parent_span() {
    let mut h = prepared();
    let mut seed = legacy_daily_activity(100, Some(""));
    seed.da_duration = Some(0);
    h.fixture.insert_daily_activity(&seed).unwrap();
    let mut timeless = legacy_daily_activity(101, None);
    timeless.da_duration = None;
    timeless.da_end_tm = None;
    h.fixture.insert_daily_activity(&timeless).unwrap();

    h.run_full(Job::ClockingActivities);

    assert_eq!(children(&mut h, 100)[0].duration_minutes, Some(480));
    assert_eq!(children(&mut h, 101)[0].duration_minutes, Some(0));
}

#[test]
fn test_missing_parent_is_created_before_children() {
    let mut h = prepared();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(
            100,
            Some(r#"[{"activity": "WFH", "duration": 20}]"#),
        ))
        .unwrap();

    let stats = h.run_full(Job::ClockingActivities);

    assert_eq!(stats.dependencies_created, 1);
    let parent = h.target.find_daily_activity(100).unwrap().unwrap();
    assert_eq!(parent.user_id, Some(1));
    assert_eq!(parent.priority.as_deref(), Some("High"));
    assert_eq!(children(&mut h, 100).len(), 1);
}

#[test]
fn test_children_converge_when_list_changes() {
    let mut h = prepared();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(
            100,
            Some(
                r#"[{"activity": "A", "duration": 10},
                    {"activity": "B", "duration": 20},
                    {"activity": "C", "duration": 30}]"#,
            ),
        ))
        .unwrap();
    h.run(Job::ClockingActivities, &RunOptions::incremental());

    h.fixture
        .set_daily_clocking(
            100,
            Some(r#"[{"activity": "A", "duration": 10}, {"activity": "B", "duration": 25}]"#),
            jan(10, 9),
        )
        .unwrap();
    let stats = h.run(Job::ClockingActivities, &RunOptions::incremental());

    assert_eq!(stats.unchanged, 1);
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.deleted, 1);
    let durations: Vec<Option<i64>> = children(&mut h, 100)
        .into_iter()
        .map(|row| row.duration_minutes)
        .collect();
    assert_eq!(durations, vec![Some(10), Some(25)]);
}

#[test]
fn test_fallback_row_is_replaced_by_later_entries() {
    let mut h = prepared();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(100, None))
        .unwrap();
    h.run(Job::ClockingActivities, &RunOptions::incremental());
    assert_eq!(children(&mut h, 100).len(), 1);

    h.fixture
        .set_daily_clocking(
            100,
            Some(r#"[{"activity": "WFO", "duration": 60}, {"activity": "WFH", "duration": 90}]"#),
            jan(10, 9),
        )
        .unwrap();
    let stats = h.run(Job::ClockingActivities, &RunOptions::incremental());

    assert_eq!(stats.updated, 1);
    assert_eq!(stats.inserted, 1);
    let tasks: Vec<Option<i64>> = children(&mut h, 100)
        .into_iter()
        .map(|row| row.task_id)
        .collect();
    assert_eq!(tasks, vec![Some(7), Some(1)]);
}

#[test]
fn test_invalid_payload_falls_back() {
    let mut h = prepared();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(100, Some("[{broken")))
        .unwrap();

    let stats = h.run_full(Job::ClockingActivities);

    assert_eq!(stats.issue_count(DataIssue::InvalidPayload), 1);
    assert_eq!(children(&mut h, 100).len(), 1);
}

#[test]
fn test_negative_entry_duration_is_zeroed() {
    let mut h = prepared();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(
            100,
            Some(
                r#"[{"activity": "Late", "start_date": "2024-01-01", "start_time": "11:00:00",
                     "end_date": "2024-01-01", "end_time": "10:00:00"}]"#,
            ),
        ))
        .unwrap();

    let stats = h.run_full(Job::ClockingActivities);

    assert_eq!(stats.issue_count(DataIssue::NegativeDuration), 1);
    assert_eq!(children(&mut h, 100)[0].duration_minutes, Some(0));
}

#[test]
fn test_every_written_category_exists() {
    let mut h = prepared();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(
            100,
            Some(
                r#"[{"category_id": 3}, {"task_id": 12}, {"activity": "onsite"}, {"category_id": 1}]"#,
            ),
        ))
        .unwrap();

    h.run_full(Job::ClockingActivities);

    let categories: Vec<i64> = h.target.list_category_ids().unwrap();
    for (_, row) in h.target.list_clockings().unwrap() {
        assert!(categories.contains(&row.category_id));
    }
}

#[test]
fn test_dry_run_writes_nothing() {
    let mut h = Harness::new();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(
            100,
            Some(r#"[{"activity": "WFH", "duration": 15}, {"activity": "WFO"}]"#),
        ))
        .unwrap();
    h.fixture
        .insert_daily_activity(&legacy_daily_activity(101, None))
        .unwrap();

    let stats = h.run(Job::ClockingActivities, &RunOptions::full().with_dry_run(true));

    assert_eq!(stats.inserted, 3);
    assert!(stats.dependencies_created > 0);
    let counts = h.target.count_tables().unwrap();
    assert_eq!(counts.categories, 0);
    assert_eq!(counts.daily_activities, 0);
    assert_eq!(counts.clocking_activities, 0);
    assert_eq!(counts.users, 0);
    assert!(h.target.list_watermarks().unwrap().is_empty());
}
