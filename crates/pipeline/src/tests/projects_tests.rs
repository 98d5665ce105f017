// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clocking_domain::{DataIssue, RunOptions};

use super::{Harness, jan, legacy_project};
use crate::Job;

#[test]
fn test_status_codes_are_mapped() {
    let mut h = Harness::new();
    for (code, status) in [
        ("A", Some("f")),
        ("B", Some("x")),
        ("C", None),
        ("D", Some("P")),
        ("E", Some("c")),
    ] {
        h.fixture
            .insert_project(&legacy_project(code, status, None))
            .unwrap();
    }

    let stats = h.run_full(Job::Projects);
    assert_eq!(stats.inserted, 5);

    let statuses: Vec<(String, String)> = h
        .target
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|p| (p.project_code, p.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (String::from("A"), String::from("finished")),
            (String::from("B"), String::from("unknown")),
            (String::from("C"), String::from("unknown")),
            (String::from("D"), String::from("progress")),
            (String::from("E"), String::from("cancelled")),
        ]
    );
}

#[test]
fn test_status_change_updates_project() {
    let mut h = Harness::new();
    h.fixture
        .insert_project(&legacy_project("P1", Some("p"), None))
        .unwrap();
    h.run(Job::Projects, &RunOptions::incremental());

    h.fixture.set_project_status("P1", "f", jan(15, 10)).unwrap();
    let stats = h.run(Job::Projects, &RunOptions::incremental());

    assert_eq!(stats.updated, 1);
    let project = h.target.find_project("P1").unwrap().unwrap();
    assert_eq!(project.status, "finished");
    assert_eq!(project.last_update, Some(jan(15, 10)));
}

#[test]
fn test_columns_are_carried_over() {
    let mut h = Harness::new();
    let mut seed = legacy_project("P9", Some("i"), None);
    seed.pr_pic_project = Some(42);
    h.fixture.insert_project(&seed).unwrap();

    h.run_full(Job::Projects);

    let project = h.target.find_project("P9").unwrap().unwrap();
    assert_eq!(project.project_name.as_deref(), Some("Project P9"));
    assert_eq!(project.customer_name.as_deref(), Some("ACME"));
    assert_eq!(project.project_manager_id, Some(42));
    assert_eq!(project.created_by.as_deref(), Some("admin"));
    assert_eq!(project.status, "initial");
}

#[test]
fn test_blank_project_code_is_skipped() {
    let mut h = Harness::new();
    h.fixture
        .insert_project(&legacy_project("  ", Some("p"), None))
        .unwrap();

    let stats = h.run_full(Job::Projects);

    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.issue_count(DataIssue::MissingKey), 1);
    assert!(h.target.list_projects().unwrap().is_empty());
}
