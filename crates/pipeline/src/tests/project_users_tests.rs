// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clocking_domain::{DataIssue, RunOptions};
use clocking_persistence::TargetStore;

use super::{Harness, jan, legacy_project, legacy_user};
use crate::{Job, PipelineConfig, run_all};

fn member_ids(target: &mut TargetStore) -> Vec<i64> {
    target
        .list_project_users()
        .unwrap()
        .into_iter()
        .map(|pair| pair.user_id)
        .collect()
}

const MEMBERS: &str = r#"{
    "k-ana": {"email": "ana@example.com", "nickname": "Ana"},
    "k-budi": {"email": null, "nickname": "Budi"},
    "k-new": {"nickname": "Newbie", "jabatan": "2"}
}"#;

fn seeded() -> Harness {
    let mut h = Harness::new();
    h.fixture
        .insert_user(&legacy_user(1, "k-ana", Some("ana@example.com")))
        .unwrap();
    h.fixture
        .insert_user(&legacy_user(2, "k-budi", Some("budi@example.com")))
        .unwrap();
    h.fixture
        .insert_project(&legacy_project("P1", Some("p"), Some(MEMBERS)))
        .unwrap();
    h.run_full(Job::Users);
    h.run_full(Job::Projects);
    h
}

#[test]
fn test_members_resolve_by_email_legacy_key_and_placeholder() {
    let mut h = seeded();

    let stats = h.run_full(Job::ProjectUsers);

    assert_eq!(stats.inserted, 3);
    assert_eq!(stats.dependencies_created, 1);

    let pairs: Vec<i64> = h
        .target
        .list_project_users()
        .unwrap()
        .into_iter()
        .map(|pair| pair.user_id)
        .collect();
    assert_eq!(pairs, vec![1, 2, 3]);

    let placeholder = h.target.find_user(3).unwrap().unwrap();
    assert_eq!(placeholder.email, "k-new@placeholder.local");
    assert_eq!(placeholder.full_name.as_deref(), Some("Newbie"));
    assert_eq!(placeholder.position, Some(2));
}

#[test]
fn test_rerun_adds_no_pairs_or_users() {
    let mut h = seeded();
    h.run_full(Job::ProjectUsers);

    let rerun = h.run_full(Job::ProjectUsers);

    assert_eq!(rerun.inserted, 0);
    assert_eq!(rerun.unchanged, 3);
    assert_eq!(rerun.dependencies_created, 0);
    assert_eq!(h.target.list_project_users().unwrap().len(), 3);
    assert_eq!(h.target.list_users().unwrap().len(), 3);
}

#[test]
fn test_placeholder_ids_continue_after_existing_maximum() {
    let mut h = seeded();
    h.fixture
        .insert_project(&legacy_project(
            "P2",
            Some("p"),
            Some(r#"{"k-x": {"nickname": "X"}, "k-y": {}}"#),
        ))
        .unwrap();
    h.run_full(Job::Projects);

    h.run_full(Job::ProjectUsers);

    let emails: Vec<(i64, String)> = h
        .target
        .list_users()
        .unwrap()
        .into_iter()
        .map(|u| (u.user_id, u.email))
        .collect();
    assert_eq!(emails.len(), 5);
    assert!(emails.contains(&(3, String::from("k-new@placeholder.local"))));
    assert!(emails.contains(&(4, String::from("k-x@placeholder.local"))));
    assert!(emails.contains(&(5, String::from("k-y@placeholder.local"))));

    let unnamed = h.target.find_user(5).unwrap().unwrap();
    assert_eq!(unnamed.full_name.as_deref(), Some("k-y"));
}

#[test]
fn test_members_of_unknown_project_are_skipped() {
    let mut h = Harness::new();
    h.fixture
        .insert_project(&legacy_project("P1", Some("p"), Some(MEMBERS)))
        .unwrap();

    let stats = h.run_full(Job::ProjectUsers);

    assert_eq!(stats.skipped, 3);
    assert_eq!(stats.issue_count(DataIssue::MissingProject), 3);
    assert!(h.target.list_project_users().unwrap().is_empty());
    assert!(h.target.list_users().unwrap().is_empty());
}

#[test]
fn test_malformed_payloads_are_counted() {
    let mut h = Harness::new();
    h.fixture
        .insert_project(&legacy_project("BAD", Some("p"), Some("{not json")))
        .unwrap();
    h.fixture
        .insert_project(&legacy_project(
            "MIX",
            Some("p"),
            Some(r#"{"k-ok": {"nickname": "Ok"}, "k-bad": "just a string"}"#),
        ))
        .unwrap();
    h.run_full(Job::Projects);

    let stats = h.run_full(Job::ProjectUsers);

    assert_eq!(stats.issue_count(DataIssue::InvalidPayload), 1);
    assert_eq!(stats.issue_count(DataIssue::MalformedEntry), 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.inserted, 1);
}

#[test]
fn test_dry_run_creates_nothing() {
    let mut h = seeded();

    let stats = h.run(Job::ProjectUsers, &RunOptions::full().with_dry_run(true));

    assert_eq!(stats.inserted, 3);
    assert_eq!(stats.dependencies_created, 1);
    assert!(h.target.list_project_users().unwrap().is_empty());
    assert_eq!(h.target.list_users().unwrap().len(), 2);
}

#[test]
fn test_departed_members_are_removed() {
    let mut h = seeded();
    h.run(Job::ProjectUsers, &RunOptions::incremental());
    assert_eq!(member_ids(&mut h.target), vec![1, 2, 3]);

    h.fixture
        .set_project_members(
            "P1",
            Some(r#"{"k-ana": {"email": "ana@example.com"}}"#),
            jan(20, 9),
        )
        .unwrap();

    let preview = h.run(Job::ProjectUsers, &RunOptions::incremental().with_dry_run(true));
    assert_eq!(preview.deleted, 2);
    assert_eq!(member_ids(&mut h.target), vec![1, 2, 3]);

    let stats = h.run(Job::ProjectUsers, &RunOptions::incremental());
    assert_eq!(stats.deleted, 2);
    assert_eq!(stats.unchanged, 1);
    assert_eq!(member_ids(&mut h.target), vec![1]);

    let mut fresh = TargetStore::new_in_memory().unwrap();
    run_all(
        &mut h.source,
        &mut fresh,
        &PipelineConfig::default(),
        &RunOptions::full(),
    )
    .unwrap();
    assert_eq!(member_ids(&mut fresh), member_ids(&mut h.target));
}

#[test]
fn test_cleared_member_list_empties_the_project() {
    let mut h = seeded();
    h.run_full(Job::ProjectUsers);

    h.fixture
        .set_project_members("P1", Some("{}"), jan(20, 9))
        .unwrap();
    let stats = h.run_full(Job::ProjectUsers);

    assert_eq!(stats.deleted, 3);
    assert!(h.target.list_project_users().unwrap().is_empty());
}

#[test]
fn test_unreadable_member_list_keeps_stored_pairs() {
    let mut h = seeded();
    h.run_full(Job::ProjectUsers);

    h.fixture
        .set_project_members("P1", Some("{broken"), jan(20, 9))
        .unwrap();
    let stats = h.run_full(Job::ProjectUsers);

    assert_eq!(stats.deleted, 0);
    assert_eq!(stats.issue_count(DataIssue::InvalidPayload), 1);
    assert_eq!(member_ids(&mut h.target), vec![1, 2, 3]);
}
