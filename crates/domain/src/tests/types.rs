// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, MigrationMode, Priority, ProjectStatus, RunOptions};
use std::str::FromStr;
use time::macros::datetime;

#[test]
fn test_status_finished_code_maps_to_finished() {
    assert_eq!(
        ProjectStatus::from_legacy_code(Some("f")),
        ProjectStatus::Finished
    );
    assert_eq!(ProjectStatus::Finished.as_str(), "finished");
}

#[test]
fn test_status_mapping_covers_every_known_code() {
    assert_eq!(
        ProjectStatus::from_legacy_code(Some("p")),
        ProjectStatus::Progress
    );
    assert_eq!(
        ProjectStatus::from_legacy_code(Some("i")),
        ProjectStatus::Initial
    );
    assert_eq!(
        ProjectStatus::from_legacy_code(Some("c")),
        ProjectStatus::Cancelled
    );
}

#[test]
fn test_status_mapping_is_case_insensitive() {
    assert_eq!(
        ProjectStatus::from_legacy_code(Some("F")),
        ProjectStatus::Finished
    );
    assert_eq!(
        ProjectStatus::from_legacy_code(Some(" P ")),
        ProjectStatus::Progress
    );
}

#[test]
fn test_unrecognized_status_maps_to_unknown() {
    assert_eq!(
        ProjectStatus::from_legacy_code(Some("x")),
        ProjectStatus::Unknown
    );
    assert_eq!(ProjectStatus::from_legacy_code(None), ProjectStatus::Unknown);
    assert_eq!(ProjectStatus::from_legacy_code(Some("")), ProjectStatus::Unknown);
    assert_eq!(ProjectStatus::Unknown.to_string(), "unknown");
}

#[test]
fn test_priority_mapping() {
    assert_eq!(Priority::from_legacy_code(Some("H")), Some(Priority::High));
    assert_eq!(Priority::from_legacy_code(Some("M")), Some(Priority::Medium));
    assert_eq!(Priority::from_legacy_code(Some("L")), Some(Priority::Low));
    assert_eq!(Priority::from_legacy_code(Some("Z")), None);
    assert_eq!(Priority::from_legacy_code(None), None);
    assert_eq!(Priority::Medium.as_str(), "Medium");
}

#[test]
fn test_migration_mode_parses_both_modes() {
    assert_eq!(
        MigrationMode::from_str("incremental").unwrap(),
        MigrationMode::Incremental
    );
    assert_eq!(MigrationMode::from_str("FULL").unwrap(), MigrationMode::Full);
}

#[test]
fn test_migration_mode_rejects_unknown_mode() {
    let result = MigrationMode::from_str("partial");
    assert_eq!(
        result,
        Err(DomainError::InvalidMode(String::from("partial")))
    );
}

#[test]
fn test_default_run_options_are_incremental_and_writing() {
    let options: RunOptions = RunOptions::default();
    assert!(options.is_incremental());
    assert!(!options.dry_run);
    assert!(options.since.is_none());
    assert!(options.limit.is_none());
}

#[test]
fn test_run_options_builders() {
    let options: RunOptions = RunOptions::full()
        .with_dry_run(true)
        .with_since(Some(datetime!(2024-01-01 0:00)))
        .with_limit(Some(50))
        .unwrap();
    assert_eq!(options.mode, MigrationMode::Full);
    assert!(options.dry_run);
    assert_eq!(options.since, Some(datetime!(2024-01-01 0:00)));
    assert_eq!(options.limit, Some(50));
}

#[test]
fn test_run_options_reject_non_positive_limit() {
    assert_eq!(
        RunOptions::incremental().with_limit(Some(0)),
        Err(DomainError::InvalidLimit(0))
    );
    assert!(RunOptions::incremental().with_limit(None).is_ok());
}
