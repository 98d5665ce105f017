// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend validation tests for multi-database support.
//!
//! These tests validate that the persistence layer works correctly on
//! MariaDB/MySQL, the production backend.
//!
//! ## Test Execution
//!
//! - `SQLite` tests run normally via `cargo test`
//! - MariaDB/MySQL tests are marked `#[ignore]` and run only via `cargo xtask test-mariadb`
//!
//! ## Infrastructure Requirements
//!
//! `MariaDB` tests require:
//! - `DATABASE_URL` environment variable (set by xtask)
//! - `CLOCKING_TEST_BACKEND=mariadb` environment variable
//! - Running `MariaDB` instance (provisioned by xtask)
//!
//! Tests fail fast if required infrastructure is missing.
//!
//! ## What These Tests Validate
//!
//! Schema and SQL compatibility, not migration logic: migrations apply,
//! constraints are enforced, the backend-specific backfill statements
//! compute the same minutes as on `SQLite`, and the watermark upsert works
//! with `MySQL`'s affected-row semantics. Each test uses its own id range
//! so tests sharing one database do not collide.

use diesel::MysqlConnection;
use diesel::prelude::*;
use std::env;

use crate::TargetStore;
use crate::backend::{CountRow, mysql};

/// Helper to get the `MariaDB` connection URL from environment.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set, indicating missing infrastructure.
fn get_mariadb_url() -> String {
    env::var("DATABASE_URL")
        .expect("DATABASE_URL not set - MariaDB tests must be run via `cargo xtask test-mariadb`")
}

/// Helper to verify we're running in the `MariaDB` test environment.
///
/// # Panics
///
/// Panics if `CLOCKING_TEST_BACKEND` is not set to `mariadb`.
fn verify_mariadb_test_environment() {
    let backend = env::var("CLOCKING_TEST_BACKEND").expect(
        "CLOCKING_TEST_BACKEND not set - MariaDB tests must be run via `cargo xtask test-mariadb`",
    );
    assert_eq!(backend, "mariadb", "CLOCKING_TEST_BACKEND must be 'mariadb'");
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_connection() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = MysqlConnection::establish(&url);
    assert!(
        result.is_ok(),
        "Failed to connect to MariaDB: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_migrations_apply_cleanly() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let result = mysql::initialize_database(&url);
    assert!(
        result.is_ok(),
        "Failed to initialize MariaDB and run migrations: {:?}",
        result.err()
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_foreign_key_enforcement() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    let result = mysql::verify_foreign_key_enforcement(&mut conn);
    assert!(
        result.is_ok(),
        "Foreign key enforcement verification failed: {:?}",
        result.err()
    );

    let orphan = diesel::sql_query(
        "INSERT INTO clocking_activities (daily_activity_id, category_id) VALUES (987654, 987654)",
    )
    .execute(&mut conn);
    assert!(
        orphan.is_err(),
        "Clocking row without parent or category should fail due to foreign keys"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_user_email_unique_constraint() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    diesel::sql_query(
        "INSERT INTO users (user_id, email) VALUES (900001, 'unique-check@placeholder.local')",
    )
    .execute(&mut conn)
    .expect("Failed to insert user");

    let duplicate = diesel::sql_query(
        "INSERT INTO users (user_id, email) VALUES (900002, 'unique-check@placeholder.local')",
    )
    .execute(&mut conn);

    assert!(
        duplicate.is_err(),
        "Duplicate email should fail due to UNIQUE constraint"
    );
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_backfill_duration_arithmetic() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut conn = mysql::initialize_database(&url).expect("Failed to initialize MariaDB database");

    diesel::sql_query(
        "INSERT IGNORE INTO category_clocking (category_id, category_description) VALUES (900001, 'mariadb test')",
    )
    .execute(&mut conn)
    .expect("Failed to insert category");
    diesel::sql_query("INSERT IGNORE INTO daily_activities (daily_activity_id) VALUES (900001)")
        .execute(&mut conn)
        .expect("Failed to insert daily activity");
    diesel::sql_query(
        "INSERT INTO clocking_activities
         (daily_activity_id, category_id, start_date, start_time, end_date, end_time)
         VALUES (900001, 900001, '2024-01-01', '09:00:00', '2024-01-01', '10:30:00'),
                (900001, 900001, '2024-01-01', '09:00:00', '2024-01-01', '08:00:00')",
    )
    .execute(&mut conn)
    .expect("Failed to insert clocking rows");

    assert!(mysql::count_inverted_intervals(&mut conn).expect("count inverted") >= 1);
    mysql::derive_missing_durations(&mut conn).expect("derive durations");

    let derived: i64 = diesel::sql_query(
        "SELECT COUNT(*) AS count FROM clocking_activities
         WHERE daily_activity_id = 900001 AND duration_minutes = 90",
    )
    .get_result::<CountRow>(&mut conn)
    .map(|r| r.count)
    .expect("Failed to count derived rows");
    assert_eq!(derived, 1);
}

#[test]
#[ignore = "requires MariaDB via cargo xtask test-mariadb"]
fn test_mariadb_watermark_upsert_is_repeatable() {
    verify_mariadb_test_environment();
    let url = get_mariadb_url();

    let mut store = TargetStore::new_with_mysql(&url).expect("Failed to open MariaDB target");
    store.ensure_watermark_table().expect("ensure table");

    store
        .upsert_watermark("mariadb_validation", None, Some(5))
        .expect("first upsert");
    // Same values again: MySQL reports zero changed rows, which must not insert a duplicate.
    store
        .upsert_watermark("mariadb_validation", None, Some(5))
        .expect("second upsert");

    let stored = store
        .get_watermark("mariadb_validation")
        .expect("read watermark")
        .expect("watermark present");
    assert_eq!(stored.last_id, Some(5));
}
