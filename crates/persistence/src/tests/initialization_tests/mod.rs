// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other test module opens stores through the same constructors, so
//! these only pin down the properties the rest rely on: migrations ran,
//! foreign keys are enforced, and in-memory instances are isolated.

use crate::TargetStore;
use crate::error::PersistenceError;
use crate::testing::SourceFixture;

use super::create_test_user;

#[test]
fn test_target_store_initialization() {
    let result: Result<TargetStore, PersistenceError> = TargetStore::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_migrations_applied_on_initialization() {
    let mut store = TargetStore::new_in_memory().unwrap();

    let counts = store.count_tables().unwrap();
    assert_eq!(counts.users, 0);
    assert_eq!(counts.clocking_activities, 0);
    assert!(store.list_watermarks().unwrap().is_empty());
}

#[test]
fn test_foreign_keys_enforced() {
    let mut store = TargetStore::new_in_memory().unwrap();
    assert!(store.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = TargetStore::new_in_memory().unwrap();
    let mut db2 = TargetStore::new_in_memory().unwrap();

    db1.insert_user(&create_test_user(1, "a@example.com")).unwrap();

    assert_eq!(db1.count_tables().unwrap().users, 1);
    assert_eq!(db2.count_tables().unwrap().users, 0);
}

#[test]
fn test_open_accepts_shared_memory_uri() {
    let mut store = TargetStore::open("file:memdb_open_uri_test?mode=memory&cache=shared").unwrap();
    assert_eq!(store.backend_name(), "sqlite");
    assert!(store.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_source_store_sees_fixture_rows() {
    let fixture = SourceFixture::new().unwrap();
    let mut source = fixture.open_store().unwrap();

    assert!(source.fetch_users(None, None).unwrap().is_empty());
}

#[test]
fn test_source_store_reports_unreachable_mysql_as_connection_error() {
    let result = crate::SourceStore::open("mysql://nobody@127.0.0.1:1/missing");
    match result {
        Err(err) => assert!(err.is_connection_error(), "unexpected error: {err}"),
        Ok(_) => panic!("connection to a closed port should fail"),
    }
}
