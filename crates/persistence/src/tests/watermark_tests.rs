// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::datetime;

use crate::TargetStore;

#[test]
fn test_missing_watermark_is_none() {
    let mut store = TargetStore::new_in_memory().unwrap();
    assert_eq!(store.get_watermark("ss_user").unwrap(), None);
}

#[test]
fn test_upsert_inserts_then_updates() {
    let mut store = TargetStore::new_in_memory().unwrap();

    store
        .upsert_watermark("ss_user", Some(datetime!(2024-01-01 10:00:00)), Some(3))
        .unwrap();
    store
        .upsert_watermark("ss_user", Some(datetime!(2024-02-01 10:00:00)), Some(9))
        .unwrap();

    let stored = store.get_watermark("ss_user").unwrap().unwrap();
    assert_eq!(stored.last_updated_at, Some(datetime!(2024-02-01 10:00:00)));
    assert_eq!(stored.last_id, Some(9));
    assert!(stored.updated_at.is_some());
    assert_eq!(store.list_watermarks().unwrap().len(), 1);
}

#[test]
fn test_watermark_with_only_an_id() {
    let mut store = TargetStore::new_in_memory().unwrap();

    store
        .upsert_watermark("ss_category_clocking", None, Some(12))
        .unwrap();

    let stored = store.get_watermark("ss_category_clocking").unwrap().unwrap();
    assert_eq!(stored.last_updated_at, None);
    assert_eq!(stored.last_id, Some(12));
}

#[test]
fn test_ensure_watermark_table_is_idempotent() {
    let mut store = TargetStore::new_in_memory().unwrap();
    store.upsert_watermark("job", None, Some(1)).unwrap();

    store.ensure_watermark_table().unwrap();
    store.ensure_watermark_table().unwrap();

    assert_eq!(store.get_watermark("job").unwrap().unwrap().last_id, Some(1));
}

#[test]
fn test_watermarks_listed_by_job_name() {
    let mut store = TargetStore::new_in_memory().unwrap();
    store.upsert_watermark("ss_user", None, Some(1)).unwrap();
    store.upsert_watermark("ss_daily_activity", None, Some(2)).unwrap();

    let names: Vec<String> = store
        .list_watermarks()
        .unwrap()
        .into_iter()
        .map(|w| w.job_name)
        .collect();
    assert_eq!(names, vec!["ss_daily_activity", "ss_user"]);
}
