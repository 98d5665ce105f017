// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{is_placeholder_email, normalize_position, placeholder_email, task_id_for_label};

#[test]
fn test_task_label_mapping_is_case_insensitive() {
    assert_eq!(task_id_for_label("WFH"), Some(1));
    assert_eq!(task_id_for_label("wfh"), Some(1));
    assert_eq!(task_id_for_label("Remote"), Some(1));
    assert_eq!(task_id_for_label("OnSite"), Some(7));
    assert_eq!(task_id_for_label(" wfo "), Some(7));
}

#[test]
fn test_unmapped_label_has_no_task() {
    assert_eq!(task_id_for_label("meeting"), None);
    assert_eq!(task_id_for_label(""), None);
}

#[test]
fn test_placeholder_email_uses_source_key() {
    assert_eq!(placeholder_email("abc123"), "abc123@placeholder.local");
    assert_eq!(placeholder_email(" k9 "), "k9@placeholder.local");
}

#[test]
fn test_placeholder_emails_are_recognized() {
    assert!(is_placeholder_email(&placeholder_email("k-new")));
    assert!(!is_placeholder_email("ana@example.com"));
    assert!(!is_placeholder_email("ana@placeholder.local.example.com"));
    assert!(!is_placeholder_email("placeholder.local"));
}

#[test]
fn test_position_normalization() {
    assert_eq!(normalize_position(Some("3")), Some(3));
    assert_eq!(normalize_position(Some(" 12 ")), Some(12));
    assert_eq!(normalize_position(Some("")), None);
    assert_eq!(normalize_position(Some("manager")), None);
    assert_eq!(normalize_position(Some("999999")), None);
    assert_eq!(normalize_position(None), None);
}
