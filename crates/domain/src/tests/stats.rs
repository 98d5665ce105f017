// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DataIssue, JobStats};

#[test]
fn test_summary_line_reports_counters() {
    let mut stats: JobStats = JobStats::new("ss_user", false);
    stats.processed = 10;
    stats.inserted = 7;
    stats.updated = 2;
    stats.skipped = 1;
    stats.note(DataIssue::EmailConflict);

    assert_eq!(
        stats.summary(),
        "ss_user: processed=10 inserted=7 updated=2 unchanged=0 skipped=1 fixed=0 \
         issues[email_conflict=1]"
    );
    assert_eq!(stats.written(), 9);
}

#[test]
fn test_summary_marks_dry_run() {
    let stats: JobStats = JobStats::new("ss_category_clocking", true);
    assert!(stats.summary().starts_with("[dry-run] ss_category_clocking:"));
}

#[test]
fn test_issue_counters_accumulate() {
    let mut stats: JobStats = JobStats::new("job", false);
    stats.note(DataIssue::InvalidCategory);
    stats.note(DataIssue::InvalidCategory);
    stats.note_many(DataIssue::MalformedEntry, 3);
    stats.note_many(DataIssue::InvalidPayload, 0);

    assert_eq!(stats.issue_count(DataIssue::InvalidCategory), 2);
    assert_eq!(stats.issue_count(DataIssue::MalformedEntry), 3);
    assert_eq!(stats.issue_count(DataIssue::InvalidPayload), 0);
    assert!(!stats.issues.contains_key(&DataIssue::InvalidPayload));
}
