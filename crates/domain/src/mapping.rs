// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fixed lookup tables carried over from the legacy data conventions.

/// Category assigned when a clocking entry names no usable category.
pub const DEFAULT_CATEGORY_ID: i64 = 1;

/// Domain used for synthesized user email addresses.
pub const PLACEHOLDER_EMAIL_DOMAIN: &str = "placeholder.local";

/// Activity label to task id. Labels are matched case-insensitively.
pub const TASK_LABELS: &[(&str, i64)] = &[("remote", 1), ("wfh", 1), ("onsite", 7), ("wfo", 7)];

/// Looks up the task id for a free-text activity label.
///
/// Surrounding whitespace is ignored. Unmapped labels return `None`.
#[must_use]
pub fn task_id_for_label(label: &str) -> Option<i64> {
    let needle: String = label.trim().to_lowercase();
    TASK_LABELS
        .iter()
        .find(|(known, _)| *known == needle)
        .map(|(_, task_id)| *task_id)
}

/// Builds the placeholder email for a legacy identity key.
#[must_use]
pub fn placeholder_email(source_key: &str) -> String {
    format!("{}@{PLACEHOLDER_EMAIL_DOMAIN}", source_key.trim())
}

/// Whether `email` was synthesized by [`placeholder_email`].
#[must_use]
pub fn is_placeholder_email(email: &str) -> bool {
    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain == PLACEHOLDER_EMAIL_DOMAIN)
}

/// Coerces the legacy `jabatan` column to a small integer position.
///
/// Blank or non-numeric values, and values outside the `i16` range,
/// become `None`.
#[must_use]
pub fn normalize_position(raw: Option<&str>) -> Option<i16> {
    let trimmed: &str = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i16>().ok()
}
