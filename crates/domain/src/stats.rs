// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

/// Row-level data-quality conditions. These never abort a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataIssue {
    /// An embedded JSON payload could not be parsed or had the wrong shape.
    InvalidPayload,
    /// A sub-record inside a valid payload had the wrong shape.
    MalformedEntry,
    /// A daily activity carried no owner key in `da_data`.
    MissingUserKey,
    /// A source email already belongs to a different target user.
    EmailConflict,
    /// A membership row referenced a project absent from the target.
    MissingProject,
    /// A category id was not in the target category set and was replaced.
    InvalidCategory,
    /// A clocking entry ended before it started.
    NegativeDuration,
    /// A source row lacked its natural key.
    MissingKey,
    /// A legacy user id was held by a placeholder user, which was moved.
    PlaceholderRelocated,
}

impl DataIssue {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPayload => "invalid_payload",
            Self::MalformedEntry => "malformed_entry",
            Self::MissingUserKey => "missing_user_key",
            Self::EmailConflict => "email_conflict",
            Self::MissingProject => "missing_project",
            Self::InvalidCategory => "invalid_category",
            Self::NegativeDuration => "negative_duration",
            Self::MissingKey => "missing_key",
            Self::PlaceholderRelocated => "placeholder_relocated",
        }
    }
}

impl std::fmt::Display for DataIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Counters reported at the end of a job run.
///
/// In dry-run mode `inserted`/`updated` are "would insert"/"would update".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobStats {
    pub job: String,
    pub dry_run: bool,
    /// Source rows read.
    pub processed: u64,
    pub inserted: u64,
    pub updated: u64,
    /// Rows already present and left as they were.
    pub unchanged: u64,
    /// Rows not written because of a data-quality condition.
    pub skipped: u64,
    /// Values substituted by a guard (e.g. an invalid category).
    pub fixed: u64,
    /// Rows removed while reconciling clocking children or project memberships
    /// against their source.
    pub deleted: u64,
    /// Referenced rows synthesized to satisfy a foreign key.
    pub dependencies_created: u64,
    pub issues: BTreeMap<DataIssue, u64>,
}

impl JobStats {
    #[must_use]
    pub fn new(job: &str, dry_run: bool) -> Self {
        Self {
            job: job.to_string(),
            dry_run,
            ..Self::default()
        }
    }

    /// Records one occurrence of a data-quality condition.
    pub fn note(&mut self, issue: DataIssue) {
        *self.issues.entry(issue).or_insert(0) += 1;
    }

    /// Records `count` occurrences of a data-quality condition.
    pub fn note_many(&mut self, issue: DataIssue, count: u64) {
        if count > 0 {
            *self.issues.entry(issue).or_insert(0) += count;
        }
    }

    #[must_use]
    pub fn issue_count(&self, issue: DataIssue) -> u64 {
        self.issues.get(&issue).copied().unwrap_or(0)
    }

    /// Rows written (or that would be written): inserts plus updates.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.inserted + self.updated
    }

    /// One human-readable summary line.
    #[must_use]
    pub fn summary(&self) -> String {
        let prefix: &str = if self.dry_run { "[dry-run] " } else { "" };
        let mut line: String = format!(
            "{prefix}{}: processed={} inserted={} updated={} unchanged={} skipped={} fixed={}",
            self.job,
            self.processed,
            self.inserted,
            self.updated,
            self.unchanged,
            self.skipped,
            self.fixed
        );
        if self.deleted > 0 {
            line.push_str(&format!(" deleted={}", self.deleted));
        }
        if self.dependencies_created > 0 {
            line.push_str(&format!(" created_dependencies={}", self.dependencies_created));
        }
        if !self.issues.is_empty() {
            let issues: Vec<String> = self
                .issues
                .iter()
                .map(|(issue, count)| format!("{issue}={count}"))
                .collect();
            line.push_str(&format!(" issues[{}]", issues.join(", ")));
        }
        line
    }
}

impl std::fmt::Display for JobStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.summary())
    }
}
