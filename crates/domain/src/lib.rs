// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Value types and pure row transforms for the clocking reports pipeline.
//!
//! Nothing in this crate touches a database. It owns the mapping rules
//! from the legacy `system-smartpro` vocabulary (single-letter status and
//! priority codes, free-text activity labels, embedded JSON payloads) to
//! the normalized reporting schema, plus the run options and statistics
//! shared by every migration job.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod interval;
mod mapping;
mod payload;
mod stats;
mod types;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use interval::{
    Interval, derive_duration_minutes, parse_date, parse_since, parse_time, split_timestamp,
};
pub use mapping::{
    DEFAULT_CATEGORY_ID, PLACEHOLDER_EMAIL_DOMAIN, TASK_LABELS, is_placeholder_email,
    normalize_position, placeholder_email, task_id_for_label,
};
pub use payload::{
    ActivityData, ClockingEntry, Parsed, ProjectMember, parse_activity_data,
    parse_clocking_entries, parse_members,
};
pub use stats::{DataIssue, JobStats};
pub use types::{MigrationMode, Priority, ProjectStatus, RunOptions};
