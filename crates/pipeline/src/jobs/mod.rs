// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The six entity migrators.
//!
//! Every migrator has the same shape: read a slice from the source,
//! map each row, write it through [`upsert`] (or a job-specific
//! reconciliation), and return the [`Checkpoint`] of the rows it read.
//! The runner in [`crate::orchestrator`] owns the transaction and the
//! watermark.

mod categories;
mod clocking_activities;
mod daily_activities;
mod project_users;
mod projects;
mod users;

use clocking_domain::JobStats;
use clocking_persistence::{
    CategoryRecord, DailyActivityRecord, PersistenceError, ProjectRecord, SourceStore,
    TargetStore, UserRecord,
};

use crate::error::PipelineError;
use crate::job::Job;
use crate::resolver::UserResolver;
use crate::watermark::{Checkpoint, Selection};

/// Everything a migrator needs for one run.
pub struct JobContext<'a> {
    pub source: &'a mut SourceStore,
    pub target: &'a mut TargetStore,
    pub default_category_id: i64,
    pub dry_run: bool,
    pub limit: Option<i64>,
    pub users: UserResolver,
    pub stats: JobStats,
}

/// Runs the migrator for `job` over `selection`.
///
/// # Errors
///
/// Returns an error if a database statement fails.
pub fn migrate(
    job: Job,
    ctx: &mut JobContext<'_>,
    selection: Selection,
) -> Result<Checkpoint, PipelineError> {
    match job {
        Job::Users => users::migrate(ctx, selection),
        Job::Projects => projects::migrate(ctx, selection),
        Job::ProjectUsers => project_users::migrate(ctx, selection),
        Job::Categories => categories::migrate(ctx, selection),
        Job::DailyActivities => daily_activities::migrate(ctx, selection),
        Job::ClockingActivities => clocking_activities::migrate(ctx, selection),
    }
}

/// What [`upsert`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Inserted,
    Updated,
    Unchanged,
}

/// A complete target row addressable by its natural key.
pub trait TargetRow: PartialEq + Sized {
    /// The stored row with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails.
    fn load(&self, target: &mut TargetStore) -> Result<Option<Self>, PersistenceError>;

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    fn insert(&self, target: &mut TargetStore) -> Result<(), PersistenceError>;

    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn update(&self, target: &mut TargetStore) -> Result<(), PersistenceError>;
}

/// Inserts `record`, or updates the stored row when it differs.
///
/// An identical stored row is left alone and counted as unchanged. In
/// dry-run mode the decision is counted but nothing is written.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub fn upsert<R: TargetRow>(
    target: &mut TargetStore,
    record: &R,
    dry_run: bool,
    stats: &mut JobStats,
) -> Result<Outcome, PipelineError> {
    let outcome: Outcome = match record.load(target)? {
        None => {
            if !dry_run {
                record.insert(target)?;
            }
            stats.inserted += 1;
            Outcome::Inserted
        }
        Some(stored) if stored == *record => {
            stats.unchanged += 1;
            Outcome::Unchanged
        }
        Some(_) => {
            if !dry_run {
                record.update(target)?;
            }
            stats.updated += 1;
            Outcome::Updated
        }
    };
    Ok(outcome)
}

impl TargetRow for UserRecord {
    fn load(&self, target: &mut TargetStore) -> Result<Option<Self>, PersistenceError> {
        target.find_user(self.user_id)
    }

    fn insert(&self, target: &mut TargetStore) -> Result<(), PersistenceError> {
        target.insert_user(self)
    }

    fn update(&self, target: &mut TargetStore) -> Result<(), PersistenceError> {
        target.update_user(self)
    }
}

impl TargetRow for ProjectRecord {
    fn load(&self, target: &mut TargetStore) -> Result<Option<Self>, PersistenceError> {
        target.find_project(&self.project_code)
    }

    fn insert(&self, target: &mut TargetStore) -> Result<(), PersistenceError> {
        target.insert_project(self)
    }

    fn update(&self, target: &mut TargetStore) -> Result<(), PersistenceError> {
        target.update_project(self)
    }
}

impl TargetRow for CategoryRecord {
    fn load(&self, target: &mut TargetStore) -> Result<Option<Self>, PersistenceError> {
        target.find_category(self.category_id)
    }

    fn insert(&self, target: &mut TargetStore) -> Result<(), PersistenceError> {
        target.insert_category(self)
    }

    fn update(&self, target: &mut TargetStore) -> Result<(), PersistenceError> {
        target.update_category(self)
    }
}

impl TargetRow for DailyActivityRecord {
    fn load(&self, target: &mut TargetStore) -> Result<Option<Self>, PersistenceError> {
        target.find_daily_activity(self.daily_activity_id)
    }

    fn insert(&self, target: &mut TargetStore) -> Result<(), PersistenceError> {
        target.insert_daily_activity(self)
    }

    fn update(&self, target: &mut TargetStore) -> Result<(), PersistenceError> {
        target.update_daily_activity(self)
    }
}

/// Trims `value` and drops it when blank.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
