// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Watermark bookkeeping around `migration_state`.
//!
//! Reads and writes here return plain `Result`s. The job runner decides
//! what a failure means: a failed read degrades to a full scan and a
//! failed write leaves the previous watermark in place. Both are safe
//! because every job write is idempotent.

use clocking_domain::RunOptions;
use clocking_persistence::{PersistenceError, TargetStore, Watermark};
use time::PrimitiveDateTime;

use crate::job::Job;

/// The highest change timestamp and key a job has processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checkpoint {
    pub last_updated_at: Option<PrimitiveDateTime>,
    pub last_id: Option<i64>,
}

impl Checkpoint {
    /// Folds one processed row into the checkpoint.
    pub fn observe(&mut self, changed_at: Option<PrimitiveDateTime>, id: Option<i64>) {
        self.last_updated_at = self.last_updated_at.max(changed_at);
        self.last_id = self.last_id.max(id);
    }

    /// The field-wise maximum of two checkpoints.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            last_updated_at: self.last_updated_at.max(other.last_updated_at),
            last_id: self.last_id.max(other.last_id),
        }
    }
}

impl From<Watermark> for Checkpoint {
    fn from(row: Watermark) -> Self {
        Self {
            last_updated_at: row.last_updated_at,
            last_id: row.last_id,
        }
    }
}

/// Which source rows a job reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    ChangedSince(PrimitiveDateTime),
    AfterId(i64),
}

impl Selection {
    /// Resolves the slice for `job` from the run options and stored checkpoint.
    ///
    /// Full mode reads everything. Incremental mode prefers an explicit
    /// `since`, then the stored checkpoint, and reads everything when
    /// neither is available. Id-keyed jobs ignore `since`.
    #[must_use]
    pub fn for_job(job: Job, options: &RunOptions, stored: Option<&Checkpoint>) -> Self {
        if !options.is_incremental() {
            return Self::All;
        }
        if job.is_keyed_by_id() {
            return stored
                .and_then(|checkpoint| checkpoint.last_id)
                .map_or(Self::All, Self::AfterId);
        }
        options
            .since
            .or_else(|| stored.and_then(|checkpoint| checkpoint.last_updated_at))
            .map_or(Self::All, Self::ChangedSince)
    }

    #[must_use]
    pub const fn cutoff(&self) -> Option<PrimitiveDateTime> {
        match self {
            Self::ChangedSince(cutoff) => Some(*cutoff),
            Self::All | Self::AfterId(_) => None,
        }
    }

    #[must_use]
    pub const fn after_id(&self) -> Option<i64> {
        match self {
            Self::AfterId(id) => Some(*id),
            Self::All | Self::ChangedSince(_) => None,
        }
    }
}

/// Creates `migration_state` if it is missing.
///
/// # Errors
///
/// Returns an error if the DDL statement fails.
pub fn ensure_schema(target: &mut TargetStore) -> Result<(), PersistenceError> {
    target.ensure_watermark_table()
}

/// The stored checkpoint for `job`, `None` on a first run.
///
/// # Errors
///
/// Returns an error if the read fails.
pub fn load(target: &mut TargetStore, job: Job) -> Result<Option<Checkpoint>, PersistenceError> {
    Ok(target
        .get_watermark(job.watermark_name())?
        .map(Checkpoint::from))
}

/// Stores `checkpoint` for `job`.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save(
    target: &mut TargetStore,
    job: Job,
    checkpoint: Checkpoint,
) -> Result<(), PersistenceError> {
    target.upsert_watermark(
        job.watermark_name(),
        checkpoint.last_updated_at,
        checkpoint.last_id,
    )
}
