// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clocking_domain::DomainError;
use clocking_persistence::PersistenceError;
use thiserror::Error;

use crate::job::Job;

/// Failures that abort a job or the whole pipeline.
///
/// Row-level data problems are not errors; they are counted in
/// [`clocking_domain::JobStats`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The source database could not be opened.
    #[error("Cannot connect to source database: {0}")]
    SourceUnavailable(#[source] PersistenceError),

    /// The target database could not be opened or migrated.
    #[error("Cannot connect to target database: {0}")]
    TargetUnavailable(#[source] PersistenceError),

    /// A statement failed while a job was running. The job's writes were rolled back.
    #[error("Job '{job}' failed: {source}")]
    JobFailed {
        job: Job,
        #[source]
        source: PersistenceError,
    },

    /// A statement failed outside any job.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Invalid run options.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A job name that matches none of the known jobs.
    #[error("Unknown job '{0}'")]
    UnknownJob(String),
}

impl PipelineError {
    /// Attributes a bare persistence failure to `job`.
    #[must_use]
    pub fn in_job(self, job: Job) -> Self {
        match self {
            Self::Persistence(source) => Self::JobFailed { job, source },
            other => other,
        }
    }
}
