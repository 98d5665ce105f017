// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Job lifecycle and pipeline ordering.
//!
//! A job run:
//!
//! 1. makes sure `migration_state` exists
//! 2. loads the stored checkpoint, falling back to a full scan if it
//!    cannot be read
//! 3. runs the migrator inside one target transaction (no transaction and
//!    no writes in dry-run mode)
//! 4. after commit, stores `max(previous, observed)` as the new checkpoint
//!
//! Steps 1, 2 and 4 never fail the job. A failure in step 3 rolls the
//! job's writes back and aborts the pipeline; jobs that already committed
//! stay committed.

use clocking_domain::{DEFAULT_CATEGORY_ID, JobStats, RunOptions};
use clocking_persistence::{SourceStore, TargetStore};
use tracing::{info, warn};

use crate::backfill::{BackfillReport, run_backfill};
use crate::error::PipelineError;
use crate::job::Job;
use crate::jobs::{self, JobContext};
use crate::resolver::UserResolver;
use crate::watermark::{self, Checkpoint, Selection};

/// Settings shared by every job in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Category substituted for unknown category ids, created if missing.
    pub default_category_id: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_category_id: DEFAULT_CATEGORY_ID,
        }
    }
}

/// Connection URLs for the two databases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub source_url: String,
    pub target_url: String,
}

impl Endpoints {
    /// Opens the source database.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::SourceUnavailable`] if it cannot be reached.
    pub fn open_source(&self) -> Result<SourceStore, PipelineError> {
        SourceStore::open(&self.source_url).map_err(PipelineError::SourceUnavailable)
    }

    /// Opens and migrates the target database.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::TargetUnavailable`] if it cannot be reached
    /// or initialized.
    pub fn open_target(&self) -> Result<TargetStore, PipelineError> {
        TargetStore::open(&self.target_url).map_err(PipelineError::TargetUnavailable)
    }
}

/// Results of a full pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// One entry per job, in run order.
    pub jobs: Vec<JobStats>,
    /// `None` when the backfill was skipped (dry run).
    pub backfill: Option<BackfillReport>,
}

impl RunReport {
    /// The stats of `job`, if it ran.
    #[must_use]
    pub fn job(&self, job: Job) -> Option<&JobStats> {
        self.jobs.iter().find(|stats| stats.job == job.name())
    }
}

/// Runs one job over already-open stores.
///
/// # Errors
///
/// Returns [`PipelineError::JobFailed`] if a statement fails; the job's
/// writes are rolled back.
pub fn run_job(
    job: Job,
    source: &mut SourceStore,
    target: &mut TargetStore,
    config: &PipelineConfig,
    options: &RunOptions,
) -> Result<JobStats, PipelineError> {
    info!(
        %job,
        mode = %options.mode,
        since = ?options.since,
        limit = ?options.limit,
        dry_run = options.dry_run,
        "Starting job"
    );

    if let Err(e) = watermark::ensure_schema(target) {
        warn!(%job, error = %e, "Cannot ensure migration_state table");
    }

    let stored: Option<Checkpoint> = match watermark::load(target, job) {
        Ok(stored) => stored,
        Err(e) => {
            warn!(%job, error = %e, "Cannot read watermark, degrading to full scan");
            None
        }
    };
    let selection: Selection = Selection::for_job(job, options, stored.as_ref());
    info!(%job, ?selection, "Selected source slice");

    let mut run = |target: &mut TargetStore| -> Result<(Checkpoint, JobStats), PipelineError> {
        let mut ctx: JobContext<'_> = JobContext {
            source: &mut *source,
            target,
            default_category_id: config.default_category_id,
            dry_run: options.dry_run,
            limit: options.limit,
            users: UserResolver::new(options.dry_run),
            stats: JobStats::new(job.name(), options.dry_run),
        };
        let observed: Checkpoint = jobs::migrate(job, &mut ctx, selection)?;
        Ok((observed, ctx.stats))
    };

    let outcome: Result<(Checkpoint, JobStats), PipelineError> = if options.dry_run {
        run(target)
    } else {
        target.transaction(run)
    };
    let (observed, stats) = outcome.map_err(|e| e.in_job(job))?;

    if !options.dry_run {
        let next: Checkpoint = stored.unwrap_or_default().merge(observed);
        if let Err(e) = watermark::save(target, job, next) {
            warn!(%job, error = %e, "Cannot store watermark, next run will repeat this slice");
        }
    }

    info!("{}", stats.summary());
    Ok(stats)
}

/// Runs every job in dependency order, then the backfill unless dry-running.
///
/// Stops at the first failing job.
///
/// # Errors
///
/// Returns the first job or backfill failure.
pub fn run_all(
    source: &mut SourceStore,
    target: &mut TargetStore,
    config: &PipelineConfig,
    options: &RunOptions,
) -> Result<RunReport, PipelineError> {
    let mut report: RunReport = RunReport::default();
    for job in Job::ALL {
        report
            .jobs
            .push(run_job(job, source, target, config, options)?);
    }
    if options.dry_run {
        info!("Dry run, backfill skipped");
    } else {
        report.backfill = Some(run_backfill(target)?);
    }
    Ok(report)
}

/// Runs one job with its own pair of connections, closed when it returns.
///
/// # Errors
///
/// Returns an error if either database cannot be opened or the job fails.
pub fn run_job_at(
    endpoints: &Endpoints,
    job: Job,
    config: &PipelineConfig,
    options: &RunOptions,
) -> Result<JobStats, PipelineError> {
    let mut source: SourceStore = endpoints.open_source()?;
    let mut target: TargetStore = endpoints.open_target()?;
    run_job(job, &mut source, &mut target, config, options)
}

/// Runs the whole pipeline, opening fresh connections for every job.
///
/// # Errors
///
/// Returns the first connection, job, or backfill failure.
pub fn run_all_at(
    endpoints: &Endpoints,
    config: &PipelineConfig,
    options: &RunOptions,
) -> Result<RunReport, PipelineError> {
    let mut report: RunReport = RunReport::default();
    for job in Job::ALL {
        report.jobs.push(run_job_at(endpoints, job, config, options)?);
    }
    if options.dry_run {
        info!("Dry run, backfill skipped");
    } else {
        let mut target: TargetStore = endpoints.open_target()?;
        report.backfill = Some(run_backfill(&mut target)?);
    }
    Ok(report)
}
