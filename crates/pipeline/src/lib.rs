// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Migration jobs from the legacy `system-smartpro` schema into
//! `clocking_reports`.
//!
//! Six jobs run in dependency order:
//!
//! 1. [`Job::Users`]
//! 2. [`Job::Projects`]
//! 3. [`Job::ProjectUsers`]
//! 4. [`Job::Categories`]
//! 5. [`Job::DailyActivities`]
//! 6. [`Job::ClockingActivities`]
//!
//! Each job reads its watermark, pulls a slice from the source, upserts
//! into the target inside one transaction, then advances the watermark.
//! Row-level data problems are counted in [`JobStats`] and never abort a
//! job. Only database failures become a [`PipelineError`].
//!
//! [`run_backfill`] normalizes `clocking_activities` after a batch.
//!
//! [`JobStats`]: clocking_domain::JobStats

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
#![allow(clippy::multiple_crate_versions)]

mod backfill;
mod error;
mod job;
mod jobs;
mod orchestrator;
mod resolver;
mod watermark;

#[cfg(test)]
mod tests;

pub use backfill::{BackfillReport, run_backfill};
pub use error::PipelineError;
pub use job::Job;
pub use orchestrator::{Endpoints, PipelineConfig, RunReport, run_all, run_all_at, run_job, run_job_at};
pub use watermark::Checkpoint;
