// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Post-migration normalization of `clocking_activities`.
//!
//! Four bulk updates run in order inside one transaction:
//!
//! 1. derive `NULL` durations from complete, non-inverted intervals
//! 2. map `NULL`/`0` task ids from the activity label
//! 3. turn any remaining `task_id = 0` into `NULL`
//! 4. default any remaining `NULL` duration to `0`
//!
//! Every step only matches rows that are not yet normalized, so a second
//! run changes nothing.

use clocking_domain::TASK_LABELS;
use clocking_persistence::{ClockingHealth, TargetStore};
use tracing::{info, warn};

use crate::error::PipelineError;

/// Rows touched by each backfill step plus the remaining health counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub durations_derived: usize,
    pub tasks_mapped: usize,
    pub zero_tasks_cleared: usize,
    pub durations_defaulted: usize,
    /// Rows with `NULL` duration whose end precedes their start. Step 1
    /// skips them and step 4 sets them to zero.
    pub inverted_intervals: i64,
    pub remaining: ClockingHealth,
}

impl BackfillReport {
    /// Total rows changed by the four steps.
    #[must_use]
    pub const fn rows_changed(&self) -> usize {
        self.durations_derived + self.tasks_mapped + self.zero_tasks_cleared + self.durations_defaulted
    }
}

impl std::fmt::Display for BackfillReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "backfill: durations_derived={} tasks_mapped={} zero_tasks_cleared={} \
             durations_defaulted={} inverted_intervals={} \
             remaining[task_id=0: {}, task_id NULL: {}, duration NULL: {}]",
            self.durations_derived,
            self.tasks_mapped,
            self.zero_tasks_cleared,
            self.durations_defaulted,
            self.inverted_intervals,
            self.remaining.zero_task_ids,
            self.remaining.null_task_ids,
            self.remaining.null_durations,
        )
    }
}

/// Runs the backfill pass.
///
/// # Errors
///
/// Returns an error if any statement fails. All four steps are rolled
/// back together.
pub fn run_backfill(target: &mut TargetStore) -> Result<BackfillReport, PipelineError> {
    info!("Starting backfill");

    let mut report: BackfillReport = target.transaction(|target| {
        let inverted_intervals: i64 = target.count_inverted_intervals()?;
        let durations_derived: usize = target.derive_missing_durations()?;

        let mut tasks_mapped: usize = 0;
        for (label, task_id) in TASK_LABELS {
            tasks_mapped += target.map_task_label(label, *task_id)?;
        }

        let zero_tasks_cleared: usize = target.clear_zero_task_ids()?;
        let durations_defaulted: usize = target.default_missing_durations()?;

        Ok::<BackfillReport, PipelineError>(BackfillReport {
            durations_derived,
            tasks_mapped,
            zero_tasks_cleared,
            durations_defaulted,
            inverted_intervals,
            remaining: ClockingHealth::default(),
        })
    })?;

    report.remaining = target.inspect_clocking_health()?;

    if report.inverted_intervals > 0 {
        warn!(
            rows = report.inverted_intervals,
            "Clocking rows end before they start, duration set to 0"
        );
    }
    info!("{report}");

    Ok(report)
}
