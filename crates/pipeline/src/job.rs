// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use crate::error::PipelineError;

/// One migration job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Job {
    Users,
    Projects,
    ProjectUsers,
    Categories,
    DailyActivities,
    ClockingActivities,
}

impl Job {
    /// Every job in dependency order.
    pub const ALL: [Self; 6] = [
        Self::Users,
        Self::Projects,
        Self::ProjectUsers,
        Self::Categories,
        Self::DailyActivities,
        Self::ClockingActivities,
    ];

    /// The name accepted on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Projects => "projects",
            Self::ProjectUsers => "project-users",
            Self::Categories => "categories",
            Self::DailyActivities => "daily-activities",
            Self::ClockingActivities => "clocking-activities",
        }
    }

    /// The `migration_state.job_name` this job stores its watermark under.
    #[must_use]
    pub const fn watermark_name(&self) -> &'static str {
        match self {
            Self::Users => "ss_user",
            Self::Projects => "ss_project_management",
            Self::ProjectUsers => "ss_project_members",
            Self::Categories => "ss_category_clocking",
            Self::DailyActivities => "ss_daily_activity",
            Self::ClockingActivities => "ss_daily_activity_clocking",
        }
    }

    /// Whether the source slice is keyed by id rather than by change timestamp.
    #[must_use]
    pub const fn is_keyed_by_id(&self) -> bool {
        matches!(self, Self::Categories)
    }
}

impl std::fmt::Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Job {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle: String = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|job| job.name() == needle || job.watermark_name() == s.trim())
            .ok_or_else(|| PipelineError::UnknownJob(s.to_string()))
    }
}
