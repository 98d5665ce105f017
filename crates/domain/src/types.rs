// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::PrimitiveDateTime;

/// Project lifecycle status in the reporting schema.
///
/// The legacy system stores a single-letter code; anything it does not
/// recognise (including a missing code) becomes [`ProjectStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Progress,
    Finished,
    Initial,
    Cancelled,
    Unknown,
}

impl ProjectStatus {
    /// Maps a legacy `pr_status` code. Matching is case-insensitive.
    #[must_use]
    pub fn from_legacy_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some("p") => Self::Progress,
            Some("f") => Self::Finished,
            Some("i") => Self::Initial,
            Some("c") => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Progress => "progress",
            Self::Finished => "finished",
            Self::Initial => "initial",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Daily activity priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Maps a legacy `da_priority` code (`H`, `M`, `L`).
    ///
    /// Returns `None` for anything else so the target column stays `NULL`.
    #[must_use]
    pub fn from_legacy_code(code: Option<&str>) -> Option<Self> {
        match code.map(str::trim) {
            Some("H") => Some(Self::High),
            Some("M") => Some(Self::Medium),
            Some("L") => Some(Self::Low),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a job selects its source slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MigrationMode {
    /// Only rows changed since the watermark (or an explicit cutoff).
    #[default]
    Incremental,
    /// Every source row, ignoring the watermark.
    Full,
}

impl MigrationMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Incremental => "incremental",
            Self::Full => "full",
        }
    }
}

impl FromStr for MigrationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "incremental" => Ok(Self::Incremental),
            "full" => Ok(Self::Full),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for MigrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options accepted by every migration job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub mode: MigrationMode,
    /// Explicit cutoff; overrides the stored watermark in incremental mode.
    pub since: Option<PrimitiveDateTime>,
    /// Cap on the number of source rows read.
    pub limit: Option<i64>,
    /// Compute and report without writing or advancing the watermark.
    pub dry_run: bool,
}

impl RunOptions {
    #[must_use]
    pub const fn full() -> Self {
        Self {
            mode: MigrationMode::Full,
            since: None,
            limit: None,
            dry_run: false,
        }
    }

    #[must_use]
    pub const fn incremental() -> Self {
        Self {
            mode: MigrationMode::Incremental,
            since: None,
            limit: None,
            dry_run: false,
        }
    }

    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub const fn with_since(mut self, since: Option<PrimitiveDateTime>) -> Self {
        self.since = since;
        self
    }

    /// Sets the row cap.
    ///
    /// # Errors
    ///
    /// Returns an error if `limit` is zero or negative.
    pub fn with_limit(mut self, limit: Option<i64>) -> Result<Self, DomainError> {
        if let Some(value) = limit
            && value <= 0
        {
            return Err(DomainError::InvalidLimit(value));
        }
        self.limit = limit;
        Ok(self)
    }

    #[must_use]
    pub fn is_incremental(&self) -> bool {
        self.mode == MigrationMode::Incremental
    }
}
