// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors raised while interpreting operator input or legacy values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The migration mode is neither `incremental` nor `full`.
    InvalidMode(String),
    /// A cutoff timestamp could not be parsed.
    InvalidTimestamp(String),
    /// A row limit of zero was requested.
    InvalidLimit(i64),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMode(mode) => {
                write!(f, "Invalid migration mode '{mode}': expected incremental or full")
            }
            Self::InvalidTimestamp(value) => write!(
                f,
                "Invalid timestamp '{value}': expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"
            ),
            Self::InvalidLimit(limit) => write!(f, "Invalid limit {limit}: must be positive"),
        }
    }
}

impl std::error::Error for DomainError {}
