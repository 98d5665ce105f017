// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Date/time parsing and duration derivation for clocking entries.
//!
//! Legacy JSON payloads carry dates and times as loose strings
//! (`"2024-01-01"`, `"09:00"`, `"09:00:00"`). These helpers parse them
//! leniently: anything unparseable is treated as absent rather than as
//! an error, because a missing bound only means the duration stays
//! unknown until the backfill pass.

use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

use crate::error::DomainError;

fn parse_date_str(value: &str) -> Option<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).ok()
}

/// A start/end pair split into separate date and time parts, matching the
/// `clocking_activities` column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interval {
    pub start_date: Option<Date>,
    pub start_time: Option<Time>,
    pub end_date: Option<Date>,
    pub end_time: Option<Time>,
}

impl Interval {
    /// Builds an interval from two optional timestamps.
    #[must_use]
    pub fn from_timestamps(
        start: Option<PrimitiveDateTime>,
        end: Option<PrimitiveDateTime>,
    ) -> Self {
        let (start_date, start_time) = split_timestamp(start);
        let (end_date, end_time) = split_timestamp(end);
        Self {
            start_date,
            start_time,
            end_date,
            end_time,
        }
    }

    /// Combined start, present only when both parts are known.
    #[must_use]
    pub fn start(&self) -> Option<PrimitiveDateTime> {
        Some(PrimitiveDateTime::new(self.start_date?, self.start_time?))
    }

    /// Combined end, present only when both parts are known.
    #[must_use]
    pub fn end(&self) -> Option<PrimitiveDateTime> {
        Some(PrimitiveDateTime::new(self.end_date?, self.end_time?))
    }

    /// Whole minutes between start and end, truncated toward zero.
    ///
    /// Returns `None` unless all four parts are present. The result may be
    /// negative when the end precedes the start.
    #[must_use]
    pub fn minutes(&self) -> Option<i64> {
        Some(derive_duration_minutes(self.start()?, self.end()?))
    }
}

/// Whole minutes from `start` to `end`, truncated toward zero.
#[must_use]
pub fn derive_duration_minutes(start: PrimitiveDateTime, end: PrimitiveDateTime) -> i64 {
    let delta: time::Duration = end - start;
    delta.whole_minutes()
}

/// Splits an optional timestamp into its date and time parts.
#[must_use]
pub fn split_timestamp(ts: Option<PrimitiveDateTime>) -> (Option<Date>, Option<Time>) {
    ts.map_or((None, None), |value| (Some(value.date()), Some(value.time())))
}

/// Parses a `YYYY-MM-DD` date, returning `None` when absent or malformed.
#[must_use]
pub fn parse_date(raw: Option<&str>) -> Option<Date> {
    let trimmed: &str = raw?.trim();
    // Some payloads carry a full timestamp in the date slot.
    let date_part: &str = trimmed.get(..10).unwrap_or(trimmed);
    parse_date_str(date_part)
}

/// Parses an `HH:MM[:SS[.fff]]` time, returning `None` when absent or malformed.
#[must_use]
pub fn parse_time(raw: Option<&str>) -> Option<Time> {
    let trimmed: &str = raw?.trim();
    Time::parse(trimmed, format_description!("[hour]:[minute]:[second]"))
        .or_else(|_| {
            Time::parse(
                trimmed,
                format_description!("[hour]:[minute]:[second].[subsecond]"),
            )
        })
        .or_else(|_| Time::parse(trimmed, format_description!("[hour]:[minute]")))
        .ok()
}

/// Parses an operator-supplied cutoff.
///
/// Accepts `YYYY-MM-DD` (midnight), `YYYY-MM-DD HH:MM:SS` and the same with
/// a `T` separator.
///
/// # Errors
///
/// Returns [`DomainError::InvalidTimestamp`] if the value matches none of
/// the accepted shapes.
pub fn parse_since(raw: &str) -> Result<PrimitiveDateTime, DomainError> {
    let trimmed: &str = raw.trim();
    let invalid = || DomainError::InvalidTimestamp(raw.to_string());

    if trimmed.len() == 10 {
        let date: Date = parse_date_str(trimmed).ok_or_else(invalid)?;
        return Ok(PrimitiveDateTime::new(date, Time::MIDNIGHT));
    }

    let (date_part, time_part) = trimmed
        .split_once(' ')
        .or_else(|| trimmed.split_once('T'))
        .ok_or_else(invalid)?;
    let date: Date = parse_date_str(date_part).ok_or_else(invalid)?;
    let time: Time = parse_time(Some(time_part)).ok_or_else(invalid)?;
    Ok(PrimitiveDateTime::new(date, time))
}
