// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Embedded JSON sub-records from the legacy schema.
//!
//! Three source columns model one-to-many relations inline:
//!
//! - `ss_daily_activity.da_clocking`: a list of clocking entries
//! - `ss_daily_activity.da_data`: an object carrying the owner's `id_key`
//! - `ss_project_management.pr_members`: an object of members keyed by `id_key`
//!
//! Every parser here degrades instead of failing. An absent payload
//! (`NULL`, empty string, or the literal `null`) is [`Parsed::Empty`];
//! malformed JSON or an unexpected shape is [`Parsed::Invalid`], which the
//! caller counts as a data-quality issue and treats as "no entries".

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::interval::{Interval, parse_date, parse_time};
use crate::mapping::task_id_for_label;

/// Outcome of parsing an embedded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<T> {
    /// The column held no payload.
    Empty,
    /// The payload parsed. `rejected` counts sub-records that had the wrong shape.
    Entries { items: Vec<T>, rejected: usize },
    /// The payload was not valid JSON or not the expected container type.
    Invalid(String),
}

impl<T> Parsed<T> {
    /// The parsed items, or an empty list for `Empty` and `Invalid`.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Entries { items, .. } => items,
            Self::Empty | Self::Invalid(_) => Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    #[must_use]
    pub const fn rejected(&self) -> usize {
        match self {
            Self::Entries { rejected, .. } => *rejected,
            Self::Empty | Self::Invalid(_) => 0,
        }
    }
}

fn is_blank_payload(raw: Option<&str>) -> bool {
    raw.is_none_or(|value| {
        let trimmed: &str = value.trim();
        trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null")
    })
}

/// Accepts a JSON number, a numeric string, or null.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            #[allow(clippy::cast_possible_truncation)]
            n.as_f64().map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

/// Accepts a JSON string, a number (stringified), or null.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// One element of `da_clocking`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClockingEntry {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub task_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub activity: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub duration: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub category_id: Option<i64>,
}

impl ClockingEntry {
    /// The entry's interval with each part parsed leniently.
    #[must_use]
    pub fn interval(&self) -> Interval {
        Interval {
            start_date: parse_date(self.start_date.as_deref()),
            start_time: parse_time(self.start_time.as_deref()),
            end_date: parse_date(self.end_date.as_deref()),
            end_time: parse_time(self.end_time.as_deref()),
        }
    }

    /// Explicit duration, else minutes between the combined start and end.
    ///
    /// The derived value may be negative; callers decide how to treat it.
    #[must_use]
    pub fn duration_minutes(&self) -> Option<i64> {
        self.duration.or_else(|| self.interval().minutes())
    }

    /// Explicit task id, else the id mapped from the activity label.
    ///
    /// Task `0` means "no task" in the legacy payloads and is treated as absent.
    #[must_use]
    pub fn resolved_task_id(&self) -> Option<i64> {
        self.task_id
            .filter(|task_id| *task_id != 0)
            .or_else(|| self.activity.as_deref().and_then(task_id_for_label))
    }

    /// Explicit category, else the resolved task id, else `default_category`.
    ///
    /// The result is not yet checked against the target category set.
    #[must_use]
    pub fn candidate_category_id(&self, default_category: i64) -> i64 {
        self.category_id
            .or_else(|| self.resolved_task_id())
            .unwrap_or(default_category)
    }
}

/// Parses `da_clocking`.
#[must_use]
pub fn parse_clocking_entries(raw: Option<&str>) -> Parsed<ClockingEntry> {
    if is_blank_payload(raw) {
        return Parsed::Empty;
    }
    let text: &str = raw.unwrap_or_default();

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return Parsed::Invalid(e.to_string()),
    };

    let Value::Array(elements) = value else {
        return Parsed::Invalid(String::from("expected a JSON array of clocking entries"));
    };

    let mut items: Vec<ClockingEntry> = Vec::with_capacity(elements.len());
    let mut rejected: usize = 0;
    for element in elements {
        if !element.is_object() {
            rejected += 1;
            continue;
        }
        match serde_json::from_value::<ClockingEntry>(element) {
            Ok(entry) => items.push(entry),
            Err(_) => rejected += 1,
        }
    }

    Parsed::Entries { items, rejected }
}

/// A member record from `pr_members`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectMember {
    /// The object key the member was stored under.
    #[serde(skip)]
    pub id_key: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub jabatan: Option<String>,
}

impl ProjectMember {
    /// The member email, ignoring blank strings.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// Display name for a synthesized user: nickname, else the key.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id_key)
    }
}

/// Parses `pr_members`, an object keyed by `id_key`.
#[must_use]
pub fn parse_members(raw: Option<&str>) -> Parsed<ProjectMember> {
    if is_blank_payload(raw) {
        return Parsed::Empty;
    }
    let text: &str = raw.unwrap_or_default();

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return Parsed::Invalid(e.to_string()),
    };

    let Value::Object(map) = value else {
        return Parsed::Invalid(String::from("expected a JSON object keyed by id_key"));
    };

    let mut items: Vec<ProjectMember> = Vec::with_capacity(map.len());
    let mut rejected: usize = 0;
    for (id_key, member) in map {
        if !member.is_object() {
            rejected += 1;
            continue;
        }
        match serde_json::from_value::<ProjectMember>(member) {
            Ok(mut parsed) => {
                parsed.id_key = id_key;
                items.push(parsed);
            }
            Err(_) => rejected += 1,
        }
    }

    Parsed::Entries { items, rejected }
}

/// The `da_data` object on a daily activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActivityData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id_key: Option<String>,
}

impl ActivityData {
    /// The owner key, ignoring blank strings.
    #[must_use]
    pub fn id_key(&self) -> Option<&str> {
        self.id_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

/// Parses `da_data`.
#[must_use]
pub fn parse_activity_data(raw: Option<&str>) -> Parsed<ActivityData> {
    if is_blank_payload(raw) {
        return Parsed::Empty;
    }
    let text: &str = raw.unwrap_or_default();

    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => match serde_json::from_value::<ActivityData>(value) {
            Ok(data) => Parsed::Entries {
                items: vec![data],
                rejected: 0,
            },
            Err(e) => Parsed::Invalid(e.to_string()),
        },
        Ok(_) => Parsed::Invalid(String::from("expected a JSON object")),
        Err(e) => Parsed::Invalid(e.to_string()),
    }
}
