// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, Interval, parse_date, parse_since, parse_time, split_timestamp};
use time::macros::{date, datetime, time};

#[test]
fn test_interval_minutes_ninety() {
    let interval: Interval = Interval {
        start_date: Some(date!(2024 - 01 - 01)),
        start_time: Some(time!(9:00)),
        end_date: Some(date!(2024 - 01 - 01)),
        end_time: Some(time!(10:30)),
    };
    assert_eq!(interval.minutes(), Some(90));
}

#[test]
fn test_interval_across_midnight() {
    let interval: Interval = Interval::from_timestamps(
        Some(datetime!(2024-01-01 23:15)),
        Some(datetime!(2024-01-02 0:45)),
    );
    assert_eq!(interval.minutes(), Some(90));
}

#[test]
fn test_interval_truncates_partial_minutes() {
    let interval: Interval = Interval::from_timestamps(
        Some(datetime!(2024-01-01 9:00:00)),
        Some(datetime!(2024-01-01 9:01:59)),
    );
    assert_eq!(interval.minutes(), Some(1));
}

#[test]
fn test_interval_requires_all_parts() {
    let interval: Interval = Interval {
        start_date: Some(date!(2024 - 01 - 01)),
        start_time: None,
        end_date: Some(date!(2024 - 01 - 01)),
        end_time: Some(time!(10:30)),
    };
    assert_eq!(interval.minutes(), None);
}

#[test]
fn test_inverted_interval_is_negative() {
    let interval: Interval = Interval::from_timestamps(
        Some(datetime!(2024-01-01 10:00)),
        Some(datetime!(2024-01-01 9:00)),
    );
    assert_eq!(interval.minutes(), Some(-60));
}

#[test]
fn test_split_timestamp() {
    assert_eq!(
        split_timestamp(Some(datetime!(2024-03-04 08:15:00))),
        (Some(date!(2024 - 03 - 04)), Some(time!(8:15)))
    );
    assert_eq!(split_timestamp(None), (None, None));
}

#[test]
fn test_lenient_date_and_time_parsing() {
    assert_eq!(parse_date(Some("2024-01-01")), Some(date!(2024 - 01 - 01)));
    assert_eq!(
        parse_date(Some("2024-01-01 09:00:00")),
        Some(date!(2024 - 01 - 01))
    );
    assert_eq!(parse_date(Some("01/02/2024")), None);
    assert_eq!(parse_date(None), None);

    assert_eq!(parse_time(Some("09:00:00")), Some(time!(9:00)));
    assert_eq!(parse_time(Some("09:00")), Some(time!(9:00)));
    assert_eq!(parse_time(Some("09:00:00.500")), Some(time!(9:00:00.5)));
    assert_eq!(parse_time(Some("nine")), None);
}

#[test]
fn test_parse_since_accepts_date_and_datetime() {
    assert_eq!(parse_since("2024-05-01").unwrap(), datetime!(2024-05-01 0:00));
    assert_eq!(
        parse_since("2024-05-01 13:45:10").unwrap(),
        datetime!(2024-05-01 13:45:10)
    );
    assert_eq!(
        parse_since("2024-05-01T13:45:10").unwrap(),
        datetime!(2024-05-01 13:45:10)
    );
}

#[test]
fn test_parse_since_rejects_garbage() {
    assert_eq!(
        parse_since("last week"),
        Err(DomainError::InvalidTimestamp(String::from("last week")))
    );
}
