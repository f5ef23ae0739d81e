//! Unit tests for the time-range filter and timestamp labels.
//!
//! Run with: cargo test --test time_range_test

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};

use telemetry_dash::dashboard::TimeRange;
use telemetry_dash::dashboard::time_range::{parse_timestamp, sample_label};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, s))
        .expect("valid date")
}

#[test]
fn window_ends_now_and_spans_the_range() {
    let now = at(2024, 3, 10, 14, 30, 5);

    let day = TimeRange::Day.window(now);
    assert_eq!(day.end, now);
    assert_eq!(day.start, now - TimeDelta::hours(24));
    assert_eq!(day.start_param(), "2024-03-09 14:30:05");
    assert_eq!(day.end_param(), "2024-03-10 14:30:05");

    let week = TimeRange::Week.window(now);
    assert_eq!(week.end, now);
    assert_eq!(week.span(), TimeDelta::days(7));
    assert_eq!(week.start_param(), "2024-03-03 14:30:05");
}

#[test]
fn window_crosses_month_and_year_boundaries() {
    let now = at(2024, 1, 3, 0, 0, 0);
    assert_eq!(TimeRange::Week.window(now).start_param(), "2023-12-27 00:00:00");
    assert_eq!(TimeRange::Day.window(now).start_param(), "2024-01-02 00:00:00");
}

#[test]
fn default_range_is_week() {
    assert_eq!(TimeRange::default(), TimeRange::Week);
}

#[test]
fn range_parses_from_text() {
    assert_eq!("day".parse::<TimeRange>(), Ok(TimeRange::Day));
    assert_eq!(" WEEK ".parse::<TimeRange>(), Ok(TimeRange::Week));
    assert_eq!("24h".parse::<TimeRange>(), Ok(TimeRange::Day));
    assert!("month".parse::<TimeRange>().is_err());
    assert_eq!(TimeRange::Day.to_string(), "day");
}

#[test]
fn labels_depend_on_range() {
    let time = Utc.with_ymd_and_hms(2024, 1, 5, 14, 30, 0).unwrap();
    assert_eq!(TimeRange::Day.format_label(&time), "14:30");
    assert_eq!(TimeRange::Week.format_label(&time), "Jan 5 14:30");
}

#[test]
fn timestamps_accept_backend_and_rfc3339_formats() {
    let expected = Utc.with_ymd_and_hms(2024, 1, 1, 8, 5, 0).unwrap();

    assert_eq!(parse_timestamp("2024-01-01 08:05:00", &Utc), Some(expected));
    assert_eq!(parse_timestamp("2024-01-01T08:05:00", &Utc), Some(expected));
    assert_eq!(parse_timestamp("2024-01-01T08:05:00Z", &Utc), Some(expected));
    assert_eq!(parse_timestamp("2024-01-01T10:05:00+02:00", &Utc), Some(expected));
    assert_eq!(parse_timestamp("yesterday", &Utc), None);
}

#[test]
fn unparseable_timestamp_is_shown_verbatim() {
    assert_eq!(sample_label("not a time", TimeRange::Day, &Utc), "not a time");
    assert_eq!(sample_label("2024-01-01 08:05:00", TimeRange::Day, &Utc), "08:05");
}
