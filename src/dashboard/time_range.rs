use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone};
use std::fmt;
use std::str::FromStr;

/// Wire format of the `start_date` / `end_date` query parameters (local clock, no zone).
pub const WINDOW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time-Range Filter state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeRange {
    /// Last 24 hours
    Day,
    /// Last 7 days
    #[default]
    Week,
}

impl TimeRange {
    pub const ALL: [Self; 2] = [Self::Day, Self::Week];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }

    #[must_use]
    pub fn span(self) -> TimeDelta {
        match self {
            Self::Day => TimeDelta::hours(24),
            Self::Week => TimeDelta::days(7),
        }
    }

    /// Query window ending at `now`.
    #[must_use]
    pub fn window(self, now: NaiveDateTime) -> TimeWindow {
        TimeWindow {
            start: now - self.span(),
            end: now,
        }
    }

    /// Chart axis label for a sample time.
    ///
    /// Day view shows `HH:MM`; week view prefixes the short date (`Jan 5 14:30`).
    #[must_use]
    pub fn format_label<Tz>(self, time: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            Self::Day => time.format("%H:%M").to_string(),
            Self::Week => time.format("%b %-d %H:%M").to_string(),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time range {0:?} (expected \"day\" or \"week\")")]
pub struct ParseTimeRangeError(pub String);

impl FromStr for TimeRange {
    type Err = ParseTimeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "24h" => Ok(Self::Day),
            "week" | "7d" => Ok(Self::Week),
            other => Err(ParseTimeRangeError(other.to_string())),
        }
    }
}

/// `[start, end)` interval used to query historical samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    #[must_use]
    pub fn start_param(&self) -> String {
        self.start.format(WINDOW_FORMAT).to_string()
    }

    #[must_use]
    pub fn end_param(&self) -> String {
        self.end.format(WINDOW_FORMAT).to_string()
    }

    #[must_use]
    pub fn span(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Parse a sample timestamp into `tz`.
///
/// Zoned RFC 3339 values are converted; naive values are taken as wall-clock
/// time in `tz`, which is how the backend stores them.
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Some(zoned.with_timezone(tz));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}

/// Axis label for a raw sample timestamp; unparseable input is shown verbatim.
pub fn sample_label<Tz>(raw: &str, range: TimeRange, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match parse_timestamp(raw, tz) {
        Some(time) => range.format_label(&time),
        None => {
            tracing::debug!(timestamp = %raw, "Unparseable sample timestamp");
            raw.to_string()
        }
    }
}
