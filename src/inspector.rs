//! Standalone timestamp inspection.
//!
//! Turns one user-supplied epoch value into its local, UTC, ISO 8601 and
//! relative renderings. Unlike the CSV pipeline, the unit is picked by the
//! length of the input: up to ten characters is seconds, anything longer is
//! milliseconds. Invalid input is reported instead of being passed through.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use epoch_expander::inspector::inspect;
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let details = inspect("1703980800", now).unwrap();
//! assert_eq!(details.iso, "2023-12-31T00:00:00.000Z");
//! assert_eq!(details.relative, "1 days ago");
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::epoch::{format_iso, format_readable, millis_to_instant, EpochUnit, ReadableZone};
use crate::error::ExpanderError;

/// Inputs up to this many characters are read as seconds.
pub const SECONDS_MAX_LEN: usize = 10;

/// RFC 7231 style layout, e.g. `Sun, 31 Dec 2023 00:00:00 GMT`.
pub const UTC_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Every rendering of one inspected instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampDetails {
    /// The input as given (trimmed).
    pub input: String,
    /// Unit the input was read in.
    pub unit: EpochUnit,
    /// Whole seconds since the Unix epoch.
    pub epoch_seconds: i64,
    /// Milliseconds since the Unix epoch.
    pub epoch_millis: i64,
    /// ISO 8601 in UTC with milliseconds.
    pub iso: String,
    /// UTC in HTTP date style.
    pub utc: String,
    /// Locale-style local time.
    pub local: String,
    /// Distance from now, e.g. `3 hours ago`.
    pub relative: String,
}

impl fmt::Display for TimestampDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timestamp Details")?;
        writeln!(f, "=================")?;
        writeln!(f, "  Input:         {} ({})", self.input, self.unit)?;
        writeln!(f, "  Local time:    {}", self.local)?;
        writeln!(f, "  UTC time:      {}", self.utc)?;
        writeln!(f, "  ISO 8601:      {}", self.iso)?;
        writeln!(f, "  Relative:      {}", self.relative)?;
        writeln!(f, "  Unix seconds:  {}", self.epoch_seconds)?;
        writeln!(f, "  Unix millis:   {}", self.epoch_millis)?;
        Ok(())
    }
}

/// Inspect a user-supplied epoch value relative to `now`.
///
/// # Errors
///
/// Returns [`ExpanderError::InvalidTimestamp`] if the input is empty, not a
/// finite number, or outside the representable date range.
pub fn inspect(input: &str, now: DateTime<Utc>) -> Result<TimestampDetails, ExpanderError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExpanderError::InvalidTimestamp(
            "empty timestamp".to_string(),
        ));
    }

    let value: f64 = trimmed
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| ExpanderError::InvalidTimestamp(format!("{:?} is not a number", trimmed)))?;

    let unit = if trimmed.len() <= SECONDS_MAX_LEN {
        EpochUnit::Seconds
    } else {
        EpochUnit::Milliseconds
    };

    let instant = millis_to_instant(value * unit.millis_factor()).ok_or_else(|| {
        ExpanderError::InvalidTimestamp(format!("{:?} is outside the representable range", trimmed))
    })?;

    Ok(describe(trimmed, unit, instant, now))
}

/// Details for the current instant.
pub fn current(now: DateTime<Utc>) -> TimestampDetails {
    describe(
        &now.timestamp().to_string(),
        EpochUnit::Seconds,
        now,
        now,
    )
}

fn describe(
    input: &str,
    unit: EpochUnit,
    instant: DateTime<Utc>,
    now: DateTime<Utc>,
) -> TimestampDetails {
    TimestampDetails {
        input: input.to_string(),
        unit,
        epoch_seconds: instant.timestamp(),
        epoch_millis: instant.timestamp_millis(),
        iso: format_iso(instant),
        utc: instant.format(UTC_FORMAT).to_string(),
        local: format_readable(instant, ReadableZone::Local),
        relative: relative_time(instant, now),
    }
}

/// Describe how far `instant` lies from `now` in the largest fitting unit.
///
/// Differences are floored, so a value half a second in the future is
/// `1 seconds from now`.
#[must_use]
pub fn relative_time(instant: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - instant).num_milliseconds().div_euclid(1000);
    if seconds.abs() < 60 {
        return if seconds == 0 {
            "now".to_string()
        } else {
            phrase(seconds, "seconds")
        };
    }

    let minutes = seconds.div_euclid(60);
    if minutes.abs() < 60 {
        return phrase(minutes, "minutes");
    }

    let hours = minutes.div_euclid(60);
    if hours.abs() < 24 {
        return phrase(hours, "hours");
    }

    phrase(hours.div_euclid(24), "days")
}

fn phrase(amount: i64, unit: &str) -> String {
    let direction = if amount > 0 { "ago" } else { "from now" };
    format!("{} {} {}", amount.abs(), unit, direction)
}
