//! Epoch value classification and rendering.
//!
//! A numeric value is treated as a timestamp only if it lies after
//! 2000-01-01T00:00:00Z when read as seconds ([`SECONDS_THRESHOLD`]). Values
//! above [`MILLIS_THRESHOLD`] are read as milliseconds instead. Anything at or
//! below the seconds threshold is assumed to be a count or an identifier.
//!
//! # Example
//!
//! ```
//! use epoch_expander::epoch::{classify, Classification};
//!
//! assert_eq!(
//!     classify("1703980800").iso().as_deref(),
//!     Some("2023-12-31T00:00:00.000Z")
//! );
//! assert_eq!(classify("42"), Classification::NotATimestamp);
//! ```

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::fmt;

/// 2000-01-01T00:00:00Z in seconds since the Unix epoch.
pub const SECONDS_THRESHOLD: f64 = 946_684_800.0;

/// 2000-01-01T00:00:00Z in milliseconds since the Unix epoch.
pub const MILLIS_THRESHOLD: f64 = 946_684_800_000.0;

/// Largest accepted distance from the epoch, in milliseconds (100 million days).
///
/// chrono's own range ends earlier, near year 262142 (about 8.2e15 ms), so
/// [`millis_to_instant`] also rejects values between that limit and this one.
pub const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// ISO 8601 layout with millisecond precision and a literal UTC suffix.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Locale-style layout used for the human readable rendering.
pub const READABLE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Unit an epoch value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EpochUnit {
    Seconds,
    Milliseconds,
}

impl EpochUnit {
    /// Multiplier converting a value in this unit to milliseconds.
    #[must_use]
    pub fn millis_factor(self) -> f64 {
        match self {
            EpochUnit::Seconds => 1000.0,
            EpochUnit::Milliseconds => 1.0,
        }
    }
}

impl fmt::Display for EpochUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpochUnit::Seconds => write!(f, "seconds"),
            EpochUnit::Milliseconds => write!(f, "milliseconds"),
        }
    }
}

/// Outcome of testing a value against the epoch thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not parseable, not positive, too small, or not a representable date.
    NotATimestamp,
    /// A valid instant, with the unit the value was read in.
    Timestamp {
        unit: EpochUnit,
        instant: DateTime<Utc>,
    },
}

impl Classification {
    /// The instant, if the value was a timestamp.
    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Classification::Timestamp { instant, .. } => Some(*instant),
            Classification::NotATimestamp => None,
        }
    }

    /// The ISO 8601 rendering, if the value was a timestamp.
    #[must_use]
    pub fn iso(&self) -> Option<String> {
        self.instant().map(format_iso)
    }

    #[must_use]
    pub fn is_timestamp(&self) -> bool {
        matches!(self, Classification::Timestamp { .. })
    }
}

/// Zone used when rendering the human readable form of an instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadableZone {
    /// The machine's local zone.
    #[default]
    Local,
    /// UTC, which makes output independent of the machine.
    Utc,
}

/// Pick the unit for a value by magnitude, or `None` if it is not after 2000.
#[must_use]
pub fn detect_unit(value: f64) -> Option<EpochUnit> {
    if value > MILLIS_THRESHOLD {
        Some(EpochUnit::Milliseconds)
    } else if value > SECONDS_THRESHOLD {
        Some(EpochUnit::Seconds)
    } else {
        None
    }
}

/// Convert a millisecond count to an instant.
///
/// Fractional milliseconds are truncated toward zero. Returns `None` for
/// non-finite values and values outside the representable range.
#[must_use]
pub fn millis_to_instant(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() || millis.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

/// Classify a numeric value.
#[must_use]
pub fn classify_value(value: f64) -> Classification {
    // Also rejects NaN
    if !(value > 0.0) {
        return Classification::NotATimestamp;
    }

    let Some(unit) = detect_unit(value) else {
        return Classification::NotATimestamp;
    };

    match millis_to_instant(value * unit.millis_factor()) {
        Some(instant) => Classification::Timestamp { unit, instant },
        None => Classification::NotATimestamp,
    }
}

/// Read the longest numeric prefix of `text`.
///
/// Leading whitespace is skipped and anything after the number is ignored,
/// so `1703980800 UTC` reads as `1703980800`. Accepts an optional sign,
/// digits with an optional fraction, an optional exponent, and `Infinity`.
/// Returns `None` if `text` does not start with a number.
#[must_use]
pub fn parse_leading_float(text: &str) -> Option<f64> {
    const INFINITY: &str = "Infinity";

    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if text[end..].starts_with(INFINITY) {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    // An exponent only counts if at least one digit follows it
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    text[..end].parse().ok()
}

/// Classify a raw field value.
///
/// The value is read with [`parse_leading_float`]; text that does not start
/// with a number is [`Classification::NotATimestamp`].
#[must_use]
pub fn classify(raw: &str) -> Classification {
    parse_leading_float(raw).map_or(Classification::NotATimestamp, classify_value)
}

/// Return the ISO 8601 form of `raw`, or `raw` unchanged if it is not a timestamp.
#[must_use]
pub fn normalize(raw: &str) -> String {
    classify(raw).iso().unwrap_or_else(|| raw.to_string())
}

/// Render an instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
#[must_use]
pub fn format_iso(instant: DateTime<Utc>) -> String {
    instant.format(ISO_FORMAT).to_string()
}

/// Render an instant in a locale-style form such as `7/11/2025, 5:41:52 AM`.
#[must_use]
pub fn format_readable(instant: DateTime<Utc>, zone: ReadableZone) -> String {
    match zone {
        ReadableZone::Local => instant
            .with_timezone(&Local)
            .format(READABLE_FORMAT)
            .to_string(),
        ReadableZone::Utc => instant.format(READABLE_FORMAT).to_string(),
    }
}
