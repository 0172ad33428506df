//! Header-driven column classification.
//!
//! Each header is tested against two independent naming rules. A header can
//! match both, in which case it produces two [`ColumnSpec`]s for the same
//! index and both strategies are applied to that column.

use serde::Serialize;
use std::fmt;

/// Substrings marking a column that holds a bare epoch value.
pub const SIMPLE_MARKERS: [&str; 5] = [
    "createdat",
    "updatedat",
    "closedat",
    "processedat",
    "cancelledat",
];

/// Substring marking a column that holds JSON with embedded timestamps.
pub const JSON_MARKER: &str = "timestamp";

/// Exact header naming a JSON column that does not contain [`JSON_MARKER`].
pub const TRACKING_HISTORY: &str = "trackinghistory";

/// How a timestamp column is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// The field holds a bare epoch value; the ISO form goes in a new trailing column.
    Simple,
    /// The field holds JSON; numeric timestamps inside are expanded in place.
    JsonEmbedded,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Simple => write!(f, "simple"),
            ColumnKind::JsonEmbedded => write!(f, "json"),
        }
    }
}

/// A column selected for timestamp conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    /// Zero-based position of the column in the header.
    pub index: usize,
    /// Header text with quotes stripped and whitespace trimmed.
    pub name: String,
    /// Conversion strategy.
    pub kind: ColumnKind,
}

impl ColumnSpec {
    /// Name of the trailing column a [`ColumnKind::Simple`] spec appends.
    #[must_use]
    pub fn converted_name(&self) -> String {
        format!("{}_converted", self.name)
    }
}

/// Strip every double quote and trim surrounding whitespace.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    raw.replace('"', "").trim().to_string()
}

/// Classify a single header entry.
///
/// Returns zero, one or two specs. When both rules match, the
/// [`ColumnKind::Simple`] spec comes first.
#[must_use]
pub fn classify_column(index: usize, raw: &str) -> Vec<ColumnSpec> {
    let name = normalize_header(raw);
    let key = name.to_lowercase();
    let mut specs = Vec::new();

    if SIMPLE_MARKERS.iter().any(|marker| key.contains(marker)) {
        specs.push(ColumnSpec {
            index,
            name: name.clone(),
            kind: ColumnKind::Simple,
        });
    }

    // `contains` already covers an exact "timestamp"
    if key == TRACKING_HISTORY || key.contains(JSON_MARKER) {
        specs.push(ColumnSpec {
            index,
            name,
            kind: ColumnKind::JsonEmbedded,
        });
    }

    specs
}

/// Classify every entry of a header, left to right.
#[must_use]
pub fn classify_header<S: AsRef<str>>(header: &[S]) -> Vec<ColumnSpec> {
    header
        .iter()
        .enumerate()
        .flat_map(|(index, raw)| classify_column(index, raw.as_ref()))
        .collect()
}
