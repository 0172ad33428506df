//! CSV Structure Analysis Module
//!
//! Produces a read-only report about a CSV export before it is converted:
//! how many records and columns it has, which records do not match the
//! header width, which columns will be treated as timestamps, and what the
//! JSON in embedded timestamp columns looks like.
//!
//! The report reads the file with the `csv` crate (RFC 4180, multi-line
//! quoted fields allowed), so ragged records it finds point at rows the
//! line-based converter will pad.
//!
//! # Example
//!
//! ```
//! use epoch_expander::analyzer::analyze;
//!
//! let report = analyze("id,createdAt\n1,1703980800\n2").unwrap();
//! assert_eq!(report.total_records, 2);
//! assert_eq!(report.ragged_records, 1);
//! println!("{}", report);
//! ```

use csv::ReaderBuilder;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::csv_handler::{classify_header, ColumnKind, ColumnSpec};
use crate::epoch::SECONDS_THRESHOLD;
use crate::error::ExpanderError;
use crate::json_rewriter::unwrap_csv_quotes;

/// What the first non-blank value of a JSON timestamp column looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonColumnSample {
    /// Column name.
    pub column: String,
    /// Column position.
    pub index: usize,
    /// First non-blank, non-`null` value, if any.
    pub sample: Option<String>,
    /// Whether the sample parses as JSON.
    pub parses: bool,
    /// Keys of the sample if it is an object.
    pub top_level_keys: Vec<String>,
    /// Numeric leaves in the sample that would be expanded.
    pub timestamp_values: usize,
}

/// Structure of a CSV export.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StructureReport {
    /// Header names as read.
    pub headers: Vec<String>,
    /// Data records (header excluded, blank lines skipped).
    pub total_records: u64,
    /// Number of records whose field count differs from the header.
    pub ragged_records: u64,
    /// Line numbers where ragged records start.
    pub ragged_lines: Vec<u64>,
    /// Columns selected for timestamp conversion.
    pub timestamp_columns: Vec<ColumnSpec>,
    /// Samples for embedded JSON columns.
    pub json_samples: Vec<JsonColumnSample>,
}

impl StructureReport {
    /// Number of header columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

impl fmt::Display for StructureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CSV Structure Report")?;
        writeln!(f, "====================")?;
        writeln!(f, "  Total records:     {:>10}", self.total_records)?;
        writeln!(f, "  Columns:           {:>10}", self.column_count())?;
        writeln!(f, "  Ragged records:    {:>10}", self.ragged_records)?;

        writeln!(f)?;
        if self.timestamp_columns.is_empty() {
            writeln!(f, "No timestamp columns detected.")?;
            writeln!(f, "Available columns:")?;
            for header in &self.headers {
                writeln!(f, "  - {}", header)?;
            }
        } else {
            writeln!(f, "Timestamp columns:")?;
            for spec in &self.timestamp_columns {
                writeln!(f, "  [{}] {} ({})", spec.index, spec.name, spec.kind)?;
            }
        }

        if !self.json_samples.is_empty() {
            writeln!(f)?;
            writeln!(f, "JSON samples:")?;
            for sample in &self.json_samples {
                match (&sample.sample, sample.parses) {
                    (None, _) => writeln!(f, "  {}: no values", sample.column)?,
                    (Some(_), true) => writeln!(
                        f,
                        "  {}: valid JSON, keys [{}], {} timestamp values",
                        sample.column,
                        sample.top_level_keys.join(", "),
                        sample.timestamp_values
                    )?,
                    (Some(raw), false) => writeln!(
                        f,
                        "  {}: invalid JSON: {}",
                        sample.column,
                        preview(raw)
                    )?,
                }
            }
        }

        if !self.ragged_lines.is_empty() {
            writeln!(f)?;
            writeln!(f, "Ragged records:")?;
            for line in &self.ragged_lines {
                writeln!(f, "  Line {}", line)?;
            }
        }

        Ok(())
    }
}

/// Analyze the structure of a CSV buffer.
///
/// # Errors
///
/// Returns [`ExpanderError::EmptyInput`] if there is no header record and
/// [`ExpanderError::Csv`] if the reader fails.
pub fn analyze(text: &str) -> Result<StructureReport, ExpanderError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut report = StructureReport::default();
    let mut header_read = false;
    let mut samples: Vec<JsonColumnSample> = Vec::new();

    for result in reader.records() {
        let record = result?;
        if is_blank(&record) {
            continue;
        }

        if !header_read {
            report.headers = record.iter().map(str::to_string).collect();
            report.timestamp_columns = classify_header(&report.headers);
            samples = report
                .timestamp_columns
                .iter()
                .filter(|spec| spec.kind == ColumnKind::JsonEmbedded)
                .map(|spec| JsonColumnSample {
                    column: spec.name.clone(),
                    index: spec.index,
                    sample: None,
                    parses: false,
                    top_level_keys: Vec::new(),
                    timestamp_values: 0,
                })
                .collect();
            header_read = true;
            continue;
        }

        report.total_records += 1;
        if record.len() != report.headers.len() {
            report.ragged_records += 1;
            report
                .ragged_lines
                .push(record.position().map_or(0, |p| p.line()));
        }

        for sample in samples.iter_mut().filter(|s| s.sample.is_none()) {
            if let Some(value) = record.get(sample.index).map(str::trim) {
                if !value.is_empty() && value != "null" {
                    fill_sample(sample, value);
                }
            }
        }
    }

    if !header_read {
        return Err(ExpanderError::EmptyInput);
    }

    report.json_samples = samples;
    Ok(report)
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty()) && record.len() <= 1
}

fn fill_sample(sample: &mut JsonColumnSample, value: &str) {
    sample.sample = Some(value.to_string());
    if let Ok(parsed) = serde_json::from_str::<Value>(&unwrap_csv_quotes(value)) {
        sample.parses = true;
        if let Value::Object(map) = &parsed {
            sample.top_level_keys = map.keys().cloned().collect();
        }
        sample.timestamp_values = count_timestamps(&parsed);
    }
}

/// Count numeric leaves that the rewriter would replace.
fn count_timestamps(value: &Value) -> usize {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map_or(0, |v| usize::from(v > SECONDS_THRESHOLD)),
        Value::Array(items) => items.iter().map(count_timestamps).sum(),
        Value::Object(map) => map.values().map(count_timestamps).sum(),
        Value::Null | Value::Bool(_) | Value::String(_) => 0,
    }
}

/// Shorten a value for display.
fn preview(raw: &str) -> String {
    const LIMIT: usize = 80;
    match raw.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}
