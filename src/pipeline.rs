//! CSV conversion pipeline.
//!
//! Converts a whole CSV buffer in one pass:
//!
//! 1. Split into physical lines, dropping blank ones
//! 2. Parse the header and classify its columns
//! 3. Append a `<name>_converted` header for every simple timestamp column
//! 4. For each row, append the ISO form of every simple timestamp value and
//!    rewrite embedded JSON columns in place
//! 5. Pad every row to the header width and re-serialize
//!
//! Field-level failures never abort the conversion. A value that is not a
//! timestamp produces an empty converted field; JSON that does not parse is
//! written back unchanged. Only an input without any non-blank line fails.
//!
//! # Example
//!
//! ```
//! use epoch_expander::pipeline::convert;
//!
//! let output = convert("id,createdAt\n1,1703980800").unwrap();
//! assert_eq!(
//!     output,
//!     "id,createdAt,createdAt_converted\n1,1703980800,2023-12-31T00:00:00.000Z"
//! );
//! ```

use serde::Serialize;
use std::fmt;

use crate::csv_handler::{classify_header, format_line, parse_line, ColumnKind, ColumnSpec};
use crate::epoch::{classify, ReadableZone};
use crate::error::ExpanderError;
use crate::events::{EventSink, NullSink};
use crate::json_rewriter::{FieldRewrite, JsonRewriter, DEFAULT_MAX_DEPTH};

/// Literal treated like an empty field.
const NULL_LITERAL: &str = "null";

/// Options controlling a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Zone used for the `readable` field of expanded JSON timestamps.
    pub readable_zone: ReadableZone,
    /// Maximum nesting depth accepted in embedded JSON.
    pub max_json_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            readable_zone: ReadableZone::Local,
            max_json_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Statistics collected during a conversion.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Data rows processed (header excluded).
    pub total_rows: u64,
    /// Columns converted into a trailing `_converted` column.
    pub simple_columns: usize,
    /// Columns whose JSON content is rewritten in place.
    pub json_columns: usize,
    /// Simple values converted to ISO 8601.
    pub converted_values: u64,
    /// Simple values present but not recognized as timestamps.
    pub skipped_values: u64,
    /// Simple values that were empty or `null`.
    pub blank_values: u64,
    /// JSON fields parsed and re-serialized.
    pub rewritten_json_fields: u64,
    /// Numeric timestamps expanded inside JSON fields.
    pub expanded_json_values: u64,
    /// JSON fields left unchanged because they did not parse.
    pub skipped_json_fields: u64,
    /// Rows that were shorter than the output header and got padded.
    pub padded_rows: u64,
}

impl ConversionStats {
    /// Returns true if every present value could be converted.
    pub fn is_clean(&self) -> bool {
        self.skipped_values == 0 && self.skipped_json_fields == 0
    }
}

impl fmt::Display for ConversionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timestamp Conversion Report")?;
        writeln!(f, "===========================")?;
        writeln!(
            f,
            "Status: {}",
            if self.is_clean() { "SUCCESS" } else { "PARTIAL" }
        )?;
        writeln!(f)?;
        writeln!(f, "Columns:")?;
        writeln!(f, "  Simple timestamp columns: {:>10}", self.simple_columns)?;
        writeln!(f, "  JSON timestamp columns:   {:>10}", self.json_columns)?;
        writeln!(f)?;
        writeln!(f, "Statistics:")?;
        writeln!(f, "  Total rows:               {:>10}", self.total_rows)?;
        writeln!(f, "  Converted values:         {:>10}", self.converted_values)?;
        writeln!(f, "  Skipped values:           {:>10}", self.skipped_values)?;
        writeln!(f, "  Blank values:             {:>10}", self.blank_values)?;
        writeln!(f, "  Rewritten JSON fields:    {:>10}", self.rewritten_json_fields)?;
        writeln!(f, "  Expanded JSON timestamps: {:>10}", self.expanded_json_values)?;
        writeln!(f, "  Skipped JSON fields:      {:>10}", self.skipped_json_fields)?;
        writeln!(f, "  Padded rows:              {:>10}", self.padded_rows)?;
        Ok(())
    }
}

/// Output of a conversion together with its statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// The converted CSV text.
    pub output: String,
    /// What happened along the way.
    pub stats: ConversionStats,
}

/// Converts CSV buffers. Holds no state between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionPipeline {
    options: ConvertOptions,
}

impl ConversionPipeline {
    /// Creates a pipeline with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Convert a CSV buffer.
    ///
    /// # Errors
    ///
    /// Returns [`ExpanderError::EmptyInput`] if the input contains no
    /// non-blank line.
    pub fn convert(&self, text: &str) -> Result<String, ExpanderError> {
        self.convert_with_stats(text, &mut NullSink)
            .map(|conversion| conversion.output)
    }

    /// Convert a CSV buffer, reporting events to `sink` and collecting statistics.
    ///
    /// # Errors
    ///
    /// Returns [`ExpanderError::EmptyInput`] if the input contains no
    /// non-blank line.
    pub fn convert_with_stats(
        &self,
        text: &str,
        sink: &mut dyn EventSink,
    ) -> Result<Conversion, ExpanderError> {
        let lines = split_lines(text);
        let (header_line, data_lines) = lines.split_first().ok_or(ExpanderError::EmptyInput)?;

        let header = parse_line(header_line);
        let specs = classify_header(&header);
        let output_header = build_output_header(&header, &specs);

        let mut stats = ConversionStats {
            simple_columns: count_kind(&specs, ColumnKind::Simple),
            json_columns: count_kind(&specs, ColumnKind::JsonEmbedded),
            ..ConversionStats::default()
        };

        let rewriter = JsonRewriter::new(self.options.readable_zone, self.options.max_json_depth);
        let total = data_lines.len();
        let mut output_lines = Vec::with_capacity(total + 1);
        output_lines.push(format_line(&output_header));

        for (i, line) in data_lines.iter().enumerate() {
            let row_index = i + 1;
            let row = self.convert_row(
                line,
                row_index,
                &specs,
                output_header.len(),
                &rewriter,
                sink,
                &mut stats,
            );
            output_lines.push(format_line(&row));
            stats.total_rows += 1;
            sink.on_progress(row_index, total);
        }

        Ok(Conversion {
            output: output_lines.join("\n"),
            stats,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn convert_row(
        &self,
        line: &str,
        row_index: usize,
        specs: &[ColumnSpec],
        width: usize,
        rewriter: &JsonRewriter,
        sink: &mut dyn EventSink,
        stats: &mut ConversionStats,
    ) -> Vec<String> {
        let fields = parse_line(line);
        let mut row = fields.clone();

        for spec in specs {
            // Out-of-range columns get their converted slot from padding
            let Some(raw) = fields.get(spec.index) else {
                continue;
            };
            let value = raw.trim();
            let blank = value.is_empty() || value == NULL_LITERAL;

            match spec.kind {
                ColumnKind::Simple if blank => {
                    stats.blank_values += 1;
                    row.push(String::new());
                }
                ColumnKind::Simple => match classify(value).iso() {
                    Some(iso) => {
                        stats.converted_values += 1;
                        row.push(iso);
                    }
                    None => {
                        stats.skipped_values += 1;
                        sink.on_warning(
                            &format!("{:?} is not a timestamp, left unconverted", value),
                            &field_path(row_index, spec),
                        );
                        row.push(String::new());
                    }
                },
                ColumnKind::JsonEmbedded if blank => {}
                ColumnKind::JsonEmbedded => match rewriter.rewrite_field(value, sink) {
                    FieldRewrite::Rewritten { text, converted } => {
                        stats.rewritten_json_fields += 1;
                        stats.expanded_json_values += converted as u64;
                        row[spec.index] = text;
                    }
                    FieldRewrite::Skipped { reason } => {
                        stats.skipped_json_fields += 1;
                        row[spec.index] = value.to_string();
                        sink.on_warning(
                            &format!("{}, left unchanged", reason),
                            &field_path(row_index, spec),
                        );
                    }
                    FieldRewrite::Blank => {}
                },
            }
        }

        if row.len() < width {
            stats.padded_rows += 1;
            row.resize(width, String::new());
        }

        row
    }
}

/// Convert a CSV buffer with default options.
///
/// # Errors
///
/// Returns [`ExpanderError::EmptyInput`] if the input contains no non-blank line.
pub fn convert(text: &str) -> Result<String, ExpanderError> {
    ConversionPipeline::default().convert(text)
}

/// Split on `\n`, drop a trailing `\r`, and discard blank lines.
fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect()
}

fn build_output_header(header: &[String], specs: &[ColumnSpec]) -> Vec<String> {
    header
        .iter()
        .cloned()
        .chain(
            specs
                .iter()
                .filter(|spec| spec.kind == ColumnKind::Simple)
                .map(ColumnSpec::converted_name),
        )
        .collect()
}

fn count_kind(specs: &[ColumnSpec], kind: ColumnKind) -> usize {
    specs.iter().filter(|spec| spec.kind == kind).count()
}

fn field_path(row_index: usize, spec: &ColumnSpec) -> String {
    format!("row {}, column {}", row_index, spec.name)
}
