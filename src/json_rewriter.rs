//! Recursive timestamp expansion inside JSON documents.
//!
//! Every number greater than [`SECONDS_THRESHOLD`] is replaced by an object
//! holding the original number, its ISO 8601 form and a readable form:
//!
//! ```json
//! {
//!   "confirm": {
//!     "original": 1752210112744,
//!     "iso": "2025-07-11T05:41:52.744Z",
//!     "readable": "7/11/2025, 5:41:52 AM"
//!   }
//! }
//! ```
//!
//! A number above the threshold that is not a valid date still becomes a
//! record, with the number's own text as `iso` and [`INVALID_DATE`] as
//! `readable`.
//!
//! Everything else (strings, booleans, null, small numbers, key order, array
//! length) is left exactly as it was.
//!
//! # Example
//!
//! ```
//! use epoch_expander::epoch::ReadableZone;
//! use epoch_expander::events::NullSink;
//! use epoch_expander::json_rewriter::JsonRewriter;
//!
//! let rewriter = JsonRewriter::new(ReadableZone::Utc, 64);
//! let out = rewriter.rewrite_text(r#"{"confirm":1752210112744,"count":3}"#, &mut NullSink);
//! assert!(out.contains(r#""iso": "2025-07-11T05:41:52.744Z""#));
//! assert!(out.contains(r#""count": 3"#));
//! ```

use serde_json::{json, Number, Value};

use crate::epoch::{classify_value, format_iso, format_readable, ReadableZone, SECONDS_THRESHOLD};
use crate::error::ExpanderError;
use crate::events::EventSink;

/// Default maximum nesting depth accepted by the rewriter.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// `readable` text for a number above the threshold that is not a valid date.
pub const INVALID_DATE: &str = "Invalid Date";

/// Replacement record for a numeric timestamp leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedTimestamp {
    /// The number exactly as it appeared in the input.
    pub original: Number,
    /// ISO 8601 rendering in UTC, or the number's text if it is not a valid date.
    pub iso: String,
    /// Locale-style rendering, or [`INVALID_DATE`].
    pub readable: String,
}

impl From<ExpandedTimestamp> for Value {
    fn from(expanded: ExpandedTimestamp) -> Self {
        json!({
            "original": expanded.original,
            "iso": expanded.iso,
            "readable": expanded.readable,
        })
    }
}

/// Result of rewriting one embedded JSON field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRewrite {
    /// Empty, whitespace-only or `null`; nothing to do.
    Blank,
    /// Parsed and re-serialized. `converted` counts the replaced leaves.
    Rewritten { text: String, converted: usize },
    /// Not valid JSON or nested too deeply; the field stays unchanged.
    Skipped { reason: String },
}

/// Walks JSON values and expands numeric timestamps.
#[derive(Debug, Clone, Copy)]
pub struct JsonRewriter {
    zone: ReadableZone,
    max_depth: usize,
}

impl Default for JsonRewriter {
    fn default() -> Self {
        Self::new(ReadableZone::default(), DEFAULT_MAX_DEPTH)
    }
}

impl JsonRewriter {
    /// Creates a rewriter rendering readable forms in `zone` and rejecting
    /// documents nested deeper than `max_depth`.
    pub fn new(zone: ReadableZone, max_depth: usize) -> Self {
        Self { zone, max_depth }
    }

    /// Rewrite a parsed value starting at the document root.
    ///
    /// # Errors
    ///
    /// Returns [`ExpanderError::DepthExceeded`] if the value nests deeper
    /// than the configured maximum.
    pub fn rewrite(&self, value: &Value, sink: &mut dyn EventSink) -> Result<Value, ExpanderError> {
        let mut converted = 0;
        self.rewrite_at(value, "", 0, sink, &mut converted)
    }

    fn rewrite_at(
        &self,
        value: &Value,
        path: &str,
        depth: usize,
        sink: &mut dyn EventSink,
        converted: &mut usize,
    ) -> Result<Value, ExpanderError> {
        if depth > self.max_depth {
            return Err(ExpanderError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }

        match value {
            Value::Number(number) => Ok(self.rewrite_number(number, path, sink, converted)),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    self.rewrite_at(item, &format!("{path}[{i}]"), depth + 1, sink, converted)
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => map
                .iter()
                .map(|(key, item)| {
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    self.rewrite_at(item, &child_path, depth + 1, sink, converted)
                        .map(|rewritten| (key.clone(), rewritten))
                })
                .collect::<Result<serde_json::Map<_, _>, _>>()
                .map(Value::Object),
            Value::Null | Value::Bool(_) | Value::String(_) => Ok(value.clone()),
        }
    }

    fn rewrite_number(
        &self,
        number: &Number,
        path: &str,
        sink: &mut dyn EventSink,
        converted: &mut usize,
    ) -> Value {
        let Some(raw) = number.as_f64().filter(|v| *v > SECONDS_THRESHOLD) else {
            return Value::Number(number.clone());
        };

        *converted += 1;
        let expanded = match classify_value(raw).instant() {
            Some(instant) => {
                let iso = format_iso(instant);
                sink.on_converted(path, &number.to_string(), &iso);
                ExpandedTimestamp {
                    original: number.clone(),
                    iso,
                    readable: format_readable(instant, self.zone),
                }
            }
            None => {
                sink.on_warning(
                    &format!("{} is outside the representable date range", number),
                    path,
                );
                ExpandedTimestamp {
                    original: number.clone(),
                    iso: number.to_string(),
                    readable: INVALID_DATE.to_string(),
                }
            }
        };

        expanded.into()
    }

    /// Rewrite the JSON held in one CSV field.
    ///
    /// Outer quotes left behind by CSV re-escaping are removed (together
    /// with doubled inner quotes) before parsing.
    pub fn rewrite_field(&self, text: &str, sink: &mut dyn EventSink) -> FieldRewrite {
        if text.trim().is_empty() || text == "null" {
            return FieldRewrite::Blank;
        }

        let unwrapped = unwrap_csv_quotes(text.trim());
        let parsed: Value = match serde_json::from_str(&unwrapped) {
            Ok(value) => value,
            Err(e) => {
                return FieldRewrite::Skipped {
                    reason: format!("invalid JSON: {}", e),
                }
            }
        };

        let mut converted = 0;
        let rewritten = match self.rewrite_at(&parsed, "", 0, sink, &mut converted) {
            Ok(value) => value,
            Err(e) => {
                return FieldRewrite::Skipped {
                    reason: e.to_string(),
                }
            }
        };

        match serde_json::to_string_pretty(&rewritten) {
            Ok(text) => FieldRewrite::Rewritten { text, converted },
            Err(e) => FieldRewrite::Skipped {
                reason: e.to_string(),
            },
        }
    }

    /// Rewrite JSON text, returning the original text unchanged on any failure.
    pub fn rewrite_text(&self, text: &str, sink: &mut dyn EventSink) -> String {
        match self.rewrite_field(text, sink) {
            FieldRewrite::Rewritten { text, .. } => text,
            FieldRewrite::Blank | FieldRewrite::Skipped { .. } => text.to_string(),
        }
    }

    /// Rewrite a standalone JSON document and pretty-print the result.
    ///
    /// Unlike [`rewrite_text`](Self::rewrite_text), failures are reported.
    ///
    /// # Errors
    ///
    /// Returns [`ExpanderError::Json`] if `text` is not valid JSON and
    /// [`ExpanderError::DepthExceeded`] if it nests too deeply.
    pub fn rewrite_document(
        &self,
        text: &str,
        sink: &mut dyn EventSink,
    ) -> Result<String, ExpanderError> {
        let parsed: Value = serde_json::from_str(text)?;
        let rewritten = self.rewrite(&parsed, sink)?;
        Ok(serde_json::to_string_pretty(&rewritten)?)
    }
}

/// Strip one pair of outer quotes and un-double inner quotes.
///
/// Text that is not wrapped in quotes is returned as is.
pub(crate) fn unwrap_csv_quotes(text: &str) -> String {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text[1..text.len() - 1].replace("\"\"", "\"")
    } else {
        text.to_string()
    }
}
