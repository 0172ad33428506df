//! CSV handler module
//!
//! Handles splitting and joining CSV records and deciding which columns
//! carry timestamps.

pub mod codec;
pub mod columns;

// Re-export all public items to keep call sites short
pub use codec::{format_line, needs_quoting, parse_line};
pub use columns::{classify_column, classify_header, normalize_header, ColumnKind, ColumnSpec};
