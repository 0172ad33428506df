//! Epoch Expander Library
//!
//! This library provides the core functionality for the epoch expander CLI tool.
//! It expands epoch timestamps found in CSV exports into ISO 8601, both in plain
//! timestamp columns and inside JSON stored in CSV fields, without touching any
//! other data. It includes modules for the CSV line codec, column
//! classification, epoch heuristics, JSON rewriting, and the conversion pipeline.

pub mod analyzer;
pub mod cli;
pub mod csv_handler;
pub mod epoch;
pub mod error;
pub mod events;
pub mod inspector;
pub mod json_rewriter;
pub mod pipeline;
pub mod util;

pub use error::ExpanderError;
pub use pipeline::{convert, ConversionPipeline, ConvertOptions};
