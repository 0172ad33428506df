//! CLI argument parsing module
//!
//! Handles command-line argument parsing using `clap` derive macros.
//! This module defines the `Mode` enum for operation modes and the `Args` struct
//! containing all CLI arguments with validation logic.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::epoch::ReadableZone;
use crate::events::TracingSink;
use crate::json_rewriter::DEFAULT_MAX_DEPTH;
use crate::pipeline::ConvertOptions;

/// Operation mode for the epoch expander.
///
/// - **Convert**: Expand timestamp columns of a CSV file
/// - **Json**: Expand numeric timestamps in a standalone JSON document
/// - **Inspect**: Show every rendering of a single epoch value
/// - **Analyze**: Report the structure of a CSV file without converting it
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Convert timestamp columns in a CSV file
    Convert,
    /// Expand timestamps in a JSON document
    Json,
    /// Inspect a single timestamp value
    Inspect,
    /// Report CSV structure and detected timestamp columns
    Analyze,
}

/// Output format for inspect and analyze reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human readable report
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Command-line arguments for the epoch expander.
///
/// Use the `validate()` method after parsing to ensure argument combinations are valid.
///
/// # Example
///
/// ```rust,ignore
/// use clap::Parser;
/// use epoch_expander::cli::Args;
///
/// let args = Args::parse();
/// args.validate()?;
/// ```
#[derive(Parser, Debug)]
#[command(name = "epoch-expander")]
#[command(about = "Expand epoch timestamps in CSV exports and JSON into ISO 8601")]
#[command(version)]
pub struct Args {
    /// Operation mode
    #[arg(long, value_enum, default_value = "convert")]
    pub mode: Mode,

    /// Input file (`-` or omitted reads stdin)
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Output file (omitted writes stdout)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Write to `converted_<input name>` next to the input file
    #[arg(long, default_value = "false")]
    pub default_output: bool,

    /// Timestamp to inspect (`now` for the current time)
    #[arg(long)]
    pub value: Option<String>,

    /// Render the `readable` field in UTC instead of the local time zone
    #[arg(long, default_value = "false")]
    pub utc_readable: bool,

    /// Maximum nesting depth accepted in embedded JSON
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Rows between progress log messages
    #[arg(long, default_value_t = TracingSink::DEFAULT_INTERVAL)]
    pub progress_interval: usize,

    /// Report format for inspect and analyze
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Print a conversion summary to stderr
    #[arg(long, default_value = "false")]
    pub stats: bool,

    /// Enable debug logging
    #[arg(short = 'v', long, default_value = "false")]
    pub verbose: bool,
}

impl Args {
    /// Validate argument combinations.
    ///
    /// - `--value` is required for inspect mode and rejected elsewhere
    /// - `--default-output` requires a real `--file` and conflicts with `--output`
    /// - `--output` is only meaningful for convert and json modes
    /// - `--max-depth` and `--progress-interval` must be at least 1
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the argument combination is valid
    /// - `Err(String)` with a descriptive error message if validation fails
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == 0 {
            return Err("--max-depth must be at least 1".to_string());
        }

        if self.progress_interval == 0 {
            return Err("--progress-interval must be at least 1".to_string());
        }

        match self.mode {
            Mode::Inspect => {
                if self.value.is_none() {
                    return Err("--value is required for inspect mode".to_string());
                }
                if self.file.is_some() {
                    return Err("--file cannot be used with inspect mode".to_string());
                }
            }
            _ => {
                if self.value.is_some() {
                    return Err("--value can only be used with inspect mode".to_string());
                }
            }
        }

        if !self.writes_output() && (self.output.is_some() || self.default_output) {
            return Err(format!(
                "--output and --default-output cannot be used with {} mode",
                self.mode_name()
            ));
        }

        if self.default_output {
            if self.output.is_some() {
                return Err("--default-output cannot be used with --output".to_string());
            }
            if crate::util::is_stdin(self.file.as_deref()) {
                return Err("--default-output requires --file".to_string());
            }
        }

        Ok(())
    }

    /// Returns true for modes that produce a converted document.
    pub fn writes_output(&self) -> bool {
        matches!(self.mode, Mode::Convert | Mode::Json)
    }

    /// Resolve the output path, deriving it from the input when requested.
    ///
    /// `None` means stdout.
    pub fn output_path(&self) -> Option<PathBuf> {
        if self.default_output {
            self.file.as_deref().and_then(crate::util::converted_path)
        } else {
            self.output.clone()
        }
    }

    /// Zone for the `readable` field of expanded timestamps.
    pub fn readable_zone(&self) -> ReadableZone {
        if self.utc_readable {
            ReadableZone::Utc
        } else {
            ReadableZone::Local
        }
    }

    /// Library options derived from the arguments.
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            readable_zone: self.readable_zone(),
            max_json_depth: self.max_depth,
        }
    }

    fn mode_name(&self) -> &'static str {
        match self.mode {
            Mode::Convert => "convert",
            Mode::Json => "json",
            Mode::Inspect => "inspect",
            Mode::Analyze => "analyze",
        }
    }
}
