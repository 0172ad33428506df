//! Epoch Expander - expand epoch timestamps in CSV exports and JSON
//!
//! This CLI tool provides four operational modes:
//! - **Convert**: Append ISO 8601 columns for epoch columns and expand timestamps in embedded JSON
//! - **Json**: Expand numeric timestamps in a standalone JSON document
//! - **Inspect**: Show local, UTC, ISO 8601 and relative renderings of one value
//! - **Analyze**: Report CSV structure and the columns that would be converted
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Configuration/argument error |
//! | 2 | Input format error (empty input, invalid timestamp or JSON) |
//! | 3 | File I/O error |

use chrono::Utc;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use epoch_expander::cli::{Args, Mode, ReportFormat};
use epoch_expander::error::ExpanderError;
use epoch_expander::events::TracingSink;
use epoch_expander::json_rewriter::JsonRewriter;
use epoch_expander::pipeline::ConversionPipeline;
use epoch_expander::{analyzer, inspector, util};

/// Exit code for success
const EXIT_SUCCESS: u8 = 0;
/// Exit code for configuration/argument errors
const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for input format errors
const EXIT_INPUT_ERROR: u8 = 2;
/// Exit code for file I/O errors
const EXIT_IO_ERROR: u8 = 3;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = args.validate() {
        eprintln!("Error: Configuration error: {}", e);
        eprintln!("  Hint: Use --help for usage information");
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    match run(&args) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(args: &Args) -> Result<(), ExpanderError> {
    match args.mode {
        Mode::Convert => run_convert_mode(args),
        Mode::Json => run_json_mode(args),
        Mode::Inspect => run_inspect_mode(args),
        Mode::Analyze => run_analyze_mode(args),
    }
}

/// Run in convert mode.
///
/// Reads the whole CSV, converts it, and writes the result only once the
/// conversion has completed.
fn run_convert_mode(args: &Args) -> Result<(), ExpanderError> {
    let input = util::read_input(args.file.as_deref())?;
    tracing::info!(
        bytes = input.len(),
        file = ?args.file,
        "Starting CSV conversion"
    );

    let pipeline = ConversionPipeline::new(args.convert_options());
    let mut sink = TracingSink::new(args.progress_interval);
    let conversion = pipeline.convert_with_stats(&input, &mut sink)?;

    let output_path = args.output_path();
    util::write_output(output_path.as_deref(), &conversion.output)?;

    tracing::info!(
        rows = conversion.stats.total_rows,
        converted = conversion.stats.converted_values,
        json_fields = conversion.stats.rewritten_json_fields,
        "Conversion complete"
    );
    if let Some(path) = &output_path {
        tracing::info!(output = %path.display(), "Wrote converted file");
    }

    if args.stats {
        eprintln!("{}", conversion.stats);
    }
    Ok(())
}

/// Run in JSON mode: rewrite one document at its root.
fn run_json_mode(args: &Args) -> Result<(), ExpanderError> {
    let input = util::read_input(args.file.as_deref())?;
    let rewriter = JsonRewriter::new(args.readable_zone(), args.max_depth);
    let mut sink = TracingSink::new(args.progress_interval);
    let output = rewriter.rewrite_document(&input, &mut sink)?;
    util::write_output(args.output_path().as_deref(), &output)
}

/// Run in inspect mode.
fn run_inspect_mode(args: &Args) -> Result<(), ExpanderError> {
    let value = args
        .value
        .as_deref()
        .ok_or_else(|| ExpanderError::InvalidArgument("--value is required".to_string()))?;

    let now = Utc::now();
    let details = if value.trim().eq_ignore_ascii_case("now") {
        inspector::current(now)
    } else {
        inspector::inspect(value, now)?
    };

    match args.format {
        ReportFormat::Text => print!("{}", details),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&details)?),
    }
    Ok(())
}

/// Run in analyze mode.
fn run_analyze_mode(args: &Args) -> Result<(), ExpanderError> {
    let input = util::read_input(args.file.as_deref())?;
    let report = analyzer::analyze(&input)?;

    match args.format {
        ReportFormat::Text => print!("{}", report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Map an error to the process exit code.
fn error_to_exit_code(error: &ExpanderError) -> u8 {
    match error {
        ExpanderError::InvalidArgument(_) => EXIT_CONFIG_ERROR,
        ExpanderError::EmptyInput
        | ExpanderError::InvalidTimestamp(_)
        | ExpanderError::DepthExceeded { .. }
        | ExpanderError::Json(_)
        | ExpanderError::Csv(_) => EXIT_INPUT_ERROR,
        ExpanderError::Io(_) => EXIT_IO_ERROR,
    }
}
