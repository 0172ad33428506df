//! Utility functions for the epoch expander binary.
//!
//! This module provides the input/output plumbing around the conversion
//! engine: reading a whole buffer from a file or stdin, writing the result
//! to a file or stdout, and deriving default output names.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::ExpanderError;

/// Path value that selects stdin.
pub const STDIN_MARKER: &str = "-";

/// Prefix added to the input file name for derived output paths.
pub const CONVERTED_PREFIX: &str = "converted_";

/// Returns true if `path` is absent or the stdin marker.
#[must_use]
pub fn is_stdin(path: Option<&Path>) -> bool {
    path.map_or(true, |p| p.as_os_str() == STDIN_MARKER)
}

/// Read the whole input into memory.
///
/// Reads from stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String, ExpanderError> {
    match path {
        Some(p) if !is_stdin(Some(p)) => Ok(fs::read_to_string(p)?),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Write the converted text.
///
/// Files receive the text exactly; stdout additionally gets a trailing
/// newline so the shell prompt starts on a fresh line.
pub fn write_output(path: Option<&Path>, text: &str) -> Result<(), ExpanderError> {
    match path {
        Some(p) => fs::write(p, text)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", text)?;
            handle.flush()?;
        }
    }
    Ok(())
}

/// Derive `converted_<name>` next to `input`.
///
/// Returns `None` if `input` has no file name (e.g. `..`).
#[must_use]
pub fn converted_path(input: &Path) -> Option<PathBuf> {
    let name = input.file_name()?;
    let mut converted = std::ffi::OsString::from(CONVERTED_PREFIX);
    converted.push(name);
    Some(input.with_file_name(converted))
}
