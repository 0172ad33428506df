//! Conversion event reporting.
//!
//! The conversion engine never writes to stdout, stderr or a global logger
//! directly. It reports progress, skipped values and performed conversions
//! to an [`EventSink`] supplied by the caller.

/// Receiver for events emitted while a file is converted.
///
/// All methods default to doing nothing, so implementors only override
/// what they care about.
pub trait EventSink {
    /// Called after each data row. `row_index` is 1-based; `total` is the
    /// number of data rows in the input.
    fn on_progress(&mut self, _row_index: usize, _total: usize) {}

    /// Called when a value is left unchanged because it could not be
    /// converted. `path` locates the value (`row 3, column trackingHistory`
    /// or a JSON path such as `history[0].timestamp`).
    fn on_warning(&mut self, _message: &str, _path: &str) {}

    /// Called for every numeric leaf replaced inside embedded JSON.
    fn on_converted(&mut self, _path: &str, _original: &str, _iso: &str) {}
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {}

/// Sink that forwards events to `tracing`.
///
/// Progress is logged at `info` every `interval` rows and on the last row,
/// warnings at `warn`, and individual conversions at `debug`.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    interval: usize,
}

impl TracingSink {
    /// Default number of rows between progress messages.
    pub const DEFAULT_INTERVAL: usize = 100;

    /// Creates a sink logging progress every `interval` rows (minimum 1).
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    /// Returns true if progress for `row_index` should be logged.
    fn should_report(&self, row_index: usize, total: usize) -> bool {
        row_index % self.interval == 0 || row_index == total
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

impl EventSink for TracingSink {
    fn on_progress(&mut self, row_index: usize, total: usize) {
        if self.should_report(row_index, total) {
            tracing::info!(row = row_index, total, "Processing rows");
        }
    }

    fn on_warning(&mut self, message: &str, path: &str) {
        tracing::warn!(path, "{}", message);
    }

    fn on_converted(&mut self, path: &str, original: &str, iso: &str) {
        tracing::debug!(path, original, iso, "Converted timestamp");
    }
}
