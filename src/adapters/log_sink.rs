//! Log-based payload logger adapter.
//!
//! Implements [`LogSink`] on top of the `log` facade, which goes to UART /
//! USB-CDC through the ESP-IDF logger in production.  Records and messages
//! use distinct targets so a backend can route them to separate files.

use log::{info, warn};

use crate::app::ports::{LogSink, MAX_LOG_LINE_LENGTH};

pub const DATA_TARGET: &str = "stardust::data";
pub const MSG_TARGET: &str = "stardust::msg";

/// Adapter that writes every record and message to the serial console.
pub struct SerialLogSink {
    max_line_length: usize,
    records: u64,
}

impl Default for SerialLogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialLogSink {
    pub fn new() -> Self {
        Self::with_max_line_length(MAX_LOG_LINE_LENGTH)
    }

    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self {
            max_line_length,
            records: 0,
        }
    }

    /// Records written so far, header included.
    pub fn records(&self) -> u64 {
        self.records
    }
}

impl LogSink for SerialLogSink {
    fn log_msg(&mut self, msg: &str) {
        warn!(target: MSG_TARGET, "MSG | {}", msg);
    }

    fn log_data(&mut self, line: &str) {
        self.records += 1;
        info!(target: DATA_TARGET, "DATA | {}", line);
    }

    fn max_line_length(&self) -> usize {
        self.max_line_length
    }
}
