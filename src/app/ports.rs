//! Port traits: the hexagonal boundary between the acquisition core and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AcquisitionCycle (domain)
//! ```
//!
//! Driven adapters (logger, clock, bus multiplexer, heater output)
//! implement these traits.  The [`AcquisitionCycle`](super::engine::AcquisitionCycle)
//! receives them at call sites, so the domain core never touches hardware
//! directly and every port can be replaced by a recording mock in tests.
//!
//! Device-level traits (one per sensor family) live beside the sensor that
//! consumes them in [`crate::sensors`].

use crate::mux::MuxPort;

// ───────────────────────────────────────────────────────────────
// Logger port (domain → log file / serial)
// ───────────────────────────────────────────────────────────────

/// Longest line the payload logger accepts.
pub const MAX_LOG_LINE_LENGTH: usize = 300;

/// The payload's logger collaborator.
///
/// Messages (faults, GPS fix events, configuration) and data records go to
/// separate streams.  Formatters must keep every line within
/// [`max_line_length`](LogSink::max_line_length); overrunning it is a
/// caller bug and is only checked in debug builds.
pub trait LogSink {
    /// Append a human-readable message to the event log.
    fn log_msg(&mut self, msg: &str);

    /// Append one record (header or data) to the data log.
    fn log_data(&mut self, line: &str);

    /// Maximum accepted line length in bytes.
    fn max_line_length(&self) -> usize {
        MAX_LOG_LINE_LENGTH
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait Clock {
    fn millis(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Bus multiplexer port
// ───────────────────────────────────────────────────────────────

/// Opens and closes one port of the shared-bus multiplexer.
///
/// Both calls are no-ops for [`MuxPort::Direct`].  Implementations swallow
/// bus errors after logging them: a sensor whose port could not be opened
/// simply fails its own transaction.
pub trait MuxControl {
    fn enable_port(&mut self, port: MuxPort);
    fn disable_port(&mut self, port: MuxPort);
}

// ───────────────────────────────────────────────────────────────
// Heater output port
// ───────────────────────────────────────────────────────────────

/// Drives the heater element and its indicator LED together.
pub trait HeaterSwitch {
    fn switch(&mut self, on: bool);
}
