//! Initialisation fault reporter.
//!
//! Sensors that fail bring-up report here once.  Every message is written
//! to the log sink immediately; the (code, message) pair is kept in a
//! fixed-capacity list that the indicator LEDs cycle through.  Reports
//! beyond the capacity are dropped without telling the caller, which bounds
//! memory on a run with many missing devices.  The list is never cleared
//! during a run.

use log::error;

use crate::app::ports::LogSink;
use crate::error::FaultCode;

/// Most faults the indicator list holds.
pub const MAX_FAULTS: usize = 10;

/// Characters of each message kept with its code.
pub const FAULT_MESSAGE_LEN: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultRecord {
    pub code: FaultCode,
    pub message: heapless::String<FAULT_MESSAGE_LEN>,
}

impl FaultRecord {
    fn new(code: FaultCode, message: &str) -> Self {
        let mut stored = heapless::String::new();
        for ch in message.chars() {
            if stored.push(ch).is_err() {
                break;
            }
        }
        Self {
            code,
            message: stored,
        }
    }
}

#[derive(Debug, Default)]
pub struct FaultReporter {
    faults: heapless::Vec<FaultRecord, MAX_FAULTS>,
}

impl FaultReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `message` and remember `code` while there is room.
    pub fn report(&mut self, code: FaultCode, message: &str, log: &mut dyn LogSink) {
        error!("FAULT {} | {}", code.code(), message);
        log.log_msg(message);
        // Full list: the log line above is all that survives.
        let _ = self.faults.push(FaultRecord::new(code, message));
    }

    pub fn faults(&self) -> &[FaultRecord] {
        &self.faults
    }

    /// Numeric codes in report order, for the indicator.
    pub fn codes(&self) -> impl Iterator<Item = FaultCode> + '_ {
        self.faults.iter().map(|f| f.code)
    }

    pub fn count(&self) -> usize {
        self.faults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    /// LED patterns to cycle through; a single solid green when healthy.
    pub fn status_patterns(&self) -> heapless::Vec<StatusPattern, MAX_FAULTS> {
        if self.faults.is_empty() {
            let mut all_ok = heapless::Vec::new();
            let _ = all_ok.push(StatusPattern::ALL_OK);
            return all_ok;
        }
        self.codes().map(FaultCode::status_pattern).collect()
    }
}

// ---------------------------------------------------------------------------
// Indicator patterns
// ---------------------------------------------------------------------------

/// One of the four indicator LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLed {
    Red,
    Green,
    Yellow,
    Blue,
}

/// How the indicator shows one fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPattern {
    pub led: StatusLed,
    pub blink: bool,
}

impl StatusPattern {
    /// Shown when nothing has failed.
    pub const ALL_OK: Self = Self {
        led: StatusLed::Green,
        blink: false,
    };

    const fn solid(led: StatusLed) -> Self {
        Self { led, blink: false }
    }

    const fn blinking(led: StatusLed) -> Self {
        Self { led, blink: true }
    }
}

impl FaultCode {
    pub const fn status_pattern(self) -> StatusPattern {
        match self {
            Self::Disk => StatusPattern::solid(StatusLed::Red),
            Self::Gps => StatusPattern::blinking(StatusLed::Red),
            Self::Dht => StatusPattern::solid(StatusLed::Blue),
            Self::Pressure => StatusPattern::blinking(StatusLed::Blue),
            Self::Co2 => StatusPattern::solid(StatusLed::Yellow),
            Self::Uv => StatusPattern::blinking(StatusLed::Yellow),
            Self::Ds18b => StatusPattern::blinking(StatusLed::Green),
        }
    }
}
