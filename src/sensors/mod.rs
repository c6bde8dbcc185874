//! Sensor subsystem: the shared [`Sensor`] contract and its variants.
//!
//! Every payload device is one `Sensor`.  A variant supplies three things:
//! how to bring the device up ([`Sensor::bring_up`]), how to take one
//! sample ([`Sensor::sample`]) and which columns it contributes to the
//! record ([`Sensor::fields`]).  The provided methods wrap those in the
//! behaviour every sensor shares:
//!
//! - the multiplexer bracket around each hardware transaction,
//! - permanent failure on bring-up (fault reported, sensor skipped forever),
//! - transient failure on a read (blanks for this cycle only),
//! - header, data and blank lines generated from one column list.

pub mod co2;
pub mod dht;
pub mod ds18b;
pub mod gps;
pub mod pressure;
pub mod uv;
pub mod voltage;

use log::{debug, info, warn};

use crate::app::ports::{Clock, LogSink, MuxControl};
use crate::config::StardustConfig;
use crate::control::HeaterController;
use crate::error::{FaultCode, InitError, ReadError};
use crate::faults::FaultReporter;
use crate::mux::MuxPort;
use crate::record::{self, Fields};

pub use co2::Co2Sensor;
pub use dht::DhtSensor;
pub use ds18b::Ds18bSensor;
pub use gps::GpsSensor;
pub use pressure::PressureSensor;
pub use uv::UvSensor;
pub use voltage::VoltSensor;

/// Collaborators a sensor may touch while it runs.
///
/// Built by the acquisition cycle for each call, so a sensor only ever sees
/// the collaborators for the duration of one init or read.
pub struct SensorContext<'a> {
    pub mux: &'a mut dyn MuxControl,
    pub faults: &'a mut FaultReporter,
    pub heater: &'a mut HeaterController,
    pub log: &'a mut dyn LogSink,
    pub clock: &'a dyn Clock,
    pub config: &'a StardustConfig,
}

/// Identity and health state shared by every variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorCore {
    /// Label used in messages and, for single-value sensors, as the column
    /// header.
    pub name: &'static str,
    /// GPIO pin or bus address, depending on the device.
    pub pin: i32,
    pub mux_port: MuxPort,
    /// Primary reading; meaning depends on the variant.
    pub value: f64,
    /// Empty when the last operation succeeded.
    pub last_error: String,
    available: bool,
}

impl SensorCore {
    pub fn new(name: &'static str, pin: i32, mux_port: MuxPort) -> Self {
        Self {
            name,
            pin,
            mux_port,
            value: 0.0,
            last_error: String::new(),
            available: true,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Available and the last read succeeded.
    pub fn is_healthy(&self) -> bool {
        self.available && self.last_error.is_empty()
    }

    /// Mark the sensor permanently failed and report it.
    ///
    /// Formats `"<name> Failure: <last error>"`, hands it to the fault
    /// reporter with `code`, then clears the error text.
    pub fn fail(&mut self, code: FaultCode, faults: &mut FaultReporter, log: &mut dyn LogSink) {
        let msg = format!("{} Failure: {}", self.name, self.last_error);
        faults.report(code, &msg, log);
        self.available = false;
        self.last_error.clear();
    }
}

pub trait Sensor {
    fn core(&self) -> &SensorCore;
    fn core_mut(&mut self) -> &mut SensorCore;

    /// One-time device handshake, run with the sensor's multiplexer port
    /// open.
    fn bring_up(&mut self, ctx: &mut SensorContext<'_>) -> Result<(), InitError>;

    /// One hardware transaction, run with the multiplexer port open.  Only
    /// called while the sensor is available.
    fn sample(&mut self, ctx: &mut SensorContext<'_>) -> Result<(), ReadError>;

    /// Columns this sensor contributes, carrying the current values.
    fn fields(&self) -> Fields<'_>;

    fn name(&self) -> &'static str {
        self.core().name
    }

    fn is_available(&self) -> bool {
        self.core().is_available()
    }

    fn last_error(&self) -> &str {
        &self.core().last_error
    }

    fn value(&self) -> f64 {
        self.core().value
    }

    /// Bring the device up.  On failure the sensor reports one fault, turns
    /// unavailable and stays that way until `init` is called again.
    fn init(&mut self, ctx: &mut SensorContext<'_>) -> bool {
        let port = self.core().mux_port;
        self.core_mut().available = true;
        self.core_mut().last_error.clear();

        ctx.mux.enable_port(port);
        let result = self.bring_up(ctx);
        ctx.mux.disable_port(port);

        match result {
            Ok(()) => {
                info!("{}: initialised ({:?})", self.name(), port);
                true
            }
            Err(e) => {
                warn!("{}: init failed: {}", self.name(), e);
                let core = self.core_mut();
                core.last_error = e.message.to_string();
                core.fail(e.code, ctx.faults, ctx.log);
                false
            }
        }
    }

    /// Take one reading.  An unavailable sensor succeeds immediately
    /// without touching hardware.
    fn read(&mut self, ctx: &mut SensorContext<'_>) -> bool {
        if !self.is_available() {
            return true;
        }
        let port = self.core().mux_port;
        ctx.mux.enable_port(port);
        let result = self.sample(ctx);
        ctx.mux.disable_port(port);

        match result {
            Ok(()) => {
                self.core_mut().last_error.clear();
                true
            }
            Err(e) => {
                debug!("{}: read failed: {}", self.name(), e);
                self.core_mut().last_error = e.0;
                false
            }
        }
    }

    fn header(&self) -> String {
        record::header(&self.fields())
    }

    /// Values when healthy, otherwise blanks of identical layout.
    fn log_line(&self) -> String {
        let fields = self.fields();
        if self.core().is_healthy() {
            record::data(&fields)
        } else {
            record::blank(&fields)
        }
    }
}
