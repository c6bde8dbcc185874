//! Acquisition cycle: the payload's hexagonal core.
//!
//! [`AcquisitionCycle`] owns the ordered sensor list, the heater
//! thermostat, the fault reporter and the configuration.  Ports are
//! injected at call sites, so the whole cycle runs against mock adapters in
//! tests.
//!
//! ```text
//!  MuxControl ──▶ ┌─────────────────────────────┐ ──▶ LogSink
//!                 │      AcquisitionCycle       │
//!       Clock ──▶ │ sensors · heater · faults   │
//!                 └─────────────────────────────┘
//! ```
//!
//! Sensors are initialised once, then read and formatted in insertion
//! order every cycle.  A sensor's trouble never stops the cycle: it shows
//! up as blank columns in the record.

use log::{debug, info, warn};

use crate::config::StardustConfig;
use crate::control::HeaterController;
use crate::error::FaultCode;
use crate::faults::FaultReporter;
use crate::record;
use crate::sensors::{Sensor, SensorContext};

use super::ports::{Clock, LogSink, MuxControl};

/// Outcome of one [`AcquisitionCycle::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number.
    pub cycle: u64,
    /// The record handed to the data log.
    pub line: String,
    /// Available sensors whose read failed this cycle.
    pub failed_reads: usize,
}

pub struct AcquisitionCycle {
    sensors: Vec<Box<dyn Sensor>>,
    heater: HeaterController,
    faults: FaultReporter,
    config: StardustConfig,
    cycle_count: u64,
}

impl AcquisitionCycle {
    pub fn new(config: StardustConfig, heater: HeaterController) -> Self {
        Self {
            sensors: Vec::new(),
            heater,
            faults: FaultReporter::new(),
            config,
            cycle_count: 0,
        }
    }

    /// Append a sensor; record columns follow insertion order.
    pub fn add_sensor(&mut self, sensor: Box<dyn Sensor>) {
        self.sensors.push(sensor);
    }

    #[must_use]
    pub fn with_sensor(mut self, sensor: impl Sensor + 'static) -> Self {
        self.add_sensor(Box::new(sensor));
        self
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Switch the heater off, bring every sensor up and write the header.
    ///
    /// Returns the number of sensors that came up.
    pub fn init_all(
        &mut self,
        mux: &mut dyn MuxControl,
        log: &mut dyn LogSink,
        clock: &dyn Clock,
    ) -> usize {
        self.heater.init();

        let Self {
            sensors,
            heater,
            faults,
            config,
            ..
        } = self;
        for sensor in sensors.iter_mut() {
            let mut ctx = SensorContext {
                mux: &mut *mux,
                faults: &mut *faults,
                heater: &mut *heater,
                log: &mut *log,
                clock,
                config: &*config,
            };
            sensor.init(&mut ctx);
        }

        let available = self.available_count();
        let summary = format!("{} sensors, {} available", self.sensors.len(), available);
        info!("{}", summary);
        log.log_msg(&summary);

        let header = self.header_line();
        emit(log, &header);
        available
    }

    /// Record a fault detected outside the sensor set (the SD card).
    pub fn report_fault(&mut self, code: FaultCode, message: &str, log: &mut dyn LogSink) {
        self.faults.report(code, message, log);
    }

    /// Concatenated column headers of every sensor.
    pub fn header_line(&self) -> String {
        record::join(self.sensors.iter().map(|s| s.header()))
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Read every available sensor, assemble the record and log it.
    pub fn tick(
        &mut self,
        mux: &mut dyn MuxControl,
        log: &mut dyn LogSink,
        clock: &dyn Clock,
    ) -> CycleReport {
        self.cycle_count += 1;
        let cycle = self.cycle_count;
        let mut failed_reads = 0;

        let Self {
            sensors,
            heater,
            faults,
            config,
            ..
        } = self;
        for sensor in sensors.iter_mut().filter(|s| s.is_available()) {
            let mut ctx = SensorContext {
                mux: &mut *mux,
                faults: &mut *faults,
                heater: &mut *heater,
                log: &mut *log,
                clock,
                config: &*config,
            };
            if !sensor.read(&mut ctx) {
                debug!("cycle {}: {} read failed", cycle, sensor.name());
                failed_reads += 1;
            }
        }

        let line = record::join(self.sensors.iter().map(|s| s.log_line()));
        emit(log, &line);

        CycleReport {
            cycle,
            line,
            failed_reads,
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn sensors(&self) -> &[Box<dyn Sensor>] {
        &self.sensors
    }

    pub fn available_count(&self) -> usize {
        self.sensors.iter().filter(|s| s.is_available()).count()
    }

    pub fn faults(&self) -> &FaultReporter {
        &self.faults
    }

    pub fn heater(&self) -> &HeaterController {
        &self.heater
    }

    pub fn config(&self) -> &StardustConfig {
        &self.config
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }
}

fn emit(log: &mut dyn LogSink, line: &str) {
    let max = log.max_line_length();
    if line.len() > max {
        warn!("record of {} bytes exceeds logger limit {}", line.len(), max);
    }
    log.log_data(line);
}
