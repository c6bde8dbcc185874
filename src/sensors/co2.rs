//! CO2 / humidity / temperature sensor (SCD30 class devices).
//!
//! The device converts on its own schedule.  A read that finds no new
//! conversion is still a success: the previous values stay in place.

use log::warn;

use crate::error::{DeviceError, FaultCode, InitError, ReadError};
use crate::mux::MuxPort;
use crate::record::{Field, Fields};

use super::{Sensor, SensorContext, SensorCore};

/// Seconds between conversions requested at bring-up.
pub const MEASUREMENT_INTERVAL_S: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2Sample {
    pub co2_ppm: f64,
    pub temperature_c: f64,
    pub relative_humidity: f64,
}

/// Device side of a CO2 monitor.
pub trait Co2Monitor {
    /// Probe the device and start continuous measurement.
    fn begin(&mut self) -> Result<(), DeviceError>;
    fn set_measurement_interval(&mut self, seconds: u16) -> Result<(), DeviceError>;
    fn data_ready(&mut self) -> Result<bool, DeviceError>;
    fn read_measurement(&mut self) -> Result<Co2Sample, DeviceError>;
}

pub struct Co2Sensor<C> {
    core: SensorCore,
    device: C,
    temperature_c: f64,
    relative_humidity: f64,
}

impl<C: Co2Monitor> Co2Sensor<C> {
    pub fn new(name: &'static str, pin: i32, mux_port: MuxPort, device: C) -> Self {
        Self {
            core: SensorCore::new(name, pin, mux_port),
            device,
            temperature_c: 0.0,
            relative_humidity: 0.0,
        }
    }

    pub fn co2_ppm(&self) -> f64 {
        self.core.value
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    pub fn relative_humidity(&self) -> f64 {
        self.relative_humidity
    }
}

impl<C: Co2Monitor> Sensor for Co2Sensor<C> {
    fn core(&self) -> &SensorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SensorCore {
        &mut self.core
    }

    fn bring_up(&mut self, _ctx: &mut SensorContext<'_>) -> Result<(), InitError> {
        self.device
            .begin()
            .map_err(|_| InitError::new(FaultCode::Co2, "SCD30 CO2 sensor failed to begin"))?;
        // Default interval still works; not worth losing the sensor over.
        if let Err(e) = self.device.set_measurement_interval(MEASUREMENT_INTERVAL_S) {
            warn!("{}: SCD30 Failed to set measurement interval: {}", self.core.name, e);
        }
        Ok(())
    }

    fn sample(&mut self, _ctx: &mut SensorContext<'_>) -> Result<(), ReadError> {
        let ready = self
            .device
            .data_ready()
            .map_err(|e| ReadError::device("SCD30 data ready", e))?;
        if !ready {
            return Ok(());
        }
        let m = self
            .device
            .read_measurement()
            .map_err(|_| ReadError::new("Error reading SCD30 CO2 sensor data"))?;
        self.core.value = m.co2_ppm;
        self.temperature_c = m.temperature_c;
        self.relative_humidity = m.relative_humidity;
        Ok(())
    }

    fn fields(&self) -> Fields<'_> {
        Fields::from_iter([
            Field::number("CO2ppm", self.core.value),
            Field::number("SCDTemp", self.temperature_c),
            Field::number("SCDRH", self.relative_humidity),
        ])
    }
}
