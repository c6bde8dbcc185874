//! Barometric pressure / altitude sensor (BMP388 class devices).
//!
//! Primary value is station pressure in hPa.  Altitude is derived from it
//! with the international barometric formula against the configured
//! sea-level reference; the die temperature rides along as a third column.

use crate::error::{DeviceError, FaultCode, InitError, ReadError};
use crate::mux::MuxPort;
use crate::record::{Field, Fields};

use super::{Sensor, SensorContext, SensorCore};

/// One compensated conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaroSample {
    pub pressure_pa: f64,
    pub temperature_c: f64,
}

/// Device side of a barometer.
pub trait Barometer {
    /// Probe and configure the device.
    fn begin(&mut self) -> Result<(), DeviceError>;
    /// Trigger one conversion and return the compensated result.
    fn perform_reading(&mut self) -> Result<BaroSample, DeviceError>;
}

/// Altitude in metres for `pressure_hpa` against `sea_level_hpa`.
pub fn altitude_m(pressure_hpa: f64, sea_level_hpa: f64) -> f64 {
    44_330.0 * (1.0 - (pressure_hpa / sea_level_hpa).powf(0.1903))
}

pub struct PressureSensor<B> {
    core: SensorCore,
    device: B,
    altitude_m: f64,
    temperature_c: f64,
}

impl<B: Barometer> PressureSensor<B> {
    pub fn new(name: &'static str, pin: i32, mux_port: MuxPort, device: B) -> Self {
        Self {
            core: SensorCore::new(name, pin, mux_port),
            device,
            altitude_m: 0.0,
            temperature_c: 0.0,
        }
    }

    pub fn pressure_hpa(&self) -> f64 {
        self.core.value
    }

    pub fn altitude_m(&self) -> f64 {
        self.altitude_m
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }
}

impl<B: Barometer> Sensor for PressureSensor<B> {
    fn core(&self) -> &SensorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SensorCore {
        &mut self.core
    }

    fn bring_up(&mut self, _ctx: &mut SensorContext<'_>) -> Result<(), InitError> {
        self.device
            .begin()
            .map_err(|_| InitError::new(FaultCode::Pressure, "BMP388 sensor failed to initialize"))
    }

    fn sample(&mut self, ctx: &mut SensorContext<'_>) -> Result<(), ReadError> {
        let reading = self
            .device
            .perform_reading()
            .map_err(|e| ReadError::new(format!("{} Failed to perform reading: {e}", self.core.name)))?;
        let hpa = reading.pressure_pa / 100.0;
        self.core.value = hpa;
        self.temperature_c = reading.temperature_c;
        self.altitude_m = altitude_m(hpa, ctx.config.sea_level_pressure_hpa);
        Ok(())
    }

    fn fields(&self) -> Fields<'_> {
        Fields::from_iter([
            Field::number("bmpHpa", self.core.value),
            Field::number("bmpAlt", self.altitude_m),
            Field::number("bmpTemp", self.temperature_c),
        ])
    }
}
