//! UV light sensor (VEML6075 class devices): UVA, UVB and UV index.

use crate::error::{DeviceError, FaultCode, InitError, ReadError};
use crate::mux::MuxPort;
use crate::record::{Field, Fields};

use super::{Sensor, SensorContext, SensorCore};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvSample {
    pub uva: f64,
    pub uvb: f64,
    pub index: f64,
}

/// Device side of a UV sensor.
pub trait UvDevice {
    fn begin(&mut self) -> Result<(), DeviceError>;
    fn read_uv(&mut self) -> Result<UvSample, DeviceError>;
}

pub struct UvSensor<U> {
    core: SensorCore,
    device: U,
    uvb: f64,
    index: f64,
}

impl<U: UvDevice> UvSensor<U> {
    pub fn new(name: &'static str, pin: i32, mux_port: MuxPort, device: U) -> Self {
        Self {
            core: SensorCore::new(name, pin, mux_port),
            device,
            uvb: 0.0,
            index: 0.0,
        }
    }

    pub fn uva(&self) -> f64 {
        self.core.value
    }

    pub fn uvb(&self) -> f64 {
        self.uvb
    }

    pub fn uv_index(&self) -> f64 {
        self.index
    }
}

impl<U: UvDevice> Sensor for UvSensor<U> {
    fn core(&self) -> &SensorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SensorCore {
        &mut self.core
    }

    fn bring_up(&mut self, _ctx: &mut SensorContext<'_>) -> Result<(), InitError> {
        self.device
            .begin()
            .map_err(|_| InitError::new(FaultCode::Uv, "VEML 6075 sensor failed to initialize"))
    }

    fn sample(&mut self, _ctx: &mut SensorContext<'_>) -> Result<(), ReadError> {
        let s = self
            .device
            .read_uv()
            .map_err(|e| ReadError::device("VEML6075 read", e))?;
        self.core.value = s.uva;
        self.uvb = s.uvb;
        self.index = s.index;
        Ok(())
    }

    fn fields(&self) -> Fields<'_> {
        Fields::from_iter([
            Field::number("UVA", self.core.value),
            Field::number("UVB", self.uvb),
            Field::number("UVindex", self.index),
        ])
    }
}
