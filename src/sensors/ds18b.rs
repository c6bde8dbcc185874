//! DS18B20 one-wire temperature sensor with optional heater control.
//!
//! Conversions are pipelined: each read collects the conversion requested
//! by the previous one and immediately requests the next.

use log::warn;

use crate::control::heater::SANITY_FLOOR_C;
use crate::error::{DeviceError, FaultCode, InitError, ReadError};
use crate::mux::MuxPort;
use crate::record::{Field, Fields};

use super::{Sensor, SensorContext, SensorCore};

/// Conversion resolution requested at bring-up.
pub const RESOLUTION_BITS: u8 = 12;

/// Device side of a one-wire thermometer bus.
pub trait OneWireThermometer {
    /// Enumerate the bus; returns the number of devices found.
    fn begin(&mut self) -> Result<usize, DeviceError>;
    /// Address the first device found.
    fn select_first(&mut self) -> Result<(), DeviceError>;
    fn set_resolution(&mut self, bits: u8) -> Result<(), DeviceError>;
    fn request_temperatures(&mut self) -> Result<(), DeviceError>;
    fn temperature_c(&mut self) -> Result<f64, DeviceError>;
}

pub struct Ds18bSensor<T> {
    core: SensorCore,
    device: T,
    use_for_heater_control: bool,
    heater_on: bool,
}

impl<T: OneWireThermometer> Ds18bSensor<T> {
    pub fn new(name: &'static str, pin: i32, mux_port: MuxPort, device: T) -> Self {
        Self {
            core: SensorCore::new(name, pin, mux_port),
            device,
            use_for_heater_control: false,
            heater_on: false,
        }
    }

    #[must_use]
    pub fn with_heater_control(mut self, enabled: bool) -> Self {
        self.use_for_heater_control = enabled;
        self
    }

    pub fn temperature_c(&self) -> f64 {
        self.core.value
    }

    fn drive_heater(&mut self, ctx: &mut SensorContext<'_>, sample_c: f64) {
        if self.use_for_heater_control {
            self.heater_on = ctx.heater.heater_on_off(sample_c);
        }
    }
}

impl<T: OneWireThermometer> Sensor for Ds18bSensor<T> {
    fn core(&self) -> &SensorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SensorCore {
        &mut self.core
    }

    fn bring_up(&mut self, _ctx: &mut SensorContext<'_>) -> Result<(), InitError> {
        let count = self.device.begin().unwrap_or(0);
        if count == 0 {
            return Err(InitError::new(FaultCode::Ds18b, "No Devices found on DS18B bus"));
        }
        if self.device.select_first().is_err() {
            warn!("{}: Unable to find address for Device 0", self.core.name);
        }
        if let Err(e) = self.device.set_resolution(RESOLUTION_BITS) {
            warn!("{}: set resolution: {}", self.core.name, e);
        }
        if let Err(e) = self.device.request_temperatures() {
            warn!("{}: first conversion request: {}", self.core.name, e);
        }
        Ok(())
    }

    fn sample(&mut self, ctx: &mut SensorContext<'_>) -> Result<(), ReadError> {
        let reading = self.device.temperature_c();
        // Start the next conversion whatever happened to this one.
        if let Err(e) = self.device.request_temperatures() {
            warn!("{}: conversion request: {}", self.core.name, e);
        }
        match reading {
            Ok(t) => {
                self.core.value = t;
                self.drive_heater(ctx, t);
                Ok(())
            }
            Err(e) => {
                self.drive_heater(ctx, SANITY_FLOOR_C);
                Err(ReadError::device("DS18B read", e))
            }
        }
    }

    fn fields(&self) -> Fields<'_> {
        let heater = if self.use_for_heater_control {
            Field::text("HeaterOn", if self.heater_on { "On" } else { "Off" })
        } else {
            Field::empty("HeaterOn")
        };
        Fields::from_iter([Field::number(self.core.name, self.core.value), heater])
    }
}
