//! DHT22 temperature / humidity sensor with optional heater control.
//!
//! The single-wire DHT protocol is bit-timed and lives in the board
//! support layer behind [`Hygrometer`].  A failed temperature read reports
//! absolute zero, which both blanks the record and, when this sensor drives
//! the heater, switches the heater off.

use crate::control::heater::SANITY_FLOOR_C;
use crate::error::{DeviceError, FaultCode, InitError, ReadError};
use crate::mux::MuxPort;
use crate::record::{Field, Fields};

use super::{Sensor, SensorContext, SensorCore};

/// Device side of a DHT-style hygrometer.
pub trait Hygrometer {
    fn begin(&mut self) -> Result<(), DeviceError>;
    fn read_temperature(&mut self) -> Result<f64, DeviceError>;
    fn read_humidity(&mut self) -> Result<f64, DeviceError>;
}

pub struct DhtSensor<H> {
    core: SensorCore,
    device: H,
    humidity: f64,
    use_for_heater_control: bool,
    heater_on: bool,
}

impl<H: Hygrometer> DhtSensor<H> {
    pub fn new(name: &'static str, pin: i32, mux_port: MuxPort, device: H) -> Self {
        Self {
            core: SensorCore::new(name, pin, mux_port),
            device,
            humidity: 0.0,
            use_for_heater_control: false,
            heater_on: false,
        }
    }

    /// Feed every temperature sample to the heater thermostat.
    #[must_use]
    pub fn with_heater_control(mut self, enabled: bool) -> Self {
        self.use_for_heater_control = enabled;
        self
    }

    pub fn use_for_heater_control(&self) -> bool {
        self.use_for_heater_control
    }

    pub fn temperature_c(&self) -> f64 {
        self.core.value
    }

    pub fn humidity(&self) -> f64 {
        self.humidity
    }

    fn drive_heater(&mut self, ctx: &mut SensorContext<'_>) {
        if self.use_for_heater_control {
            self.heater_on = ctx.heater.heater_on_off(self.core.value);
        }
    }
}

impl<H: Hygrometer> Sensor for DhtSensor<H> {
    fn core(&self) -> &SensorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SensorCore {
        &mut self.core
    }

    fn bring_up(&mut self, _ctx: &mut SensorContext<'_>) -> Result<(), InitError> {
        let not_found = |_| InitError::new(FaultCode::Dht, "DHT sensor not found");
        self.device.begin().map_err(not_found)?;
        // A test conversion is the only presence check the protocol has.
        self.device.read_temperature().map_err(not_found)?;
        Ok(())
    }

    fn sample(&mut self, ctx: &mut SensorContext<'_>) -> Result<(), ReadError> {
        let reading = self
            .device
            .read_temperature()
            .and_then(|t| self.device.read_humidity().map(|rh| (t, rh)));
        match reading {
            Ok((t, rh)) => {
                self.core.value = t;
                self.humidity = rh;
                self.drive_heater(ctx);
                Ok(())
            }
            Err(e) => {
                self.core.value = SANITY_FLOOR_C;
                self.drive_heater(ctx);
                Err(ReadError::device("DHT read", e))
            }
        }
    }

    fn fields(&self) -> Fields<'_> {
        let heater = if self.use_for_heater_control {
            Field::text("HeaterOn", if self.heater_on { "On" } else { "Off" })
        } else {
            Field::empty("HeaterOn")
        };
        Fields::from_iter([
            Field::number(self.core.name, self.core.value),
            heater,
            Field::number("DHTHumid", self.humidity),
        ])
    }
}
