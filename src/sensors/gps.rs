//! GNSS position sensor (u-blox receivers over I2C).
//!
//! Primary value is altitude in metres; latitude and longitude follow in
//! degrees.  Losing or regaining a fix is not a failure.  Each transition
//! is written to the event log once with the minutes spent in the previous
//! state, and a fix LED mirrors the current state.

use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::error::{DeviceError, FaultCode, InitError, ReadError};
use crate::mux::MuxPort;
use crate::record::{Field, Fields};

use super::{Sensor, SensorContext, SensorCore};

/// Position as the NMEA parser reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GnssPosition {
    /// Millionths of a degree, north positive.
    pub latitude_millionths: i64,
    /// Millionths of a degree, east positive.
    pub longitude_millionths: i64,
    /// Millimetres above mean sea level, when the receiver gave one.
    pub altitude_mm: Option<i64>,
}

/// Device side of a GNSS receiver.
pub trait GnssReceiver {
    fn begin(&mut self) -> Result<(), DeviceError>;
    /// Drain whatever the receiver has buffered into the parser.
    fn poll(&mut self) -> Result<(), DeviceError>;
    /// Latest valid position, `None` while the receiver has no fix.
    fn position(&self) -> Option<GnssPosition>;
    /// Receiver fix type; 0 means no fix.
    fn fix_type(&self) -> u8;
}

pub struct GpsSensor<G, P> {
    core: SensorCore,
    device: G,
    fix_led: P,
    has_fix: bool,
    fix_changed_ms: u64,
    latitude: f64,
    longitude: f64,
}

impl<G: GnssReceiver, P: OutputPin> GpsSensor<G, P> {
    pub fn new(name: &'static str, pin: i32, mux_port: MuxPort, device: G, fix_led: P) -> Self {
        Self {
            core: SensorCore::new(name, pin, mux_port),
            device,
            fix_led,
            has_fix: false,
            fix_changed_ms: 0,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    pub fn has_fix(&self) -> bool {
        self.has_fix
    }

    pub fn altitude_m(&self) -> f64 {
        self.core.value
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    fn set_fix_led(&mut self, on: bool) {
        let result = if on {
            self.fix_led.set_high()
        } else {
            self.fix_led.set_low()
        };
        if let Err(e) = result {
            warn!("{}: fix LED: {:?}", self.core.name, e);
        }
    }

    /// Log a fix transition and restart the timer.
    fn fix_changed(&mut self, ctx: &mut SensorContext<'_>, what: &str) {
        let now = ctx.clock.millis();
        let minutes = now.saturating_sub(self.fix_changed_ms) as f64 / 1000.0 / 60.0;
        let msg = format!("{what} in{minutes:8.1} minutes");
        info!("{}: {}", self.core.name, msg);
        ctx.log.log_msg(&msg);
        self.fix_changed_ms = now;
    }
}

impl<G: GnssReceiver, P: OutputPin> Sensor for GpsSensor<G, P> {
    fn core(&self) -> &SensorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SensorCore {
        &mut self.core
    }

    fn bring_up(&mut self, ctx: &mut SensorContext<'_>) -> Result<(), InitError> {
        self.set_fix_led(false);
        self.device.begin().map_err(|_| {
            InitError::new(
                FaultCode::Gps,
                "u-blox GNSS not detected at default I2C address 0x42. Please check wiring.",
            )
        })?;
        self.has_fix = false;
        self.fix_changed_ms = ctx.clock.millis();
        self.core.value = 0.0;
        self.latitude = 0.0;
        self.longitude = 0.0;
        Ok(())
    }

    fn sample(&mut self, ctx: &mut SensorContext<'_>) -> Result<(), ReadError> {
        self.device
            .poll()
            .map_err(|e| ReadError::device("GNSS poll", e))?;

        if let Some(pos) = self.device.position() {
            self.set_fix_led(true);
            if !self.has_fix && self.device.fix_type() > 0 {
                self.has_fix = true;
                self.fix_changed(ctx, "Established fix");
            }
            self.latitude = pos.latitude_millionths as f64 / 1_000_000.0;
            self.longitude = pos.longitude_millionths as f64 / 1_000_000.0;
            // No altitude in this fix: keep the last one.
            if let Some(mm) = pos.altitude_mm {
                self.core.value = mm as f64 / 1000.0;
            }
        } else if self.device.fix_type() == 0 {
            self.set_fix_led(false);
            if self.has_fix {
                self.has_fix = false;
                self.fix_changed(ctx, "Lost fix");
            }
        }
        Ok(())
    }

    fn fields(&self) -> Fields<'_> {
        Fields::from_iter([
            Field::number_with("Altitude", self.core.value, 8, 1),
            Field::number_with("Latitude", self.latitude, 10, 6),
            Field::number_with("Longitude", self.longitude, 10, 6),
        ])
    }
}
