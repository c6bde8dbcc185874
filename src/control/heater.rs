//! Payload heater thermostat
//!
//! Two fixed thresholds with a dead band between them.  The decision is
//! recomputed from every sample with no memory of the previous state, so a
//! sample inside the band switches the heater off.  A sample at or below
//! the sanity floor (absolute zero, which is what a failed temperature read
//! reports) also switches it off.

use log::{debug, info};

use crate::app::ports::HeaterSwitch;

/// Below this the heater turns on (°C).
pub const HEATER_LOW_LIMIT_C: f64 = 4.0;
/// Above this the heater turns off (°C).
pub const HEATER_HIGH_LIMIT_C: f64 = 5.0;
/// Samples at or below this are not physical.
pub const SANITY_FLOOR_C: f64 = -273.0;

/// Pure thermostat decision for one sample.
pub fn decide(sample_c: f64) -> bool {
    // Above the high limit, inside the dead band, at the floor or NaN: off.
    sample_c < HEATER_LOW_LIMIT_C && sample_c > SANITY_FLOOR_C
}

pub struct HeaterController {
    switch: Box<dyn HeaterSwitch>,
    heater_on: bool,
}

impl HeaterController {
    pub fn new(switch: Box<dyn HeaterSwitch>) -> Self {
        Self {
            switch,
            heater_on: false,
        }
    }

    /// Drive the output low before the first sample arrives.
    pub fn init(&mut self) {
        self.switch.switch(false);
        self.heater_on = false;
        info!("heater: output initialised off");
    }

    /// Apply the thermostat to `sample_c` and return the new state.
    pub fn heater_on_off(&mut self, sample_c: f64) -> bool {
        let on = decide(sample_c);
        if on != self.heater_on {
            info!("heater: {} at {:.2} C", if on { "ON" } else { "OFF" }, sample_c);
        } else {
            debug!("heater: stays {} at {:.2} C", if on { "ON" } else { "OFF" }, sample_c);
        }
        self.switch.switch(on);
        self.heater_on = on;
        on
    }

    /// Last decision, for reporting only.
    pub fn is_on(&self) -> bool {
        self.heater_on
    }
}
