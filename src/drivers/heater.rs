//! Heater element and heater indicator LED on two GPIO outputs.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::HeaterSwitch;

pub struct GpioHeater<H, L> {
    heater: H,
    led: L,
}

impl<H: OutputPin, L: OutputPin> GpioHeater<H, L> {
    pub fn new(heater: H, led: L) -> Self {
        Self { heater, led }
    }

    pub fn release(self) -> (H, L) {
        (self.heater, self.led)
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool) -> Result<(), P::Error> {
    if on { pin.set_high() } else { pin.set_low() }
}

impl<H: OutputPin, L: OutputPin> HeaterSwitch for GpioHeater<H, L> {
    fn switch(&mut self, on: bool) {
        if let Err(e) = drive(&mut self.heater, on) {
            warn!("heater: element output failed: {:?}", e);
        }
        if let Err(e) = drive(&mut self.led, on) {
            warn!("heater: LED output failed: {:?}", e);
        }
    }
}
