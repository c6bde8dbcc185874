//! Battery voltage monitor on a 10-bit ADC channel.
//!
//! One reading path serves both batteries.  The 9 V battery sits behind a
//! divide-by-two network so its reading is doubled.  There is no
//! low-voltage cutoff: a sagging battery is logged, never acted on.

use crate::error::{DeviceError, InitError, ReadError};
use crate::mux::MuxPort;
use crate::record::{Field, Fields};

use super::{Sensor, SensorContext, SensorCore};

/// ADC full-scale count.
pub const ADC_COUNTS: f64 = 1024.0;
/// ADC reference voltage.
pub const ADC_REFERENCE_V: f64 = 5.0;

/// Raw ADC access for one channel.
pub trait AnalogInput {
    fn read_raw(&mut self) -> Result<u16, DeviceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryKind {
    /// 9 V pack behind a 2:1 divider.
    NineVolt,
    /// Single 3.7 V LiPo cell, read directly.
    LiPo,
}

impl BatteryKind {
    fn divider(self) -> f64 {
        match self {
            Self::NineVolt => 2.0,
            Self::LiPo => 1.0,
        }
    }
}

/// Volts at the battery for a raw ADC count.
pub fn counts_to_volts(raw: u16, kind: BatteryKind) -> f64 {
    f64::from(raw) * ADC_REFERENCE_V / ADC_COUNTS * kind.divider()
}

pub struct VoltSensor<A> {
    core: SensorCore,
    adc: A,
    kind: BatteryKind,
}

impl<A: AnalogInput> VoltSensor<A> {
    pub fn new(name: &'static str, pin: i32, kind: BatteryKind, adc: A) -> Self {
        Self {
            core: SensorCore::new(name, pin, MuxPort::Direct),
            adc,
            kind,
        }
    }

    pub fn kind(&self) -> BatteryKind {
        self.kind
    }

    pub fn volts(&self) -> f64 {
        self.core.value
    }
}

impl<A: AnalogInput> Sensor for VoltSensor<A> {
    fn core(&self) -> &SensorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SensorCore {
        &mut self.core
    }

    fn bring_up(&mut self, _ctx: &mut SensorContext<'_>) -> Result<(), InitError> {
        Ok(())
    }

    fn sample(&mut self, _ctx: &mut SensorContext<'_>) -> Result<(), ReadError> {
        let raw = self
            .adc
            .read_raw()
            .map_err(|e| ReadError::device("ADC read", e))?;
        self.core.value = counts_to_volts(raw, self.kind);
        Ok(())
    }

    fn fields(&self) -> Fields<'_> {
        Fields::from_iter([Field::number(self.core.name, self.core.value)])
    }
}
