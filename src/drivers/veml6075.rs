//! Vishay VEML6075 UVA/UVB light sensor.
//!
//! Registers are 16-bit little-endian words addressed by a command code.
//! Raw UVA/UVB counts are corrected for visible and IR leakage with the two
//! compensation channels, then scaled to a UV index.

use embedded_hal::i2c::I2c;

use crate::error::DeviceError;
use crate::sensors::uv::{UvDevice, UvSample};

use super::bus_err;

pub const DEFAULT_ADDRESS: u8 = 0x10;
pub const DEVICE_ID: u16 = 0x0026;

const REG_UV_CONF: u8 = 0x00;
const REG_UVA: u8 = 0x07;
const REG_UVB: u8 = 0x09;
const REG_UVCOMP1: u8 = 0x0A;
const REG_UVCOMP2: u8 = 0x0B;
const REG_ID: u8 = 0x0C;

/// 100 ms integration, normal dynamic range, active force off, powered on.
const CONF_IT_100MS: u16 = 0b001 << 4;

// Open-air coefficients from the application note.
const UVA_A: f64 = 2.22;
const UVA_B: f64 = 1.33;
const UVB_C: f64 = 2.95;
const UVB_D: f64 = 1.74;
const UVA_RESPONSIVITY: f64 = 0.001_461;
const UVB_RESPONSIVITY: f64 = 0.002_591;

/// Compensated (UVA, UVB) and UV index from raw channel counts.
pub fn compensate(uva: u16, uvb: u16, comp1: u16, comp2: u16) -> UvSample {
    let (c1, c2) = (f64::from(comp1), f64::from(comp2));
    let uva = f64::from(uva) - UVA_A * c1 - UVA_B * c2;
    let uvb = f64::from(uvb) - UVB_C * c1 - UVB_D * c2;
    UvSample {
        uva,
        uvb,
        index: (uva * UVA_RESPONSIVITY + uvb * UVB_RESPONSIVITY) / 2.0,
    }
}

pub struct Veml6075<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Veml6075<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDRESS,
        }
    }

    fn read_word(&mut self, reg: u8) -> Result<u16, DeviceError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(bus_err)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn write_word(&mut self, reg: u8, value: u16) -> Result<(), DeviceError> {
        let [lo, hi] = value.to_le_bytes();
        self.i2c.write(self.address, &[reg, lo, hi]).map_err(bus_err)
    }
}

impl<I: I2c> UvDevice for Veml6075<I> {
    fn begin(&mut self) -> Result<(), DeviceError> {
        let id = self.read_word(REG_ID).map_err(|_| DeviceError::NotFound)?;
        if id & 0xFF != DEVICE_ID {
            log::debug!("veml6075: unexpected id 0x{:04X}", id);
            return Err(DeviceError::NotFound);
        }
        self.write_word(REG_UV_CONF, CONF_IT_100MS)
    }

    fn read_uv(&mut self) -> Result<UvSample, DeviceError> {
        let uva = self.read_word(REG_UVA)?;
        let uvb = self.read_word(REG_UVB)?;
        let comp1 = self.read_word(REG_UVCOMP1)?;
        let comp2 = self.read_word(REG_UVCOMP2)?;
        Ok(compensate(uva, uvb, comp1, comp2))
    }
}
