//! Bosch BMP388 barometric pressure sensor.
//!
//! Configured once for T ×8 / P ×4 oversampling, IIR coefficient 3 and a
//! 50 Hz output data rate, then read in forced mode: each reading triggers
//! one conversion, waits for both data-ready flags and applies the
//! datasheet's floating-point compensation to the raw counts.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::debug;

use crate::error::DeviceError;
use crate::sensors::pressure::{BaroSample, Barometer};

use super::bus_err;

pub const DEFAULT_ADDRESS: u8 = 0x77;
pub const CHIP_ID: u8 = 0x50;

const REG_CHIP_ID: u8 = 0x00;
const REG_STATUS: u8 = 0x03;
const REG_DATA: u8 = 0x04;
const REG_PWR_CTRL: u8 = 0x1B;
const REG_OSR: u8 = 0x1C;
const REG_ODR: u8 = 0x1D;
const REG_CONFIG: u8 = 0x1F;
const REG_CALIB: u8 = 0x31;
const REG_CMD: u8 = 0x7E;

const CMD_SOFT_RESET: u8 = 0xB6;
/// Pressure and temperature enabled, forced mode.
const PWR_FORCED: u8 = 0x13;
/// osr_t = ×8, osr_p = ×4.
const OSR_T8_P4: u8 = (0b011 << 3) | 0b010;
const ODR_50_HZ: u8 = 0x02;
const IIR_COEFF_3: u8 = 0b010 << 1;

const STATUS_DRDY_PRESS: u8 = 1 << 5;
const STATUS_DRDY_TEMP: u8 = 1 << 6;

const CALIB_LEN: usize = 21;
const READY_POLLS: u32 = 50;
const READY_POLL_MS: u32 = 2;

/// Compensation coefficients, already scaled to floating point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calibration {
    t1: f64,
    t2: f64,
    t3: f64,
    p1: f64,
    p2: f64,
    p3: f64,
    p4: f64,
    p5: f64,
    p6: f64,
    p7: f64,
    p8: f64,
    p9: f64,
    p10: f64,
    p11: f64,
}

impl Calibration {
    /// Decode the NVM block starting at register 0x31.
    pub fn from_nvm(b: &[u8; CALIB_LEN]) -> Self {
        let u16le = |i: usize| f64::from(u16::from_le_bytes([b[i], b[i + 1]]));
        let i16le = |i: usize| f64::from(i16::from_le_bytes([b[i], b[i + 1]]));
        let i8at = |i: usize| f64::from(b[i] as i8);
        Self {
            t1: u16le(0) * 2f64.powi(8),
            t2: u16le(2) / 2f64.powi(30),
            t3: i8at(4) / 2f64.powi(48),
            p1: (i16le(5) - 2f64.powi(14)) / 2f64.powi(20),
            p2: (i16le(7) - 2f64.powi(14)) / 2f64.powi(29),
            p3: i8at(9) / 2f64.powi(32),
            p4: i8at(10) / 2f64.powi(37),
            p5: u16le(11) * 2f64.powi(3),
            p6: u16le(13) / 2f64.powi(6),
            p7: i8at(15) / 2f64.powi(8),
            p8: i8at(16) / 2f64.powi(15),
            p9: i16le(17) / 2f64.powi(48),
            p10: i8at(19) / 2f64.powi(48),
            p11: i8at(20) / 2f64.powi(65),
        }
    }

    /// Linearised temperature in °C.
    pub fn temperature(&self, raw: u32) -> f64 {
        let d1 = f64::from(raw) - self.t1;
        let d2 = d1 * self.t2;
        d2 + d1 * d1 * self.t3
    }

    /// Pressure in Pa for a raw count at linearised temperature `t_lin`.
    pub fn pressure(&self, raw: u32, t_lin: f64) -> f64 {
        let up = f64::from(raw);
        let t2 = t_lin * t_lin;
        let t3 = t2 * t_lin;
        let out1 = self.p5 + self.p6 * t_lin + self.p7 * t2 + self.p8 * t3;
        let out2 = up * (self.p1 + self.p2 * t_lin + self.p3 * t2 + self.p4 * t3);
        let out3 = up * up * (self.p9 + self.p10 * t_lin) + up * up * up * self.p11;
        out1 + out2 + out3
    }
}

pub struct Bmp388<I, D> {
    i2c: I,
    delay: D,
    address: u8,
    calib: Calibration,
}

impl<I: I2c, D: DelayNs> Bmp388<I, D> {
    pub fn new(i2c: I, delay: D) -> Self {
        Self::with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    pub fn with_address(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            calib: Calibration::default(),
        }
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calib
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), DeviceError> {
        self.i2c.write(self.address, &[reg, value]).map_err(bus_err)
    }

    fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), DeviceError> {
        self.i2c.write_read(self.address, &[reg], buf).map_err(bus_err)
    }

    fn wait_ready(&mut self) -> Result<(), DeviceError> {
        let want = STATUS_DRDY_PRESS | STATUS_DRDY_TEMP;
        for _ in 0..READY_POLLS {
            let mut status = [0u8; 1];
            self.read_regs(REG_STATUS, &mut status)?;
            if status[0] & want == want {
                return Ok(());
            }
            self.delay.delay_ms(READY_POLL_MS);
        }
        Err(DeviceError::NotReady)
    }
}

impl<I: I2c, D: DelayNs> Barometer for Bmp388<I, D> {
    fn begin(&mut self) -> Result<(), DeviceError> {
        let mut id = [0u8; 1];
        self.read_regs(REG_CHIP_ID, &mut id)
            .map_err(|_| DeviceError::NotFound)?;
        if id[0] != CHIP_ID {
            debug!("bmp388: unexpected chip id 0x{:02X}", id[0]);
            return Err(DeviceError::NotFound);
        }
        self.write_reg(REG_CMD, CMD_SOFT_RESET)?;
        self.delay.delay_ms(10);

        let mut nvm = [0u8; CALIB_LEN];
        self.read_regs(REG_CALIB, &mut nvm)?;
        self.calib = Calibration::from_nvm(&nvm);

        self.write_reg(REG_OSR, OSR_T8_P4)?;
        self.write_reg(REG_CONFIG, IIR_COEFF_3)?;
        self.write_reg(REG_ODR, ODR_50_HZ)?;
        Ok(())
    }

    fn perform_reading(&mut self) -> Result<BaroSample, DeviceError> {
        self.write_reg(REG_PWR_CTRL, PWR_FORCED)?;
        self.wait_ready()?;

        let mut raw = [0u8; 6];
        self.read_regs(REG_DATA, &mut raw)?;
        let up = u32::from_le_bytes([raw[0], raw[1], raw[2], 0]);
        let ut = u32::from_le_bytes([raw[3], raw[4], raw[5], 0]);

        let temperature_c = self.calib.temperature(ut);
        let pressure_pa = self.calib.pressure(up, temperature_c);
        if !pressure_pa.is_finite() || pressure_pa <= 0.0 {
            return Err(DeviceError::InvalidData);
        }
        Ok(BaroSample {
            pressure_pa,
            temperature_c,
        })
    }
}
