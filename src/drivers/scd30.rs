//! Sensirion SCD30 NDIR CO2 sensor.
//!
//! Commands are 16-bit big-endian words, optionally followed by one
//! argument word.  Every word on the wire, in either direction, carries a
//! CRC-8 (poly 0x31, init 0xFF).  Reads are a command write, a short pause
//! and a separate read.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::error::DeviceError;
use crate::sensors::co2::{Co2Monitor, Co2Sample};

use super::bus_err;

pub const DEFAULT_ADDRESS: u8 = 0x61;

const CMD_START_CONTINUOUS: u16 = 0x0010;
const CMD_SET_INTERVAL: u16 = 0x4600;
const CMD_DATA_READY: u16 = 0x0202;
const CMD_READ_MEASUREMENT: u16 = 0x0300;
const CMD_FIRMWARE_VERSION: u16 = 0xD100;

/// Pause between a command and its response.
const RESPONSE_DELAY_MS: u32 = 3;

/// Sensirion CRC-8 over one data word.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 == 0 {
                crc << 1
            } else {
                (crc << 1) ^ 0x31
            };
        }
    }
    crc
}

pub struct Scd30<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> Scd30<I, D> {
    pub fn new(i2c: I, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: DEFAULT_ADDRESS,
        }
    }

    fn command(&mut self, cmd: u16, arg: Option<u16>) -> Result<(), DeviceError> {
        let [c0, c1] = cmd.to_be_bytes();
        let result = match arg {
            None => self.i2c.write(self.address, &[c0, c1]),
            Some(arg) => {
                let [a0, a1] = arg.to_be_bytes();
                self.i2c
                    .write(self.address, &[c0, c1, a0, a1, crc8(&[a0, a1])])
            }
        };
        result.map_err(bus_err)
    }

    /// Issue `cmd` and read back `words.len()` CRC-checked words.
    fn read_words(&mut self, cmd: u16, words: &mut [u16]) -> Result<(), DeviceError> {
        self.command(cmd, None)?;
        self.delay.delay_ms(RESPONSE_DELAY_MS);

        let mut raw = [0u8; 18];
        let raw = raw
            .get_mut(..words.len() * 3)
            .ok_or(DeviceError::InvalidData)?;
        self.i2c.read(self.address, raw).map_err(bus_err)?;

        for (word, chunk) in words.iter_mut().zip(raw.chunks_exact(3)) {
            if crc8(&chunk[..2]) != chunk[2] {
                return Err(DeviceError::Crc);
            }
            *word = u16::from_be_bytes([chunk[0], chunk[1]]);
        }
        Ok(())
    }

    /// Firmware version as (major, minor).
    pub fn firmware_version(&mut self) -> Result<(u8, u8), DeviceError> {
        let mut word = [0u16; 1];
        self.read_words(CMD_FIRMWARE_VERSION, &mut word)?;
        let [major, minor] = word[0].to_be_bytes();
        Ok((major, minor))
    }
}

impl<I: I2c, D: DelayNs> Co2Monitor for Scd30<I, D> {
    fn begin(&mut self) -> Result<(), DeviceError> {
        let (major, minor) = self.firmware_version().map_err(|_| DeviceError::NotFound)?;
        log::info!("scd30: firmware {}.{}", major, minor);
        // Argument 0: no ambient pressure compensation.
        self.command(CMD_START_CONTINUOUS, Some(0))
    }

    fn set_measurement_interval(&mut self, seconds: u16) -> Result<(), DeviceError> {
        self.command(CMD_SET_INTERVAL, Some(seconds))
    }

    fn data_ready(&mut self) -> Result<bool, DeviceError> {
        let mut word = [0u16; 1];
        self.read_words(CMD_DATA_READY, &mut word)?;
        Ok(word[0] == 1)
    }

    fn read_measurement(&mut self) -> Result<Co2Sample, DeviceError> {
        let mut w = [0u16; 6];
        self.read_words(CMD_READ_MEASUREMENT, &mut w)?;
        let f = |hi: u16, lo: u16| f64::from(f32::from_bits((u32::from(hi) << 16) | u32::from(lo)));
        let sample = Co2Sample {
            co2_ppm: f(w[0], w[1]),
            temperature_c: f(w[2], w[3]),
            relative_humidity: f(w[4], w[5]),
        };
        if !(sample.co2_ppm.is_finite()
            && sample.temperature_c.is_finite()
            && sample.relative_humidity.is_finite())
        {
            return Err(DeviceError::InvalidData);
        }
        Ok(sample)
    }
}
