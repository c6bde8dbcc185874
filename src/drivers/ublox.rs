//! u-blox GNSS receiver on the DDC (I2C) port.
//!
//! The receiver exposes a byte count at registers 0xFD/0xFE and a stream
//! register at 0xFF.  Each poll drains whatever is pending into the NMEA
//! parser in bus-friendly chunks.

use embedded_hal::i2c::I2c;
use log::debug;

use crate::error::DeviceError;
use crate::sensors::gps::{GnssPosition, GnssReceiver};

use super::bus_err;
use super::nmea::NmeaParser;

pub const DEFAULT_ADDRESS: u8 = 0x42;

const REG_BYTES_AVAILABLE: u8 = 0xFD;
const REG_STREAM: u8 = 0xFF;

/// Largest single read from the stream register.
const CHUNK: usize = 32;
/// Upper bound on bytes drained per poll, so one poll cannot stall the cycle.
const MAX_DRAIN: usize = 2048;

pub struct Ublox<I> {
    i2c: I,
    address: u8,
    parser: NmeaParser,
}

impl<I: I2c> Ublox<I> {
    pub fn new(i2c: I) -> Self {
        Self {
            i2c,
            address: DEFAULT_ADDRESS,
            parser: NmeaParser::new(),
        }
    }

    pub fn parser(&self) -> &NmeaParser {
        &self.parser
    }

    fn bytes_available(&mut self) -> Result<usize, DeviceError> {
        let mut count = [0u8; 2];
        self.i2c
            .write_read(self.address, &[REG_BYTES_AVAILABLE], &mut count)
            .map_err(bus_err)?;
        // 0xFFFF means the count is not ready yet.
        Ok(match u16::from_be_bytes(count) {
            0xFFFF => 0,
            n => usize::from(n),
        })
    }
}

impl<I: I2c> GnssReceiver for Ublox<I> {
    fn begin(&mut self) -> Result<(), DeviceError> {
        self.bytes_available().map_err(|_| DeviceError::NotFound)?;
        Ok(())
    }

    fn poll(&mut self) -> Result<(), DeviceError> {
        let mut remaining = self.bytes_available()?.min(MAX_DRAIN);
        if remaining == 0 {
            return Ok(());
        }
        debug!("ublox: draining {} bytes", remaining);
        let mut chunk = [0u8; CHUNK];
        while remaining > 0 {
            let n = remaining.min(CHUNK);
            self.i2c
                .write_read(self.address, &[REG_STREAM], &mut chunk[..n])
                .map_err(bus_err)?;
            // 0xFF is the idle filler byte, never part of a sentence.
            for &b in chunk[..n].iter().filter(|&&b| b != 0xFF) {
                self.parser.push(b);
            }
            remaining -= n;
        }
        Ok(())
    }

    fn position(&self) -> Option<GnssPosition> {
        self.parser.position()
    }

    fn fix_type(&self) -> u8 {
        self.parser.fix_quality()
    }
}
