//! TCA9548A-style I2C bus multiplexer.
//!
//! Several payload devices answer at the same bus address (two SCD30s at
//! 0x61, for instance).  Each sits behind its own multiplexer port and is
//! only visible while that port's bit is set in the multiplexer's 8-bit
//! control register.
//!
//! Every enable/disable is a full read-modify-write of the register so
//! that other open ports are left untouched.  The acquisition cycle is
//! single threaded and hands the multiplexer to one sensor at a time as a
//! `&mut`, so only one port bracket can ever be open; a build that shares
//! the multiplexer across threads must wrap it in a mutex.

use embedded_hal::i2c::I2c;
use log::{debug, warn};

use crate::app::ports::MuxControl;

/// Bus address of the multiplexer.
pub const MUX_ADDRESS: u8 = 0x70;

/// Raw port value meaning "wired directly, not behind the multiplexer".
pub const NO_MUX: i32 = -1;

/// Highest multiplexer port; larger requests are clamped to it.
pub const MAX_MUX_PORT: u8 = 7;

/// Where a device is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxPort {
    /// Wired straight to the bus; no bracket needed.
    Direct,
    /// Behind the multiplexer on the given port.
    Channel(u8),
}

impl MuxPort {
    /// Interpret a raw pin-table value.  Any negative value (including
    /// [`NO_MUX`]) means direct wiring; anything above 7 is clamped to 7.
    pub fn from_raw(raw: i32) -> Self {
        if raw < 0 {
            Self::Direct
        } else {
            Self::Channel(raw.min(i32::from(MAX_MUX_PORT)) as u8)
        }
    }

    /// Register bit for this port, or `None` for direct wiring.
    pub fn mask(self) -> Option<u8> {
        match self {
            Self::Direct => None,
            Self::Channel(ch) => Some(1 << ch.min(MAX_MUX_PORT)),
        }
    }
}

/// Driver for the multiplexer's control register.
pub struct BusMultiplexer<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> BusMultiplexer<I> {
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, MUX_ADDRESS)
    }

    pub fn with_address(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Current value of the port-enable register.
    pub fn read_register(&mut self) -> Result<u8, I::Error> {
        let mut buf = [0u8; 1];
        self.i2c.read(self.address, &mut buf)?;
        Ok(buf[0])
    }

    /// Read the register, apply `f`, write the result back.
    fn modify(&mut self, f: impl FnOnce(u8) -> u8) -> Result<u8, I::Error> {
        let settings = f(self.read_register()?);
        self.i2c.write(self.address, &[settings])?;
        Ok(settings)
    }

    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> MuxControl for BusMultiplexer<I> {
    fn enable_port(&mut self, port: MuxPort) {
        let Some(mask) = port.mask() else {
            return;
        };
        match self.modify(|settings| settings | mask) {
            Ok(settings) => debug!("mux: enabled {:?}, register=0b{:08b}", port, settings),
            Err(e) => warn!("mux: enable {:?} failed: {:?}", port, e),
        }
    }

    fn disable_port(&mut self, port: MuxPort) {
        let Some(mask) = port.mask() else {
            return;
        };
        match self.modify(|settings| settings & !mask) {
            Ok(settings) => debug!("mux: disabled {:?}, register=0b{:08b}", port, settings),
            Err(e) => warn!("mux: disable {:?} failed: {:?}", port, e),
        }
    }
}
