//! Device drivers for the payload's I2C sensors and GPIO outputs.
//!
//! Every driver is generic over the `embedded-hal` 1.0 traits so the same
//! code runs on the ESP32 I2C peripheral, behind an
//! `embedded_hal_bus::i2c::RefCellDevice` on a shared bus, or against a
//! scripted bus in tests.  Each implements the device trait its sensor
//! variant consumes.

pub mod bmp388;
pub mod heater;
pub mod nmea;
pub mod scd30;
pub mod ublox;
pub mod veml6075;

use crate::error::DeviceError;

/// Collapse any bus error into [`DeviceError::Bus`], keeping the detail in
/// the debug log.
pub(crate) fn bus_err<E: core::fmt::Debug>(e: E) -> DeviceError {
    log::debug!("i2c: {:?}", e);
    DeviceError::Bus
}
