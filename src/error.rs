//! Unified error and fault vocabulary for the Stardust payload.
//!
//! Two severities exist and they never mix:
//!
//! - **Permanent**: a device failed bring-up.  The sensor returns an
//!   [`InitError`], is marked unavailable, and a [`FaultCode`] is handed to
//!   the fault reporter for the indicator LEDs.
//! - **Transient**: one cycle's hardware transaction failed.  The sensor
//!   returns a [`ReadError`]; the record shows blanks for that cycle only.
//!
//! Low-level drivers speak [`DeviceError`] and the sensors translate.

use core::fmt;

// ---------------------------------------------------------------------------
// Fault codes (indicator collaborator)
// ---------------------------------------------------------------------------

/// Closed set of failure classes shown on the status LEDs.
///
/// The discriminants are the numeric codes the indicator board flashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaultCode {
    /// SD card missing or failed to mount.
    Disk = 1,
    /// GPS receiver not detected.
    Gps = 2,
    /// DHT22 outside temperature/humidity sensor not found.
    Dht = 3,
    /// BMP388 pressure/altitude sensor not found.
    Pressure = 4,
    /// SCD30 CO2 sensor not found.
    Co2 = 5,
    /// VEML6075 UV sensor not found.
    Uv = 6,
    /// DS18B20 one-wire temperature sensor not found.
    Ds18b = 7,
}

impl FaultCode {
    /// Numeric code as flashed by the indicator.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Reverse lookup from the numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Disk),
            2 => Some(Self::Gps),
            3 => Some(Self::Dht),
            4 => Some(Self::Pressure),
            5 => Some(Self::Co2),
            6 => Some(Self::Uv),
            7 => Some(Self::Ds18b),
            _ => None,
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disk => write!(f, "disk not found"),
            Self::Gps => write!(f, "GPS not found"),
            Self::Dht => write!(f, "DHT sensor not found"),
            Self::Pressure => write!(f, "BMP388 not found"),
            Self::Co2 => write!(f, "CO2 sensor not found"),
            Self::Uv => write!(f, "UV sensor not found"),
            Self::Ds18b => write!(f, "DS18B sensor not found"),
        }
    }
}

// ---------------------------------------------------------------------------
// Device (driver-level) errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// The device did not answer or reported the wrong identity.
    NotFound,
    /// A bus transaction failed.
    Bus,
    /// A checksum over returned data did not match.
    Crc,
    /// The device has not finished a conversion.
    NotReady,
    /// Data arrived but is not physically meaningful.
    InvalidData,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "device not found"),
            Self::Bus => write!(f, "bus transaction failed"),
            Self::Crc => write!(f, "checksum mismatch"),
            Self::NotReady => write!(f, "conversion not ready"),
            Self::InvalidData => write!(f, "invalid data"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Permanent bring-up failure returned by a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitError {
    pub code: FaultCode,
    pub message: &'static str,
}

impl InitError {
    pub const fn new(code: FaultCode, message: &'static str) -> Self {
        Self { code, message }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code.code())
    }
}

/// Transient read failure; the message ends up as the sensor's last error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError(pub String);

impl ReadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// A read failure caused by a driver error, prefixed with what was
    /// being attempted.
    pub fn device(context: &str, err: DeviceError) -> Self {
        Self(format!("{context}: {err}"))
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The line has no `=` separator.
    MissingSeparator,
    /// The value could not be parsed for the key's type.
    InvalidValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "missing '=' separator"),
            Self::InvalidValue(key) => write!(f, "invalid value for {key}"),
        }
    }
}
