//! GPIO / peripheral pin assignments for the Stardust payload board.
//!
//! Single source of truth: every driver and the sensor table in `main`
//! reference this module rather than hard-coding pin numbers.

use crate::mux::NO_MUX;

// ---------------------------------------------------------------------------
// I²C bus (multiplexer, BMP388, SCD30 ×2, VEML6075, u-blox)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// Standard-mode clock; the SCD30 does not tolerate fast mode reliably.
pub const I2C_BAUD_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Multiplexer ports of the production sensor set
// ---------------------------------------------------------------------------

/// The u-blox needs its DDC port visible between polls.
pub const GPS_MUX_PORT: i32 = NO_MUX;
pub const CO2_OLD_MUX_PORT: i32 = 1;
pub const PRESSURE_MUX_PORT: i32 = 2;
pub const CO2_NEW_MUX_PORT: i32 = 4;
pub const UV_MUX_PORT: i32 = 7;

// ---------------------------------------------------------------------------
// Analog battery taps (ADC1)
// ---------------------------------------------------------------------------

/// 9 V battery behind a 2:1 divider.
pub const VOLT9_ADC_GPIO: i32 = 1;
/// 3.7 V LiPo cell.
pub const VOLT37_ADC_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Single-wire temperature sensors
// ---------------------------------------------------------------------------

/// DHT22 outside temperature / humidity.
pub const EXTERN_TEMP_GPIO: i32 = 39;
/// DS18B20 inside the payload box.
pub const INTERN_TEMP_GPIO: i32 = 37;
/// DS18B20 on the outside of the box.
pub const OUT_DS18B_TEMP_GPIO: i32 = 47;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Heater element MOSFET gate.
pub const HEATER_GPIO: i32 = 21;
/// Heater indicator LED.
pub const HEATER_LED_GPIO: i32 = 14;
/// Lit while the GPS has a fix.
pub const GPS_FIX_LED_GPIO: i32 = 45;

/// Status indicator LEDs driven from the fault list.
pub const STATUS_LED_RED_GPIO: i32 = 10;
pub const STATUS_LED_GREEN_GPIO: i32 = 11;
pub const STATUS_LED_YELLOW_GPIO: i32 = 12;
pub const STATUS_LED_BLUE_GPIO: i32 = 13;
