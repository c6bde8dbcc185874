//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to                    |
//! |------------|------------|--------------------------------|
//! | `log_sink` | LogSink    | Serial log output              |
//! | `time`     | Clock      | ESP32 system timer / `Instant` |
//!
//! The multiplexer ([`crate::mux::BusMultiplexer`]) and heater
//! ([`crate::drivers::heater::GpioHeater`]) adapters sit with the drivers
//! because they are plain `embedded-hal` code.

pub mod log_sink;
pub mod time;
