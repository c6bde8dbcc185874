//! Stardust balloon payload firmware library.
//!
//! Exposes the acquisition core, sensors and drivers for integration
//! testing and for the ESP-IDF binary.  All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod faults;
pub mod mux;
pub mod pins;
pub mod record;
pub mod sensors;
