//! Closed-loop control.

pub mod heater;

pub use heater::HeaterController;
