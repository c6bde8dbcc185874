//! Application core: pure acquisition logic, zero I/O.
//!
//! The acquisition cycle drives every sensor through its lifecycle and
//! assembles the per-cycle record.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod engine;
pub mod ports;

pub use engine::{AcquisitionCycle, CycleReport};
