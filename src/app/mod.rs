//! Application core: orchestration logic, zero direct I/O.
//!
//! The control loop sequences sample → compute → actuate → render →
//! upload → sleep.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
