//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, test journal, ...).

use crate::control::lifespan::LifespanEstimate;
use crate::drivers::alerts::ActuationState;
use crate::error::{Error, ModemError, SensorError};
use crate::sensors::SensorReading;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum SentinelEvent {
    /// The modem confirmed the network join.
    Joined,

    /// The one-time join failed; the sampling loop will not start.
    JoinFailed(ModemError),

    /// Sensor acquisition failed; the iteration ended early.
    SensorFault(SensorError),

    /// Buzzer/indicator or display write failed; the iteration ended
    /// before the upload and the loop carries on.
    OutputFault(Error),

    /// A full iteration completed.
    Cycle(CycleReport),
}

/// Summary of one completed control-loop iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub iteration: u64,
    pub reading: SensorReading,
    pub lifespan: LifespanEstimate,
    pub actuation: ActuationState,
    /// `Ok` when the endpoint answered `200 OK`.
    pub upload: Result<(), ModemError>,
}
