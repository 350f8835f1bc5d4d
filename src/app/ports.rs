//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Two layers live here:
//!
//! - **Capability ports** (`Clock`, `ClimateSensor`, `GasSensor`) are the
//!   raw contracts the drivers are built on.  GPIO lines use
//!   `embedded_hal::digital::OutputPin` directly and the serial link uses
//!   [`SerialTransport`](crate::modem::transport::SerialTransport).
//! - **Component ports** (`SensorPort`, `DisplayPort`, `AlertPort`,
//!   `UplinkPort`, `EventSink`) are what the
//!   [`ControlLoop`](super::service::ControlLoop) consumes, so the loop can
//!   be exercised with mocks and no pins at all.

use embedded_hal::delay::DelayNs;

use crate::drivers::alerts::ActuationState;
use crate::error::{ActuatorError, DisplayError, ModemError, SensorError};
use crate::modem::SessionState;
use crate::modem::request::TelemetryRecord;
use crate::sensors::SensorReading;

// ───────────────────────────────────────────────────────────────
// Time
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus blocking delays.
///
/// Every wait in the firmware goes through this trait.  Simulated clocks
/// advance `now_ms()` by exactly the delayed amount, which makes deadline
/// expiry deterministic under test.
pub trait Clock: DelayNs {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// External sensor-driver contracts
// ───────────────────────────────────────────────────────────────

/// One-wire temperature/humidity sensor (DHT11 class).
///
/// `measure()` triggers and latches a conversion; the accessors return the
/// latched values until the next successful `measure()`.
pub trait ClimateSensor {
    fn measure(&mut self) -> Result<(), SensorError>;

    /// Degrees Celsius from the last measurement.
    fn temperature(&self) -> f32;

    /// Relative humidity (%RH) from the last measurement.
    fn humidity(&self) -> f32;
}

/// Analog gas sensor sampled as a full-scale 16-bit value.
pub trait GasSensor {
    fn read_raw_u16(&mut self) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Component ports consumed by the control loop
// ───────────────────────────────────────────────────────────────

/// Produces one validated [`SensorReading`] per call.
pub trait SensorPort {
    fn acquire(&mut self) -> Result<SensorReading, SensorError>;
}

/// Two-line status display.  Each call replaces the whole content.
pub trait DisplayPort {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError>;
}

/// Buzzer and indicator outputs driven from the lifespan estimate.
pub trait AlertPort {
    fn apply(&mut self, remaining_days: f32) -> Result<ActuationState, ActuatorError>;
}

/// Telemetry uplink session.
pub trait UplinkPort {
    /// Bring the link up once.  Blocks until joined or the deadline passes.
    fn join(&mut self, ssid: &str, password: &str) -> Result<(), ModemError>;

    /// Push one record.  Only valid once joined.
    fn upload(&mut self, record: &TelemetryRecord) -> Result<(), ModemError>;

    fn state(&self) -> SessionState;
}

/// The domain emits structured [`SentinelEvent`](super::events::SentinelEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::SentinelEvent);
}
