//! Unified error types for the RoomSentinel firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's containment logic in one place.  All variants are `Copy`
//! so they can be handed to the event sink and logged without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned implausible data.
    Sensor(SensorError),
    /// A write on the character display bus failed.
    Display(DisplayError),
    /// A buzzer or indicator line could not be driven.
    Actuator(ActuatorError),
    /// The AT modem conversation failed.
    Modem(ModemError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Modem(e) => write!(f, "modem: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The temperature/humidity sensor did not answer.
    ClimateTimeout,
    /// The temperature/humidity frame failed its checksum.
    ChecksumMismatch,
    /// ADC read of the gas sensor failed.
    AdcReadFailed,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClimateTimeout => write!(f, "climate sensor timed out"),
            Self::ChecksumMismatch => write!(f, "climate frame checksum mismatch"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// A register-select, enable or data line write failed.
    BusWriteFailed,
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusWriteFailed => write!(f, "display bus write failed"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed on the buzzer line.
    BuzzerWriteFailed,
    /// GPIO set failed on one of the indicator lines.
    IndicatorWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuzzerWriteFailed => write!(f, "buzzer GPIO write failed"),
            Self::IndicatorWriteFailed => write!(f, "indicator GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Modem errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModemError {
    /// No join confirmation arrived before the join deadline.
    JoinTimeout,
    /// `join` was requested outside the `Idle` state.
    AlreadyStarted,
    /// An upload was requested before the session reached `Connected`.
    NotConnected,
    /// The modem produced no bytes after the request was written.
    NoResponse,
    /// Bytes arrived but did not contain the HTTP success status.
    UploadRejected,
    /// The serial transport reported a write or read error.
    Transport,
}

impl fmt::Display for ModemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JoinTimeout => write!(f, "network join timed out"),
            Self::AlreadyStarted => write!(f, "session already started"),
            Self::NotConnected => write!(f, "session not connected"),
            Self::NoResponse => write!(f, "no response from endpoint"),
            Self::UploadRejected => write!(f, "endpoint did not answer 200 OK"),
            Self::Transport => write!(f, "serial transport error"),
        }
    }
}

impl From<ModemError> for Error {
    fn from(e: ModemError) -> Self {
        Self::Modem(e)
    }
}

impl std::error::Error for Error {}
impl std::error::Error for SensorError {}
impl std::error::Error for DisplayError {}
impl std::error::Error for ActuatorError {}
impl std::error::Error for ModemError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
