//! System configuration parameters
//!
//! All tunable parameters for the RoomSentinel system.  Nothing here is
//! persisted; the firmware binary assembles a config at boot and rejects
//! it if [`SystemConfig::validate`] fails.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::modem::ModemTimings;

/// Lowest sample interval the telemetry endpoint accepts (rate limit).
pub const MIN_SAMPLE_INTERVAL_SECS: u32 = 15;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Network ---
    /// Access point the modem joins
    pub wifi_ssid: String,
    pub wifi_password: String,

    // --- Telemetry endpoint ---
    /// Write key appended as `api_key` to every upload
    pub api_key: String,
    pub telemetry_host: String,
    pub telemetry_port: u16,
    /// Request path of the update resource
    pub telemetry_path: String,

    // --- Timing ---
    /// Pause between control-loop iterations (seconds)
    pub sample_interval_secs: u32,
    /// Deadline for the modem to confirm the network join (seconds)
    pub join_timeout_secs: u32,

    // --- Lifespan model ---
    pub lifespan_constant: f32,

    // --- Alert thresholds (days) ---
    /// Buzzer pulses while the estimate is below this
    pub buzzer_below_days: f32,
    /// Red indicator while the estimate is below this
    pub red_below_days: f32,
    /// Green indicator while the estimate is above this
    pub green_above_days: f32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: String::new(),
            wifi_password: String::new(),

            api_key: String::new(),
            telemetry_host: "api.thingspeak.com".into(),
            telemetry_port: 80,
            telemetry_path: "/update".into(),

            sample_interval_secs: 60,
            join_timeout_secs: 20,

            lifespan_constant: 2000.0,

            buzzer_below_days: 3.0,
            red_below_days: 1.0,
            green_above_days: 2.0,
        }
    }
}

impl SystemConfig {
    /// Parse a JSON document; missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|_| ConfigError::Malformed)
    }

    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ssid(&self.wifi_ssid)?;
        validate_password(&self.wifi_password)?;

        if self.api_key.is_empty() || !is_printable_ascii(&self.api_key) {
            return Err(ConfigError::ValidationFailed("api_key must be non-empty printable ASCII"));
        }
        if self.telemetry_host.is_empty() || self.telemetry_host.contains('"') {
            return Err(ConfigError::ValidationFailed("telemetry_host must be non-empty and unquoted"));
        }
        if self.telemetry_port == 0 {
            return Err(ConfigError::ValidationFailed("telemetry_port must be non-zero"));
        }
        if !self.telemetry_path.starts_with('/') {
            return Err(ConfigError::ValidationFailed("telemetry_path must start with '/'"));
        }
        if self.sample_interval_secs < MIN_SAMPLE_INTERVAL_SECS {
            return Err(ConfigError::ValidationFailed(
                "sample_interval_secs below endpoint rate limit (15 s)",
            ));
        }
        if self.join_timeout_secs == 0 {
            return Err(ConfigError::ValidationFailed("join_timeout_secs must be non-zero"));
        }
        if !(self.lifespan_constant.is_finite() && self.lifespan_constant > 0.0) {
            return Err(ConfigError::ValidationFailed("lifespan_constant must be positive"));
        }
        if self.red_below_days > self.green_above_days {
            return Err(ConfigError::ValidationFailed(
                "red_below_days must not exceed green_above_days",
            ));
        }
        Ok(())
    }

    /// Fixed settle budgets for the modem conversation.
    pub fn modem_timings(&self) -> ModemTimings {
        ModemTimings {
            join_timeout_ms: u64::from(self.join_timeout_secs) * 1000,
            ..ModemTimings::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Every byte in the printable ASCII range `0x20..=0x7E`.
fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// SSIDs are quoted inside `AT+CWJAP`, so a `"` would end the argument early.
fn validate_ssid(ssid: &str) -> Result<(), ConfigError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConfigError::ValidationFailed("wifi_ssid must be 1-32 bytes"));
    }
    if !is_printable_ascii(ssid) || ssid.contains('"') {
        return Err(ConfigError::ValidationFailed("wifi_ssid must be printable ASCII without quotes"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConfigError> {
    if password.len() > 64 {
        return Err(ConfigError::ValidationFailed("wifi_password must be at most 64 bytes"));
    }
    if password.contains('"') {
        return Err(ConfigError::ValidationFailed("wifi_password must not contain quotes"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "config malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Malformed => Self::Config("malformed config"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}
