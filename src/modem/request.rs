//! Telemetry record and the raw HTTP/1.1 request it is sent as.

use core::fmt::Write;

use crate::config::SystemConfig;

/// Where uploads go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
    pub api_key: String,
}

impl From<&SystemConfig> for Endpoint {
    fn from(config: &SystemConfig) -> Self {
        Self {
            host: config.telemetry_host.clone(),
            port: config.telemetry_port,
            path: config.telemetry_path.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

/// One upload: `field1`..`field4` of the channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    /// Raw 16-bit gas reading, not the derived ppm.
    pub raw_gas: u16,
    pub lifespan_days: f32,
}

impl Endpoint {
    /// `GET <path>?api_key=..&field1..4 HTTP/1.1`, `Host` header, blank line.
    pub fn request(&self, record: &TelemetryRecord) -> String {
        let mut req = String::with_capacity(160);
        // Writing into a String cannot fail.
        let _ = write!(
            req,
            "GET {}?api_key={}&field1={}&field2={}&field3={}&field4={:.2} HTTP/1.1\r\nHost: {}\r\n\r\n",
            self.path,
            self.api_key,
            record.temperature_c,
            record.humidity_pct,
            record.raw_gas,
            record.lifespan_days,
            self.host,
        );
        req
    }
}
