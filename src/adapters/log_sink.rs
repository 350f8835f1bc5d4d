//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (ESP-IDF logger → UART in production).

use log::{error, info, warn};

use crate::app::events::SentinelEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`SentinelEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &SentinelEvent) {
        match event {
            SentinelEvent::Joined => {
                info!("JOIN  | connected");
            }
            SentinelEvent::JoinFailed(e) => {
                error!("JOIN  | failed: {} (sampling disabled)", e);
            }
            SentinelEvent::SensorFault(e) => {
                warn!("SENSOR| {}", e);
            }
            SentinelEvent::OutputFault(e) => {
                warn!("OUTPUT| {} (iteration skipped)", e);
            }
            SentinelEvent::Cycle(c) => {
                info!(
                    "CYCLE | #{} | T={:.1}\u{00b0}C H={:.1}% | gas={}ppm (raw {}) | \
                     life={:.2}d | buzzer={} led={:?} | upload={}",
                    c.iteration,
                    c.reading.temperature_c,
                    c.reading.humidity_pct,
                    c.reading.gas_ppm,
                    c.reading.raw_gas,
                    c.lifespan.remaining_days,
                    if c.actuation.buzzer_pulsed { "pulse" } else { "off" },
                    c.actuation.indicator,
                    match c.upload {
                        Ok(()) => "ok",
                        Err(_) => "failed",
                    },
                );
                if let Err(e) = c.upload {
                    warn!("UPLOAD| #{} | {}", c.iteration, e);
                }
            }
        }
    }
}
