//! Control loop: the hexagonal core.
//!
//! [`ControlLoop`] owns one instance of every component port and runs the
//! fixed iteration:
//!
//! ```text
//!  SensorPort ──▶ ┌───────────────────────────┐ ──▶ DisplayPort
//!                 │        ControlLoop        │
//!   AlertPort ◀── │ sample · lifespan · alert │ ──▶ UplinkPort
//!                 └───────────────────────────┘ ──▶ EventSink
//! ```
//!
//! The iteration boundary in [`step`](ControlLoop::step) contains every
//! per-iteration failure: a sensor, buzzer/indicator or display failure
//! ends the iteration early, an upload failure is reported and dropped.
//! Only a failed join stops [`run`](ControlLoop::run).

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::lifespan::LifespanEstimate;
use crate::drivers::alerts::ActuationState;
use crate::drivers::lcd::COLUMNS;
use crate::error::{Error, ModemError, Result, SensorError};
use crate::modem::request::TelemetryRecord;
use crate::sensors::SensorReading;

use super::events::{CycleReport, SentinelEvent};
use super::ports::{AlertPort, Clock, DisplayPort, EventSink, SensorPort, UplinkPort};

/// Message shown when sensor acquisition fails.
pub const SENSOR_ERROR_TEXT: &str = "Sensor Error";

/// What one call to [`ControlLoop::step`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// All steps ran; the upload result is inside the report.
    Completed(CycleReport),
    /// Acquisition failed; actuation, render and upload were skipped.
    SensorFault(SensorError),
    /// Actuation or render failed; the upload was skipped.
    OutputFault(Error),
}

/// The control loop orchestrates all domain logic.
pub struct ControlLoop<S, D, A, U, C> {
    config: SystemConfig,
    sensors: S,
    display: D,
    alerts: A,
    uplink: U,
    clock: C,
    iterations: u64,
}

impl<S, D, A, U, C> ControlLoop<S, D, A, U, C>
where
    S: SensorPort,
    D: DisplayPort,
    A: AlertPort,
    U: UplinkPort,
    C: Clock,
{
    /// Construct the loop.  Does **not** touch the uplink; call
    /// [`start`](Self::start) or [`run`](Self::run).
    pub fn new(config: SystemConfig, sensors: S, display: D, alerts: A, uplink: U, clock: C) -> Self {
        Self {
            config,
            sensors,
            display,
            alerts,
            uplink,
            clock,
            iterations: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// One-time network join.  A failure is final for this run; status
    /// screens that fail to render are logged and skipped.
    pub fn start(&mut self, sink: &mut impl EventSink) -> Result<()> {
        let ssid = self.config.wifi_ssid.clone();
        self.show_status("Connecting...", &ssid);

        match self.uplink.join(&self.config.wifi_ssid, &self.config.wifi_password) {
            Ok(()) => {
                self.show_status("Wi-Fi", "Connected");
                sink.emit(&SentinelEvent::Joined);
                info!(
                    "Sampling every {} s (uplink {:?})",
                    self.config.sample_interval_secs,
                    self.uplink.state()
                );
                Ok(())
            }
            Err(e) => {
                self.show_status("Wi-Fi Failed", "");
                sink.emit(&SentinelEvent::JoinFailed(e));
                Err(Error::Modem(e))
            }
        }
    }

    /// Join, then iterate forever with the configured pause.
    ///
    /// Returns only when the join fails.
    pub fn run(&mut self, sink: &mut impl EventSink) -> Result<Infallible> {
        self.start(sink)?;
        loop {
            self.cycle(sink);
        }
    }

    /// Join, then run `iterations` paused iterations and return.
    pub fn run_for(&mut self, sink: &mut impl EventSink, iterations: u64) -> Result<()> {
        self.start(sink)?;
        for _ in 0..iterations {
            self.cycle(sink);
        }
        Ok(())
    }

    /// One iteration followed by the configured pause.
    pub fn cycle(&mut self, sink: &mut impl EventSink) -> StepOutcome {
        let outcome = self.step(sink);
        self.clock.delay_ms(self.config.sample_interval_secs.saturating_mul(1000));
        outcome
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one iteration: sample → compute → actuate → render → upload.
    /// The pause between iterations is not part of the step.
    pub fn step(&mut self, sink: &mut impl EventSink) -> StepOutcome {
        self.iterations += 1;

        // 1. Sample
        let reading = match self.sensors.acquire() {
            Ok(r) => r,
            Err(e) => {
                warn!("Iteration {}: sensor read failed: {}", self.iterations, e);
                self.show_status(SENSOR_ERROR_TEXT, "");
                sink.emit(&SentinelEvent::SensorFault(e));
                return StepOutcome::SensorFault(e);
            }
        };

        // 2. Lifespan estimate
        let lifespan = LifespanEstimate::from_reading(&reading, self.config.lifespan_constant);

        // 3-4. Buzzer + indicator, status display
        let actuation = match self.drive_outputs(&reading, &lifespan) {
            Ok(a) => a,
            Err(e) => {
                warn!("Iteration {}: output failed: {}", self.iterations, e);
                sink.emit(&SentinelEvent::OutputFault(e));
                return StepOutcome::OutputFault(e);
            }
        };

        // 5. Uplink (failures are reported, never propagated)
        let upload = self.upload(&reading, &lifespan);

        let report = CycleReport {
            iteration: self.iterations,
            reading,
            lifespan,
            actuation,
            upload,
        };
        sink.emit(&SentinelEvent::Cycle(report));
        StepOutcome::Completed(report)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Iterations started since construction.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn uplink(&self) -> &U {
        &self.uplink
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    // ── Internal ──────────────────────────────────────────────

    fn drive_outputs(&mut self, reading: &SensorReading, lifespan: &LifespanEstimate) -> Result<ActuationState> {
        let actuation = self.alerts.apply(lifespan.remaining_days)?;
        let (line1, line2) = reading_lines(reading, lifespan);
        self.display.show(&line1, &line2)?;
        Ok(actuation)
    }

    fn show_status(&mut self, line1: &str, line2: &str) {
        if let Err(e) = self.display.show(line1, line2) {
            warn!("Status screen {:?} not shown: {}", line1, e);
        }
    }

    fn upload(&mut self, reading: &SensorReading, lifespan: &LifespanEstimate) -> core::result::Result<(), ModemError> {
        let record = TelemetryRecord {
            temperature_c: reading.temperature_c,
            humidity_pct: reading.humidity_pct,
            raw_gas: reading.raw_gas,
            lifespan_days: lifespan.remaining_days,
        };
        let res = self.uplink.upload(&record);
        if let Err(e) = res {
            warn!("Iteration {}: upload failed: {}", self.iterations, e);
        }
        res
    }
}

/// `T:<temp>C H:<hum>%` / `G:<ppm>ppm L:<days>d`.
///
/// The lifespan gets whatever room the gas field leaves, so the `d`
/// suffix always lands on the panel.
pub fn reading_lines(reading: &SensorReading, lifespan: &LifespanEstimate) -> (String, String) {
    let gas = format!("G:{}ppm L:", reading.gas_ppm);
    let width = COLUMNS.saturating_sub(gas.len() + 1);
    (
        format!("T:{:.0}C H:{:.0}%", reading.temperature_c, reading.humidity_pct),
        format!("{}{}d", gas, days_field(lifespan.remaining_days, width)),
    )
}

/// One decimal if it fits in `width`, else whole days, else saturated at
/// the widest magnitude that fits.
fn days_field(days: f32, width: usize) -> String {
    let precise = format!("{:.1}", days);
    if precise.len() <= width {
        return precise;
    }
    let whole = format!("{:.0}", days);
    if whole.len() <= width {
        return whole;
    }
    let negative = days.is_sign_negative();
    let nines = "9".repeat(width.saturating_sub(usize::from(negative)).max(1));
    if negative { format!("-{}", nines) } else { nines }
}
