//! AT-command modem link.
//!
//! Drives a Wi-Fi AT modem (ESP8266 firmware dialect) over a serial
//! [`SerialTransport`]:
//!
//! ```text
//!   Idle ──join()──▶ Resetting ──▶ Joining{deadline} ──┬─▶ Connected ──upload()*
//!                        │                │            │
//!                        └────────────────┴────────────┴─▶ Failed
//! ```
//!
//! Transitions only move forward or to `Failed`; neither `Connected` nor
//! `Failed` ever returns to `Idle` within a run.
//!
//! Every wait is a fixed settle budget, not a wait-for-response.  The
//! modem's latency is unbounded, so the budgets are a best effort and a
//! slow modem can still miss them.

pub mod classifier;
pub mod request;
pub mod transport;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::app::ports::{Clock, UplinkPort};
use crate::error::ModemError;
use classifier::{ResponseClassifier, decode_lossy};
use request::{Endpoint, TelemetryRecord};
use transport::SerialTransport;

/// Upper bound on bytes collected from one poll.  Excess is discarded.
const RX_CAPACITY: usize = 1024;
const LINE_END: &[u8] = b"\r\n";

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Resetting,
    /// Waiting for join confirmation until `deadline_ms` (clock time).
    Joining { deadline_ms: u64 },
    Connected,
    Failed,
}

/// Fixed settle budgets (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModemTimings {
    /// After `AT+RST`, before the boot banner is discarded.
    pub reset_settle_ms: u32,
    /// After `AT+CWMODE=1`.
    pub mode_settle_ms: u32,
    /// Join confirmation deadline, armed once `AT+CWJAP` is written.
    pub join_timeout_ms: u64,
    /// Cadence of the join poll.
    pub join_poll_ms: u32,
    /// After `AT+CIPCLOSE`.
    pub close_settle_ms: u32,
    /// After `AT+CIPSTART`.
    pub connect_settle_ms: u32,
    /// After `AT+CIPSEND`, for the `>` prompt.
    pub send_prompt_ms: u32,
    /// After the request is written, before the response is read.
    pub response_wait_ms: u32,
}

impl Default for ModemTimings {
    fn default() -> Self {
        Self {
            reset_settle_ms: 2_000,
            mode_settle_ms: 1_000,
            join_timeout_ms: 20_000,
            join_poll_ms: 1_000,
            close_settle_ms: 1_000,
            connect_settle_ms: 2_000,
            send_prompt_ms: 1_000,
            response_wait_ms: 2_000,
        }
    }
}

/// The modem conversation state machine.
pub struct ModemLink<T, C> {
    transport: T,
    clock: C,
    endpoint: Endpoint,
    timings: ModemTimings,
    state: SessionState,
}

impl<T: SerialTransport, C: Clock> ModemLink<T, C> {
    pub fn new(transport: T, clock: C, endpoint: Endpoint, timings: ModemTimings) -> Self {
        Self {
            transport,
            clock,
            endpoint,
            timings,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Borrow the transport (e.g. to inspect a test double).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Reset the modem and join `ssid`.
    ///
    /// Polls every `join_poll_ms` until a decoded chunk contains
    /// `WIFI GOT IP` or `OK`.  Fails exactly when the clock reaches the
    /// deadline, never earlier.
    pub fn join(&mut self, ssid: &str, password: &str) -> Result<(), ModemError> {
        if self.state != SessionState::Idle {
            return Err(ModemError::AlreadyStarted);
        }
        match self.run_join(ssid, password) {
            Ok(()) => {
                self.state = SessionState::Connected;
                info!("Modem joined '{}'", ssid);
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Failed;
                warn!("Modem join failed: {}", e);
                Err(e)
            }
        }
    }

    /// Send one record to the endpoint.
    ///
    /// Success is the substring `200 OK` in whatever is buffered after the
    /// response wait.  A failed upload leaves the session `Connected`.
    pub fn upload(&mut self, record: &TelemetryRecord) -> Result<(), ModemError> {
        if self.state != SessionState::Connected {
            return Err(ModemError::NotConnected);
        }
        let request = self.endpoint.request(record);

        // Stale connection, if any; the reply is not checked.
        self.send_command("AT+CIPCLOSE")?;
        self.clock.delay_ms(self.timings.close_settle_ms);

        let start = format!(
            "AT+CIPSTART=\"TCP\",\"{}\",{}",
            self.endpoint.host, self.endpoint.port
        );
        self.send_command(&start)?;
        self.clock.delay_ms(self.timings.connect_settle_ms);

        self.send_command(&format!("AT+CIPSEND={}", request.len()))?;
        self.clock.delay_ms(self.timings.send_prompt_ms);

        self.write(request.as_bytes())?;
        self.clock.delay_ms(self.timings.response_wait_ms);

        if !self.transport.available() {
            return Err(ModemError::NoResponse);
        }
        let text = self.read_chunk()?;
        debug!("Endpoint response: {:?}", text);
        if ResponseClassifier::HTTP_OK.is_success(&text) {
            info!("Telemetry accepted");
            Ok(())
        } else {
            Err(ModemError::UploadRejected)
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn run_join(&mut self, ssid: &str, password: &str) -> Result<(), ModemError> {
        self.state = SessionState::Resetting;
        self.send_command("AT+RST")?;
        self.clock.delay_ms(self.timings.reset_settle_ms);
        let banner = self.read_chunk()?;
        debug!("Discarded {} bytes of boot output", banner.len());

        self.send_command("AT+CWMODE=1")?;
        self.clock.delay_ms(self.timings.mode_settle_ms);
        self.send_command(&format!("AT+CWJAP=\"{}\",\"{}\"", ssid, password))?;

        let deadline_ms = self.clock.now_ms() + self.timings.join_timeout_ms;
        self.state = SessionState::Joining { deadline_ms };

        while self.clock.now_ms() < deadline_ms {
            if self.transport.available() {
                let text = self.read_chunk()?;
                debug!("Modem: {:?}", text);
                if let Some(marker) = ResponseClassifier::JOINED.matched(&text) {
                    debug!("Join confirmed by '{}'", marker);
                    return Ok(());
                }
            }
            self.clock.delay_ms(self.timings.join_poll_ms);
        }
        Err(ModemError::JoinTimeout)
    }

    /// Write one AT command line.
    fn send_command(&mut self, cmd: &str) -> Result<(), ModemError> {
        if cmd.starts_with("AT+CWJAP") {
            debug!("> AT+CWJAP=<credentials>");
        } else {
            debug!("> {}", cmd);
        }
        self.write(cmd.as_bytes())?;
        self.write(LINE_END)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), ModemError> {
        self.transport.write(data).map_err(|e| {
            warn!("Serial write failed: {:?}", e);
            ModemError::Transport
        })
    }

    /// Drain whatever is buffered right now and decode it.
    fn read_chunk(&mut self) -> Result<String, ModemError> {
        let mut rx: heapless::Vec<u8, RX_CAPACITY> = heapless::Vec::new();
        let mut buf = [0u8; 128];
        while self.transport.available() {
            let n = self.transport.read(&mut buf).map_err(|e| {
                warn!("Serial read failed: {:?}", e);
                ModemError::Transport
            })?;
            if n == 0 {
                break;
            }
            let room = RX_CAPACITY - rx.len();
            // Cannot fail: the slice is cut to the remaining capacity.
            let _ = rx.extend_from_slice(&buf[..n.min(room)]);
        }
        Ok(decode_lossy(&rx))
    }
}

impl<T: SerialTransport, C: Clock> UplinkPort for ModemLink<T, C> {
    fn join(&mut self, ssid: &str, password: &str) -> Result<(), ModemError> {
        ModemLink::join(self, ssid, password)
    }

    fn upload(&mut self, record: &TelemetryRecord) -> Result<(), ModemError> {
        ModemLink::upload(self, record)
    }

    fn state(&self) -> SessionState {
        self.state
    }
}
