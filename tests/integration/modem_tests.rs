//! `ModemLink` conversations against a scripted serial port.
//!
//! With default timings the join deadline is armed at t = 3 s (after the
//! 2 s reset settle and the 1 s mode settle) and expires at t = 23 s.

use roomsentinel::app::ports::Clock;
use roomsentinel::error::ModemError;
use roomsentinel::modem::request::{Endpoint, TelemetryRecord};
use roomsentinel::modem::{ModemLink, ModemTimings, SessionState};

use crate::mock_hw::{ScriptedSerial, SimClock};

const JOIN_ARMED_MS: u64 = 3_000;
const JOIN_DEADLINE_MS: u64 = 23_000;
const GOT_IP: &[u8] = b"WIFI CONNECTED\r\nWIFI GOT IP\r\n\r\nOK\r\n";
const HTTP_OK: &[u8] = b"+IPD,17:HTTP/1.1 200 OK\r\n\r\n";

fn endpoint() -> Endpoint {
    Endpoint {
        host: "api.thingspeak.com".into(),
        port: 80,
        path: "/update".into(),
        api_key: "KEY123".into(),
    }
}

fn record() -> TelemetryRecord {
    TelemetryRecord {
        temperature_c: 23.0,
        humidity_pct: 58.0,
        raw_gas: 13_107,
        lifespan_days: -1.44,
    }
}

fn link(serial: ScriptedSerial, clock: &SimClock) -> ModemLink<ScriptedSerial, SimClock> {
    ModemLink::new(serial, clock.clone(), endpoint(), ModemTimings::default())
}

/// A link that has already joined; the join reply lands at t = 4 s.
fn joined(serial: ScriptedSerial, clock: &SimClock) -> ModemLink<ScriptedSerial, SimClock> {
    let mut link = link(serial.on("AT+CWJAP", GOT_IP, 1_000), clock);
    link.join("BarnNet", "hunter2").unwrap();
    link
}

// ── Join ──────────────────────────────────────────────────────

#[test]
fn join_writes_reset_mode_and_credentials() {
    let clock = SimClock::new();
    let link = joined(ScriptedSerial::new(&clock), &clock);

    assert_eq!(
        link.transport().commands(),
        vec!["AT+RST", "AT+CWMODE=1", "AT+CWJAP=\"BarnNet\",\"hunter2\""]
    );
    assert!(link.transport().written().ends_with("\r\n"));
}

#[test]
fn join_succeeds_on_got_ip() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).on("AT+CWJAP", GOT_IP, 4_000);
    let mut link = link(serial, &clock);

    assert_eq!(link.state(), SessionState::Idle);
    assert_eq!(link.join("BarnNet", "hunter2"), Ok(()));
    assert_eq!(link.state(), SessionState::Connected);
    assert!(link.is_connected());
    assert_eq!(clock.now_ms(), JOIN_ARMED_MS + 4_000);
}

#[test]
fn boot_banner_is_discarded() {
    let clock = SimClock::new();
    // A banner that would otherwise read as a join confirmation.
    let serial = ScriptedSerial::new(&clock).on("AT+RST", b"\r\nready\r\nOK\r\n", 500);
    let mut link = link(serial, &clock);

    assert_eq!(link.join("BarnNet", "hunter2"), Err(ModemError::JoinTimeout));
}

#[test]
fn silent_modem_times_out_exactly_at_deadline() {
    let clock = SimClock::new();
    let mut link = link(ScriptedSerial::new(&clock), &clock);

    assert_eq!(link.join("BarnNet", "hunter2"), Err(ModemError::JoinTimeout));
    assert_eq!(link.state(), SessionState::Failed);
    assert_eq!(clock.now_ms(), JOIN_DEADLINE_MS);
}

#[test]
fn reply_inside_last_poll_window_is_seen() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).push_at(JOIN_ARMED_MS + 18_500, b"WIFI GOT IP\r\n");
    let mut link = link(serial, &clock);

    assert_eq!(link.join("BarnNet", "hunter2"), Ok(()));
    assert_eq!(clock.now_ms(), JOIN_ARMED_MS + 19_000);
}

#[test]
fn reply_after_last_poll_is_missed() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).push_at(JOIN_ARMED_MS + 19_500, b"WIFI GOT IP\r\n");
    let mut link = link(serial, &clock);

    assert_eq!(link.join("BarnNet", "hunter2"), Err(ModemError::JoinTimeout));
    assert_eq!(clock.now_ms(), JOIN_DEADLINE_MS);
}

#[test]
fn invalid_bytes_do_not_hide_confirmation() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).on("AT+CWJAP", b"WIFI \xFF\xFEGOT IP\r\n", 2_000);
    let mut link = link(serial, &clock);

    assert_eq!(link.join("BarnNet", "hunter2"), Ok(()));
}

#[test]
fn bare_ok_counts_as_joined() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).on("AT+CWJAP", b"OK\r\n", 1_500);
    let mut link = link(serial, &clock);

    assert_eq!(link.join("BarnNet", "hunter2"), Ok(()));
}

#[test]
fn join_is_one_shot() {
    let clock = SimClock::new();
    let mut link = joined(ScriptedSerial::new(&clock), &clock);
    assert_eq!(link.join("BarnNet", "hunter2"), Err(ModemError::AlreadyStarted));
    assert_eq!(link.state(), SessionState::Connected);

    let mut failed = self::link(ScriptedSerial::new(&clock), &clock);
    let _ = failed.join("BarnNet", "hunter2");
    assert_eq!(failed.join("BarnNet", "hunter2"), Err(ModemError::AlreadyStarted));
    assert_eq!(failed.state(), SessionState::Failed);
}

// ── Upload ────────────────────────────────────────────────────

#[test]
fn upload_before_join_is_refused() {
    let clock = SimClock::new();
    let mut link = link(ScriptedSerial::new(&clock), &clock);

    assert_eq!(link.upload(&record()), Err(ModemError::NotConnected));
    assert!(link.transport().written().is_empty());
}

#[test]
fn upload_after_failed_join_is_refused() {
    let clock = SimClock::new();
    let mut link = link(ScriptedSerial::new(&clock), &clock);
    let _ = link.join("BarnNet", "hunter2");

    let before = link.transport().written().len();
    assert_eq!(link.upload(&record()), Err(ModemError::NotConnected));
    assert_eq!(link.transport().written().len(), before);
}

#[test]
fn upload_accepted_on_200_ok() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).on("GET /update", HTTP_OK, 800);
    let mut link = joined(serial, &clock);

    assert_eq!(link.upload(&record()), Ok(()));
    assert_eq!(link.state(), SessionState::Connected);
}

#[test]
fn upload_command_sequence() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).on("GET /update", HTTP_OK, 800);
    let mut link = joined(serial, &clock);
    link.upload(&record()).unwrap();

    let request = endpoint().request(&record());
    let commands = link.transport().commands();
    assert_eq!(
        &commands[3..],
        &[
            "AT+CIPCLOSE".to_owned(),
            "AT+CIPSTART=\"TCP\",\"api.thingspeak.com\",80".to_owned(),
            format!("AT+CIPSEND={}", request.len()),
        ]
    );
    assert!(link.transport().written().ends_with(&request));
}

#[test]
fn upload_takes_the_fixed_settle_budget() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).on("GET /update", HTTP_OK, 800);
    let mut link = joined(serial, &clock);
    let start = clock.now_ms();

    link.upload(&record()).unwrap();

    let t = ModemTimings::default();
    let budget = t.close_settle_ms + t.connect_settle_ms + t.send_prompt_ms + t.response_wait_ms;
    assert_eq!(clock.now_ms() - start, u64::from(budget));
}

#[test]
fn upload_rejected_without_200() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).on("GET /update", b"HTTP/1.1 400 Bad Request\r\n", 800);
    let mut link = joined(serial, &clock);

    assert_eq!(link.upload(&record()), Err(ModemError::UploadRejected));
    assert_eq!(link.state(), SessionState::Connected, "a failed upload keeps the session");
}

#[test]
fn upload_without_any_reply_is_no_response() {
    let clock = SimClock::new();
    let mut link = joined(ScriptedSerial::new(&clock), &clock);

    assert_eq!(link.upload(&record()), Err(ModemError::NoResponse));
}

#[test]
fn late_http_reply_is_missed() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).on("GET /update", HTTP_OK, 2_500);
    let mut link = joined(serial, &clock);

    assert_eq!(link.upload(&record()), Err(ModemError::NoResponse));
}

#[test]
fn connection_chatter_alone_is_rejected() {
    let clock = SimClock::new();
    let serial = ScriptedSerial::new(&clock).on("AT+CIPSTART", b"CONNECT\r\n\r\nOK\r\n", 300);
    let mut link = joined(serial, &clock);

    assert_eq!(link.upload(&record()), Err(ModemError::UploadRejected));
}

#[test]
fn uploads_repeat_after_a_failure() {
    let clock = SimClock::new();
    let mut link = joined(ScriptedSerial::new(&clock), &clock);

    assert_eq!(link.upload(&record()), Err(ModemError::NoResponse));
    assert_eq!(link.upload(&record()), Err(ModemError::NoResponse));
    let cipclose = link
        .transport()
        .commands()
        .iter()
        .filter(|c| *c == "AT+CIPCLOSE")
        .count();
    assert_eq!(cipclose, 2);
}
