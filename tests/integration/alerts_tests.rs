//! Pin-level sequencing of `AlertPanel`.

use roomsentinel::drivers::alerts::{
    AlertPanel, AlertThresholds, BUZZER_OFF_MS, BUZZER_ON_MS, INDICATOR_SWITCH_MS, IndicatorColour,
};
use roomsentinel::error::ActuatorError;

use crate::mock_hw::{NS_PER_MS, PinEvent, PinId, PinLog, RecordingPin, SimClock};

fn make_panel() -> (AlertPanel<RecordingPin, SimClock>, PinLog, SimClock) {
    let clock = SimClock::new();
    let log = PinLog::new();
    let panel = AlertPanel::new(
        log.pin(PinId::Buzzer, &clock),
        log.pin(PinId::Red, &clock),
        log.pin(PinId::Green, &clock),
        clock.clone(),
        AlertThresholds::default(),
    );
    (panel, log, clock)
}

fn ev(at_ms: u64, pin: PinId, high: bool) -> PinEvent {
    PinEvent {
        at_ns: at_ms * NS_PER_MS,
        pin,
        high,
    }
}

const PULSE_END_MS: u64 = (BUZZER_ON_MS + BUZZER_OFF_MS) as u64;
const SWITCH_MS: u64 = INDICATOR_SWITCH_MS as u64;

#[test]
fn critical_pulses_then_lights_red() {
    let (mut panel, log, _clock) = make_panel();
    let state = panel.drive(0.5).unwrap();

    assert!(state.buzzer_pulsed);
    assert_eq!(state.indicator, IndicatorColour::Red);
    assert_eq!(
        log.events(),
        vec![
            ev(0, PinId::Buzzer, true),
            ev(u64::from(BUZZER_ON_MS), PinId::Buzzer, false),
            ev(PULSE_END_MS, PinId::Green, false),
            ev(PULSE_END_MS + SWITCH_MS, PinId::Red, true),
        ]
    );
}

#[test]
fn healthy_lights_green_without_buzzer() {
    let (mut panel, log, _clock) = make_panel();
    let state = panel.drive(5.0).unwrap();

    assert!(!state.buzzer_pulsed);
    assert!(log.of(PinId::Buzzer).is_empty());
    assert_eq!(
        log.events(),
        vec![ev(0, PinId::Red, false), ev(SWITCH_MS, PinId::Green, true)]
    );
}

#[test]
fn warning_band_pulses_and_lights_green() {
    let (mut panel, log, _clock) = make_panel();
    let state = panel.drive(2.5).unwrap();

    assert!(state.buzzer_pulsed);
    assert_eq!(state.indicator, IndicatorColour::Green);
    assert_eq!(log.of(PinId::Green), vec![ev(PULSE_END_MS + SWITCH_MS, PinId::Green, true)]);
}

#[test]
fn dead_zone_switches_both_off() {
    let (mut panel, log, _clock) = make_panel();
    let state = panel.drive(1.5).unwrap();

    assert_eq!(state.indicator, IndicatorColour::None);
    assert_eq!(log.of(PinId::Red), vec![ev(PULSE_END_MS, PinId::Red, false)]);
    assert_eq!(log.of(PinId::Green), vec![ev(PULSE_END_MS, PinId::Green, false)]);
}

#[test]
fn red_and_green_are_never_lit_together() {
    let (mut panel, log, _clock) = make_panel();
    for days in [5.0, 0.5, 1.5, 2.5, -3.0, 4.0] {
        panel.drive(days).unwrap();
    }

    let (mut red, mut green) = (false, false);
    for e in log.events() {
        match e.pin {
            PinId::Red => red = e.high,
            PinId::Green => green = e.high,
            _ => {}
        }
        assert!(!(red && green), "both indicators lit at {} ns", e.at_ns);
    }
}

#[test]
fn each_call_is_a_single_pulse() {
    let (mut panel, log, clock) = make_panel();
    panel.drive(0.2).unwrap();
    panel.drive(0.2).unwrap();

    let buzzer = log.of(PinId::Buzzer);
    assert_eq!(buzzer.len(), 4);
    assert!(!buzzer[3].high, "buzzer left off between calls");
    assert_eq!(clock.now_ns(), 2 * (PULSE_END_MS + SWITCH_MS) * NS_PER_MS);
}

#[test]
fn pin_failure_maps_to_actuator_error() {
    let (mut panel, log, _clock) = make_panel();
    log.break_bus();
    assert_eq!(panel.drive(0.5), Err(ActuatorError::BuzzerWriteFailed));
    assert_eq!(panel.drive(5.0), Err(ActuatorError::IndicatorWriteFailed));
}
