//! Buzzer and red/green indicator driver.
//!
//! The lifespan estimate maps onto the outputs with a dead zone between
//! the red and green thresholds so the indicator does not flap:
//!
//! | remaining days      | indicator | buzzer          |
//! |---------------------|-----------|-----------------|
//! | `< red_below`       | red       | pulse if `< buzzer_below` |
//! | `red..=green`       | off       | pulse if `< buzzer_below` |
//! | `> green_above`     | green     | pulse if `< buzzer_below` |
//!
//! The buzzer is a single 500 ms pulse per call, not a latched alarm; the
//! control loop period throttles how often it sounds.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::ports::AlertPort;
use crate::config::SystemConfig;
use crate::error::ActuatorError;

pub const BUZZER_ON_MS: u32 = 500;
pub const BUZZER_OFF_MS: u32 = 200;
/// Gap between releasing one indicator and lighting the other, so both
/// are never lit at once.
pub const INDICATOR_SWITCH_MS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorColour {
    None,
    Red,
    Green,
}

/// Outputs derived for one iteration.  Never carried over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuationState {
    pub buzzer_pulsed: bool,
    pub indicator: IndicatorColour,
}

/// Decision thresholds in days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    pub buzzer_below: f32,
    pub red_below: f32,
    pub green_above: f32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            buzzer_below: 3.0,
            red_below: 1.0,
            green_above: 2.0,
        }
    }
}

impl From<&SystemConfig> for AlertThresholds {
    fn from(config: &SystemConfig) -> Self {
        Self {
            buzzer_below: config.buzzer_below_days,
            red_below: config.red_below_days,
            green_above: config.green_above_days,
        }
    }
}

/// Pure mapping from the estimate to the desired outputs.
///
/// Both boundaries of the dead zone are inclusive: exactly `red_below`
/// or exactly `green_above` leaves the indicator off.
pub fn plan_actuation(remaining_days: f32, thresholds: &AlertThresholds) -> ActuationState {
    let indicator = if remaining_days < thresholds.red_below {
        IndicatorColour::Red
    } else if remaining_days > thresholds.green_above {
        IndicatorColour::Green
    } else {
        IndicatorColour::None
    };
    ActuationState {
        buzzer_pulsed: remaining_days < thresholds.buzzer_below,
        indicator,
    }
}

/// Owns the buzzer and both indicator lines.
pub struct AlertPanel<P, D> {
    buzzer: P,
    red: P,
    green: P,
    delay: D,
    thresholds: AlertThresholds,
}

impl<P: OutputPin, D: DelayNs> AlertPanel<P, D> {
    pub fn new(buzzer: P, red: P, green: P, delay: D, thresholds: AlertThresholds) -> Self {
        Self {
            buzzer,
            red,
            green,
            delay,
            thresholds,
        }
    }

    /// Drive the outputs for one estimate: buzzer first, then indicator.
    pub fn drive(&mut self, remaining_days: f32) -> Result<ActuationState, ActuatorError> {
        let state = plan_actuation(remaining_days, &self.thresholds);
        debug!("Alerts for {remaining_days:.2} days: {state:?}");

        if state.buzzer_pulsed {
            self.pulse_buzzer()?;
        }

        match state.indicator {
            IndicatorColour::Red => {
                indicator(&mut self.green, false)?;
                self.delay.delay_ms(INDICATOR_SWITCH_MS);
                indicator(&mut self.red, true)?;
            }
            IndicatorColour::Green => {
                indicator(&mut self.red, false)?;
                self.delay.delay_ms(INDICATOR_SWITCH_MS);
                indicator(&mut self.green, true)?;
            }
            IndicatorColour::None => {
                indicator(&mut self.red, false)?;
                indicator(&mut self.green, false)?;
            }
        }
        Ok(state)
    }

    fn pulse_buzzer(&mut self) -> Result<(), ActuatorError> {
        self.buzzer.set_high().map_err(|_| ActuatorError::BuzzerWriteFailed)?;
        self.delay.delay_ms(BUZZER_ON_MS);
        self.buzzer.set_low().map_err(|_| ActuatorError::BuzzerWriteFailed)?;
        self.delay.delay_ms(BUZZER_OFF_MS);
        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs> AlertPort for AlertPanel<P, D> {
    fn apply(&mut self, remaining_days: f32) -> Result<ActuationState, ActuatorError> {
        self.drive(remaining_days)
    }
}

fn indicator<P: OutputPin>(pin: &mut P, on: bool) -> Result<(), ActuatorError> {
    let res = if on { pin.set_high() } else { pin.set_low() };
    res.map_err(|_| ActuatorError::IndicatorWriteFailed)
}
