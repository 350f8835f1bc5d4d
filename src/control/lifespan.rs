//! Remaining-lifespan model
//!
//! Derives how many days the stored contents have left from humidity,
//! temperature and methane concentration.  Pure arithmetic, no I/O.

use crate::sensors::SensorReading;

/// Scale constant of the lifespan model.
pub const DEFAULT_LIFESPAN_CONSTANT: f32 = 2000.0;

/// Reference temperature (°C) at which the thermal factor is 1.
const REFERENCE_TEMP_C: f32 = 20.0;

/// Exponential rate per °C of deviation from the reference.
const THERMAL_RATE: f32 = 0.05;

/// Baseline the spoilage term is subtracted from.
const BASELINE_DAYS: f32 = 4.0;

/// Estimated remaining lifespan in days.  May be negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifespanEstimate {
    pub remaining_days: f32,
}

impl LifespanEstimate {
    /// Evaluate the model for one reading.
    pub fn from_reading(reading: &SensorReading, constant: f32) -> Self {
        Self {
            remaining_days: compute_lifespan(
                reading.humidity_pct,
                reading.temperature_c,
                reading.gas_ppm,
                constant,
            ),
        }
    }
}

/// `4 - (humidity/100) * e^(0.05 * (temperature - 20)) * (constant / methane)`.
///
/// A methane concentration at or below zero is treated as 1 ppm.
pub fn compute_lifespan(humidity: f32, temperature: f32, methane_ppm: i32, constant: f32) -> f32 {
    let methane = if methane_ppm <= 0 { 1 } else { methane_ppm };
    let thermal = (THERMAL_RATE * (temperature - REFERENCE_TEMP_C)).exp();
    let spoilage = (humidity / 100.0) * thermal * (constant / methane as f32);
    BASELINE_DAYS - spoilage
}
