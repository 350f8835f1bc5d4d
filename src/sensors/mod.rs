//! Sensor acquisition: the aggregating [`SensorHub`].
//!
//! The hub owns the climate and gas sensor drivers and produces one
//! [`SensorReading`] per control-loop iteration.  Raw driver access sits
//! behind the [`ClimateSensor`] and [`GasSensor`] capability ports; the
//! hub adds gas normalisation and a plausibility check.

use log::debug;

use crate::app::ports::{ClimateSensor, GasSensor, SensorPort};
use crate::error::SensorError;

/// Full-scale value of the 16-bit gas ADC reading.
const GAS_FULL_SCALE: u32 = 65_535;
/// Concentration reported at full scale.
const GAS_FULL_SCALE_PPM: u32 = 1_000;

const HUMIDITY_RANGE: core::ops::RangeInclusive<f32> = 0.0..=100.0;
const TEMPERATURE_RANGE_C: core::ops::RangeInclusive<f32> = -40.0..=80.0;

/// One sample of every sensor.  Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    /// Raw 16-bit gas ADC value.
    pub raw_gas: u16,
    /// Gas concentration derived from `raw_gas`.
    pub gas_ppm: i32,
}

/// `raw / 65535 * 1000`, truncated toward zero.
pub fn gas_ppm(raw: u16) -> i32 {
    (u32::from(raw) * GAS_FULL_SCALE_PPM / GAS_FULL_SCALE) as i32
}

/// Aggregates the sensor drivers and produces a unified reading.
pub struct SensorHub<C, G> {
    climate: C,
    gas: G,
}

impl<C: ClimateSensor, G: GasSensor> SensorHub<C, G> {
    pub fn new(climate: C, gas: G) -> Self {
        Self { climate, gas }
    }

    /// Measure climate, sample gas, and validate the result.
    ///
    /// Any driver failure or implausible value aborts the whole reading;
    /// no previous value is substituted.
    pub fn read(&mut self) -> Result<SensorReading, SensorError> {
        self.climate.measure()?;
        let temperature_c = self.climate.temperature();
        let humidity_pct = self.climate.humidity();
        let raw_gas = self.gas.read_raw_u16()?;

        if !TEMPERATURE_RANGE_C.contains(&temperature_c) || !HUMIDITY_RANGE.contains(&humidity_pct) {
            debug!("Implausible climate sample: T={temperature_c} H={humidity_pct}");
            return Err(SensorError::OutOfRange);
        }

        Ok(SensorReading {
            temperature_c,
            humidity_pct,
            raw_gas,
            gas_ppm: gas_ppm(raw_gas),
        })
    }
}

impl<C: ClimateSensor, G: GasSensor> SensorPort for SensorHub<C, G> {
    fn acquire(&mut self) -> Result<SensorReading, SensorError> {
        self.read()
    }
}
