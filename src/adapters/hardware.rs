//! Raw ESP-IDF sensor adapters.
//!
//! - [`Dht11`] bit-bangs the single-wire climate sensor on an open-drain
//!   GPIO and implements [`ClimateSensor`].
//! - [`Mq4Adc`] reads the methane sensor's analog output through the ADC1
//!   oneshot API and implements [`GasSensor`].
//!
//! Both go through `esp_idf_svc::sys` directly; pin numbers come from
//! [`crate::pins`].

use esp_idf_svc::sys::*;
use log::{debug, info};

use crate::app::ports::{ClimateSensor, GasSensor};
use crate::error::SensorError;

// ── Error type ────────────────────────────────────────────────

/// Errors while claiming a sensor peripheral at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    GpioConfigFailed(i32),
    AdcInitFailed(i32),
}

impl core::fmt::Display for HardwareError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HardwareError {}

fn check(ret: esp_err_t, err: fn(i32) -> HardwareError) -> Result<(), HardwareError> {
    if ret == ESP_OK as i32 { Ok(()) } else { Err(err(ret)) }
}

fn now_us() -> i64 {
    // SAFETY: read-only access to the monotonic RTC counter.
    unsafe { esp_timer_get_time() }
}

// ── DHT11 ─────────────────────────────────────────────────────

/// Host start pulse; the datasheet asks for at least 18 ms.
const START_LOW_MS: u32 = 20;
/// Longest phase the sensor is allowed to hold a level.
const PHASE_TIMEOUT_US: i64 = 100;
/// High phases longer than this encode a `1` bit (26-28 µs vs 70 µs).
const ONE_BIT_THRESHOLD_US: i64 = 40;

pub struct Dht11 {
    gpio: i32,
    temperature: f32,
    humidity: f32,
}

impl Dht11 {
    /// Configure `gpio` as open-drain with pull-up and idle it high.
    pub fn new(gpio: i32) -> Result<Self, HardwareError> {
        // SAFETY: boot-time configuration of a pin no other driver owns.
        unsafe {
            check(
                gpio_set_direction(gpio, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD),
                HardwareError::GpioConfigFailed,
            )?;
            check(
                gpio_set_pull_mode(gpio, gpio_pull_mode_t_GPIO_PULLUP_ONLY),
                HardwareError::GpioConfigFailed,
            )?;
            gpio_set_level(gpio, 1);
        }
        info!("DHT11 on GPIO{}", gpio);
        Ok(Self {
            gpio,
            temperature: 0.0,
            humidity: 0.0,
        })
    }

    fn level(&self) -> bool {
        // SAFETY: register read on a configured pin.
        (unsafe { gpio_get_level(self.gpio) }) != 0
    }

    /// Busy-wait until the line reads `level`; returns the time spent.
    fn wait_for(&self, level: bool) -> Result<i64, SensorError> {
        let start = now_us();
        loop {
            let elapsed = now_us() - start;
            if self.level() == level {
                return Ok(elapsed);
            }
            if elapsed > PHASE_TIMEOUT_US {
                return Err(SensorError::ClimateTimeout);
            }
        }
    }

    fn read_frame(&self) -> Result<[u8; 5], SensorError> {
        // Response: low 80 µs, high 80 µs, then the first bit's low phase.
        self.wait_for(false)?;
        self.wait_for(true)?;
        self.wait_for(false)?;

        let mut frame = [0u8; 5];
        for i in 0..40 {
            self.wait_for(true)?;
            let high_us = self.wait_for(false)?;
            if high_us > ONE_BIT_THRESHOLD_US {
                frame[i / 8] |= 0x80 >> (i % 8);
            }
        }
        Ok(frame)
    }
}

impl ClimateSensor for Dht11 {
    fn measure(&mut self) -> Result<(), SensorError> {
        // SAFETY: level writes on the pin configured in `new`.
        unsafe { gpio_set_level(self.gpio, 0) };
        esp_idf_hal::delay::FreeRtos::delay_ms(START_LOW_MS);

        // The bit timings are tens of microseconds; keep the scheduler out.
        let frame = esp_idf_hal::interrupt::free(|| {
            // SAFETY: release the line; the pull-up takes it high.
            unsafe { gpio_set_level(self.gpio, 1) };
            self.read_frame()
        })?;

        let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        if sum != frame[4] {
            debug!("DHT11 checksum {:#04x} != {:#04x}", sum, frame[4]);
            return Err(SensorError::ChecksumMismatch);
        }

        self.humidity = f32::from(frame[0]) + f32::from(frame[1]) / 10.0;
        let magnitude = f32::from(frame[2]) + f32::from(frame[3] & 0x7F) / 10.0;
        self.temperature = if frame[3] & 0x80 != 0 { -magnitude } else { magnitude };
        Ok(())
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn humidity(&self) -> f32 {
        self.humidity
    }
}

// ── MQ-4 (ADC1 oneshot) ───────────────────────────────────────

const ADC_FULL_SCALE: u32 = 4095;

pub struct Mq4Adc {
    handle: adc_oneshot_unit_handle_t,
    channel: adc_channel_t,
}

impl Mq4Adc {
    /// Claim ADC1 and configure `channel` for the 0-3.1 V range.
    pub fn new(channel: adc_channel_t) -> Result<Self, HardwareError> {
        let init_cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        // SAFETY: ADC1 is claimed once at boot; the handle is owned by `Self`.
        check(
            unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) },
            HardwareError::AdcInitFailed,
        )?;

        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        // SAFETY: `handle` was just created.
        check(
            unsafe { adc_oneshot_config_channel(handle, channel, &chan_cfg) },
            HardwareError::AdcInitFailed,
        )?;

        info!("MQ-4 on ADC1 channel {}", channel);
        Ok(Self { handle, channel })
    }
}

impl GasSensor for Mq4Adc {
    /// 12-bit sample stretched to the full `u16` range.
    fn read_raw_u16(&mut self) -> Result<u16, SensorError> {
        let mut raw: i32 = 0;
        // SAFETY: `handle` stays valid until drop; `&mut self` serialises reads.
        let ret = unsafe { adc_oneshot_read(self.handle, self.channel, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(SensorError::AdcReadFailed);
        }
        let raw = (raw.max(0) as u32).min(ADC_FULL_SCALE);
        Ok((raw * u32::from(u16::MAX) / ADC_FULL_SCALE) as u16)
    }
}

impl Drop for Mq4Adc {
    fn drop(&mut self) {
        // SAFETY: releases the unit claimed in `new`.
        unsafe { adc_oneshot_del_unit(self.handle) };
    }
}
