//! RoomSentinel Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Dht11 + Mq4Adc    UartTransport   SystemClock   LogEventSink  │
//! │  (Climate/Gas)     (Serial)        (Clock)       (EventSink)   │
//! │                                                                │
//! │  Lcd1602 (DisplayPort)  AlertPanel (AlertPort)                 │
//! │  SensorHub (SensorPort) ModemLink (UplinkPort)                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControlLoop (pure logic)                    │    │
//! │  │  sample · lifespan · alert · render · upload           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::gpio::{AnyIOPin, OutputPin, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{error, info};

use roomsentinel::adapters::hardware::{Dht11, Mq4Adc};
use roomsentinel::adapters::log_sink::LogEventSink;
use roomsentinel::adapters::time::SystemClock;
use roomsentinel::adapters::uart::{MODEM_BAUD, UartTransport};
use roomsentinel::app::service::ControlLoop;
use roomsentinel::config::SystemConfig;
use roomsentinel::drivers::alerts::{AlertPanel, AlertThresholds};
use roomsentinel::drivers::lcd::Lcd1602;
use roomsentinel::modem::ModemLink;
use roomsentinel::modem::request::Endpoint;
use roomsentinel::pins;
use roomsentinel::sensors::SensorHub;

/// Credentials are baked in at build time; there is no provisioning path.
fn boot_config() -> SystemConfig {
    SystemConfig {
        wifi_ssid: option_env!("SENTINEL_WIFI_SSID").unwrap_or_default().into(),
        wifi_password: option_env!("SENTINEL_WIFI_PASSWORD").unwrap_or_default().into(),
        api_key: option_env!("SENTINEL_API_KEY").unwrap_or_default().into(),
        ..SystemConfig::default()
    }
}

/// Nothing left to do; keep the idle task fed.
fn park() -> ! {
    loop {
        esp_idf_hal::delay::FreeRtos::delay_ms(60_000);
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RoomSentinel v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = boot_config();
    if let Err(e) = config.validate() {
        error!("Invalid build configuration: {}, halting", e);
        park();
    }

    // ── 3. Peripherals ────────────────────────────────────────
    let p = Peripherals::take()?;
    let clock = SystemClock::new();

    let mut lcd = Lcd1602::new(
        PinDriver::output(p.pins.gpio8.downgrade_output())?,
        PinDriver::output(p.pins.gpio9.downgrade_output())?,
        [
            PinDriver::output(p.pins.gpio10.downgrade_output())?,
            PinDriver::output(p.pins.gpio11.downgrade_output())?,
            PinDriver::output(p.pins.gpio12.downgrade_output())?,
            PinDriver::output(p.pins.gpio13.downgrade_output())?,
        ],
        clock,
    );
    lcd.initialize()?;

    let alerts = AlertPanel::new(
        PinDriver::output(p.pins.gpio14.downgrade_output())?,
        PinDriver::output(p.pins.gpio15.downgrade_output())?,
        PinDriver::output(p.pins.gpio16.downgrade_output())?,
        clock,
        AlertThresholds::from(&config),
    );

    let sensors = SensorHub::new(
        Dht11::new(pins::DHT11_GPIO)?,
        Mq4Adc::new(pins::MQ4_ADC1_CHANNEL)?,
    );

    let uart = UartDriver::new(
        p.uart1,
        p.pins.gpio17,
        p.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(MODEM_BAUD)),
    )?;
    let modem = ModemLink::new(
        UartTransport::new(uart),
        clock,
        Endpoint::from(&config),
        config.modem_timings(),
    );
    info!(
        "Peripherals ready (modem UART1 tx={} rx={}, {} baud)",
        pins::MODEM_TX_GPIO,
        pins::MODEM_RX_GPIO,
        MODEM_BAUD
    );

    // ── 4. Control loop ───────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut control = ControlLoop::new(config, sensors, lcd, alerts, modem, clock);
    // `run` only comes back when the one-time join fails.
    if let Err(e) = control.run(&mut sink) {
        error!("Control loop stopped: {}, halting", e);
    }
    park()
}
