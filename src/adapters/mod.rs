//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements      | Connects to                 |
//! |------------|-----------------|-----------------------------|
//! | `hardware` | ClimateSensor   | DHT11 on an open-drain GPIO |
//! |            | GasSensor       | MQ-4 via ESP32 ADC1         |
//! | `log_sink` | EventSink       | Serial log output           |
//! | `time`     | Clock           | ESP32 system timer          |
//! | `uart`     | SerialTransport | ESP-IDF UART driver         |
//!
//! `hardware` and `uart` exist only on `target_os = "espidf"`.

#[cfg(target_os = "espidf")]
pub mod hardware;
pub mod log_sink;
pub mod time;
#[cfg(target_os = "espidf")]
pub mod uart;
