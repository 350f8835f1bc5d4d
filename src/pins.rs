//! GPIO / peripheral pin assignments for the sentinel board (ESP32-S3).
//!
//! Single source of truth.  `main` claims the typed `Peripherals` pins
//! with the same numbers, and the raw sensor adapters use these constants
//! directly.

// ---------------------------------------------------------------------------
// Character LCD (HD44780, 4-bit bus)
// ---------------------------------------------------------------------------

/// Register select: LOW = instruction, HIGH = data.
pub const LCD_RS_GPIO: i32 = 8;
/// Enable strobe; the controller latches on the falling edge.
pub const LCD_E_GPIO: i32 = 9;
/// Data lines D4..D7, in bus order.
pub const LCD_DATA_GPIO: [i32; 4] = [10, 11, 12, 13];

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// Active buzzer, HIGH = sounding.
pub const BUZZER_GPIO: i32 = 14;
pub const LED_RED_GPIO: i32 = 15;
pub const LED_GREEN_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line (open-drain, pulled up).
pub const DHT11_GPIO: i32 = 6;

/// MQ-4 methane sensor, analog output via resistive divider.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const MQ4_ADC_GPIO: i32 = 5;
pub const MQ4_ADC1_CHANNEL: u32 = 4;

// ---------------------------------------------------------------------------
// UART1 to the Wi-Fi AT modem
// ---------------------------------------------------------------------------

pub const MODEM_TX_GPIO: i32 = 17;
pub const MODEM_RX_GPIO: i32 = 18;
