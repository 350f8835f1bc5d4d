//! UART adapter for the AT modem link.
//!
//! Wraps an ESP-IDF `UartDriver` as a [`SerialTransport`].  Reads never
//! block: they return whatever the driver's RX ring holds right now.

use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::sys::EspError;
use esp_idf_hal::uart::UartDriver;

use crate::modem::transport::SerialTransport;

/// Baud rate the modem firmware ships with.
pub const MODEM_BAUD: u32 = 115_200;

pub struct UartTransport<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartTransport<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self { uart }
    }
}

impl SerialTransport for UartTransport<'_> {
    type Error = EspError;

    fn write(&mut self, mut data: &[u8]) -> Result<(), EspError> {
        while !data.is_empty() {
            let n = self.uart.write(data)?;
            data = &data[n..];
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.uart.read(buf, NON_BLOCK)
    }

    fn available(&self) -> bool {
        self.uart.remaining_read().is_ok_and(|n| n > 0)
    }
}
