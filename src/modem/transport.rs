//! Transport abstraction: the serial byte stream to the AT modem.
//!
//! The modem link is generic over `SerialTransport`, so a UART, a USB CDC
//! bridge or a scripted test double all plug in without touching the
//! conversation logic.

/// Byte-oriented serial channel.
pub trait SerialTransport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Write all of `data`.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Read up to `buf.len()` currently buffered bytes into `buf`.
    /// Returns the number of bytes actually read; 0 if none (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;
}
