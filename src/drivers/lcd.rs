//! HD44780-compatible 16×2 character LCD on a bit-banged 4-bit bus.
//!
//! Six GPIO lines: register-select (RS), enable (E) and data D4–D7.
//! Every byte goes out as two nibbles, high nibble first:
//!
//! ```text
//!   RS ───┐ data(hi) ┌─E─┐ 100µs  data(lo) ┌─E─┐ 100µs
//!         └──────────┘≥5µ└─────────────────┘≥5µ└──────
//! ```
//!
//! RS = 0 selects the instruction register, RS = 1 the data register.
//! The driver keeps a shadow of the visible DDRAM window so callers (and
//! tests) can read back what is on the glass.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::ports::DisplayPort;
use crate::error::DisplayError;

pub const COLUMNS: usize = 16;
pub const ROWS: usize = 2;

/// Function set ×2 (8-bit wake-up), 4-bit lock, 2 lines 5×8 font,
/// display on / cursor off, entry mode increment, clear.
pub const INIT_SEQUENCE: [u8; 6] = [0x33, 0x32, 0x28, 0x0C, 0x06, 0x01];

pub const CMD_CLEAR: u8 = 0x01;
/// DDRAM base address of each row, OR'd into the set-address command.
const ROW_ADDRESS: [u8; ROWS] = [0x80, 0xC0];

/// Minimum enable-high time per nibble.
pub const ENABLE_PULSE_US: u32 = 5;
/// Settle after each enable strobe.
pub const NIBBLE_SETTLE_US: u32 = 100;
/// Clear (and the init sequence, which ends in clear) needs ~1.5 ms.
pub const CLEAR_SETTLE_MS: u32 = 2;
/// Pause either side of the clear in [`Lcd1602::write_lines`].
pub const MESSAGE_SETTLE_MS: u32 = 100;

/// Controller ROM code for `°`.
const GLYPH_DEGREE: u8 = 0xDF;

/// Register the next byte is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Register {
    Command,
    Data,
}

/// Bytes needed to hold one row read back as UTF-8.  Every glyph decodes
/// to at most two bytes (`°`).
pub const LINE_BYTES: usize = COLUMNS * 2;

/// What the display currently shows, one string per row with trailing
/// blanks removed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayContent {
    pub lines: [heapless::String<LINE_BYTES>; ROWS],
}

/// 16×2 LCD driver.  All lines share one pin type; on target use degraded
/// `AnyOutputPin` drivers.
pub struct Lcd1602<P, D> {
    rs: P,
    en: P,
    /// D4, D5, D6, D7.
    data: [P; 4],
    delay: D,
    shadow: [[u8; COLUMNS]; ROWS],
    cursor: (usize, usize),
}

impl<P: OutputPin, D: DelayNs> Lcd1602<P, D> {
    /// Take ownership of the bus lines.  No bus traffic until
    /// [`initialize`](Self::initialize).
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Self {
        Self {
            rs,
            en,
            data,
            delay,
            shadow: [[b' '; COLUMNS]; ROWS],
            cursor: (0, 0),
        }
    }

    /// Run the power-on sequence and leave the display blank.
    pub fn initialize(&mut self) -> Result<(), DisplayError> {
        for cmd in INIT_SEQUENCE {
            self.command(cmd)?;
        }
        self.delay.delay_ms(CLEAR_SETTLE_MS);
        self.blank_shadow();
        debug!("LCD initialised (4-bit, 2 lines)");
        Ok(())
    }

    /// Clear DDRAM and home the cursor.
    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(CLEAR_SETTLE_MS);
        self.blank_shadow();
        Ok(())
    }

    /// Move the DDRAM address.  Any row other than 0 selects row 1.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), DisplayError> {
        let row = usize::from(row != 0);
        self.command(ROW_ADDRESS[row] | col)?;
        self.cursor = (usize::from(col), row);
        Ok(())
    }

    /// Write characters at the cursor.
    pub fn put_str(&mut self, text: &str) -> Result<(), DisplayError> {
        for c in text.chars() {
            let glyph = glyph_for(c);
            self.write_byte(glyph, Register::Data)?;
            let (col, row) = self.cursor;
            if col < COLUMNS {
                self.shadow[row][col] = glyph;
            }
            self.cursor.0 += 1;
        }
        Ok(())
    }

    /// Replace the whole screen: line 1 on row 0, line 2 on row 1.
    ///
    /// Each line is cut to the panel width.  An empty `line2` leaves row 1
    /// blank without addressing it.
    pub fn write_lines(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        self.delay.delay_ms(MESSAGE_SETTLE_MS);
        self.clear()?;
        self.delay.delay_ms(MESSAGE_SETTLE_MS);
        self.put_str(truncate(line1))?;
        if !line2.is_empty() {
            self.set_cursor(0, 1)?;
            self.put_str(truncate(line2))?;
        }
        Ok(())
    }

    /// Send one instruction byte.
    pub fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.write_byte(cmd, Register::Command)
    }

    /// Snapshot of the visible characters.
    pub fn content(&self) -> DisplayContent {
        let mut content = DisplayContent::default();
        for (row, line) in self.shadow.iter().enumerate() {
            let end = line.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
            content.lines[row] = line[..end].iter().map(|&b| char_for(b)).collect();
        }
        content
    }

    /// Give the bus lines and delay back.
    pub fn release(self) -> (P, P, [P; 4], D) {
        (self.rs, self.en, self.data, self.delay)
    }

    // ── Bus protocol ──────────────────────────────────────────

    fn write_byte(&mut self, byte: u8, register: Register) -> Result<(), DisplayError> {
        set_line(&mut self.rs, register == Register::Data)?;
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), DisplayError> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            set_line(pin, (nibble >> bit) & 1 == 1)?;
        }
        self.en.set_high().map_err(|_| DisplayError::BusWriteFailed)?;
        self.delay.delay_us(ENABLE_PULSE_US);
        self.en.set_low().map_err(|_| DisplayError::BusWriteFailed)?;
        self.delay.delay_us(NIBBLE_SETTLE_US);
        Ok(())
    }

    fn blank_shadow(&mut self) {
        self.shadow = [[b' '; COLUMNS]; ROWS];
        self.cursor = (0, 0);
    }
}

impl<P: OutputPin, D: DelayNs> DisplayPort for Lcd1602<P, D> {
    fn show(&mut self, line1: &str, line2: &str) -> Result<(), DisplayError> {
        self.write_lines(line1, line2)
    }
}

fn set_line<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), DisplayError> {
    let res = if high { pin.set_high() } else { pin.set_low() };
    res.map_err(|_| DisplayError::BusWriteFailed)
}

/// Map a char onto the controller's A00 character ROM.
fn glyph_for(c: char) -> u8 {
    match c {
        ' '..='}' => c as u8,
        '°' => GLYPH_DEGREE,
        _ => b'?',
    }
}

/// Inverse of [`glyph_for`] for the glyphs the driver writes.
fn char_for(glyph: u8) -> char {
    if glyph == GLYPH_DEGREE { '°' } else { char::from(glyph) }
}

/// First [`COLUMNS`] chars of `text`.
fn truncate(text: &str) -> &str {
    match text.char_indices().nth(COLUMNS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
