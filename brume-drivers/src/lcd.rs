//! 4x20 character LCD behind a PCF8574-class I2C bridge
//!
//! The bridge exposes the display's 4-bit interface on one I2C port
//! byte: data/command nibble in the upper four bits, backlight, enable
//! and register-select flags in the lower four. Every display byte goes
//! out as two nibble transfers (high nibble first), each latched by
//! pulsing the enable flag.
//!
//! The enable pulse needs a settle time either side of each edge;
//! pulsing faster than that corrupts the transfer.

use brume_core::config::DISPLAY_COLS;
use brume_hal::i2c::I2cBus;
use embedded_hal::delay::DelayNs;

/// Default bus address of these bridge boards
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Settle time around each enable edge, microseconds
pub const ENABLE_SETTLE_US: u32 = 600;

// commands
const LCD_CLEAR_DISPLAY: u8 = 0x01;
const LCD_ENTRY_MODE_SET: u8 = 0x04;
const LCD_DISPLAY_CONTROL: u8 = 0x08;
const LCD_FUNCTION_SET: u8 = 0x20;

// flags for display entry mode
const LCD_ENTRY_LEFT: u8 = 0x02;

// flags for display control
const LCD_DISPLAY_ON: u8 = 0x04;

// flags for function set
const LCD_2LINE: u8 = 0x08;

// port byte flags
const LCD_BACKLIGHT: u8 = 0x08;
const LCD_ENABLE: u8 = 0x04;

/// Register-select flag for one transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Command,
    Data,
}

impl Mode {
    fn bit(self) -> u8 {
        match self {
            Mode::Command => 0x00,
            Mode::Data => 0x01,
        }
    }
}

/// One of the four display rows
///
/// Rows map to fixed DDRAM base addresses; writing characters
/// auto-increments within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Row {
    Top,
    Second,
    Third,
    Bottom,
}

impl Row {
    /// All rows, top to bottom
    pub const ALL: [Row; 4] = [Row::Top, Row::Second, Row::Third, Row::Bottom];

    /// Set-DDRAM-address command byte for the start of this row
    pub fn address(self) -> u8 {
        match self {
            Row::Top => 0x80,
            Row::Second => 0xC0,
            Row::Third => 0x94,
            Row::Bottom => 0xD4,
        }
    }
}

/// Character LCD driver
///
/// Generic over the bus and the settle-delay provider so the wire
/// protocol can be verified on the host. Bus errors propagate; there is
/// no retry at this layer.
pub struct Lcd<B, D> {
    bus: B,
    delay: D,
    address: u8,
}

impl<B: I2cBus, D: DelayNs> Lcd<B, D> {
    /// Create a driver for a bridge at the default address
    pub fn new(bus: B, delay: D) -> Self {
        Self::with_address(bus, delay, DEFAULT_ADDRESS)
    }

    /// Create a driver for a bridge at a specific address
    pub fn with_address(bus: B, delay: D, address: u8) -> Self {
        Self { bus, delay, address }
    }

    /// Run the power-on initialization sequence
    ///
    /// The controller may wake in either 8-bit or 4-bit mode, so the
    /// reset nibble is repeated before switching to 4-bit and
    /// configuring entry mode, function set and display control.
    pub fn init(&mut self) -> Result<(), B::Error> {
        self.command(0x03)?;
        self.command(0x03)?;
        self.command(0x03)?;
        self.command(0x02)?;

        self.command(LCD_ENTRY_MODE_SET | LCD_ENTRY_LEFT)?;
        self.command(LCD_FUNCTION_SET | LCD_2LINE)?;
        self.command(LCD_DISPLAY_CONTROL | LCD_DISPLAY_ON)?;
        self.clear()
    }

    /// Clear the display
    pub fn clear(&mut self) -> Result<(), B::Error> {
        self.command(LCD_CLEAR_DISPLAY)
    }

    /// Send a command byte
    pub fn command(&mut self, byte: u8) -> Result<(), B::Error> {
        self.send(byte, Mode::Command)
    }

    /// Send one character at the current cursor position
    pub fn write_char(&mut self, ch: u8) -> Result<(), B::Error> {
        self.send(ch, Mode::Data)
    }

    /// Move the cursor to the start of a row
    pub fn set_row(&mut self, row: Row) -> Result<(), B::Error> {
        self.command(row.address())
    }

    /// Write a line of text to a row, truncated at the panel width
    pub fn write_row(&mut self, row: Row, text: &str) -> Result<(), B::Error> {
        self.set_row(row)?;
        for &ch in text.as_bytes().iter().take(DISPLAY_COLS) {
            self.write_char(ch)?;
        }
        Ok(())
    }

    /// Send one byte as two nibble transfers, high nibble first
    fn send(&mut self, byte: u8, mode: Mode) -> Result<(), B::Error> {
        let high = mode.bit() | (byte & 0xF0) | LCD_BACKLIGHT;
        let low = mode.bit() | ((byte << 4) & 0xF0) | LCD_BACKLIGHT;

        self.write_port(high)?;
        self.pulse_enable(high)?;
        self.write_port(low)?;
        self.pulse_enable(low)
    }

    /// Latch the nibble currently on the port
    fn pulse_enable(&mut self, value: u8) -> Result<(), B::Error> {
        self.delay.delay_us(ENABLE_SETTLE_US);
        self.write_port(value | LCD_ENABLE)?;
        self.delay.delay_us(ENABLE_SETTLE_US);
        self.write_port(value & !LCD_ENABLE)?;
        self.delay.delay_us(ENABLE_SETTLE_US);
        Ok(())
    }

    fn write_port(&mut self, value: u8) -> Result<(), B::Error> {
        self.bus.write(self.address, &[value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    /// Mock bus recording every port byte
    struct MockBus {
        writes: heapless::Vec<u8, 1024>,
    }

    impl MockBus {
        fn new() -> Self {
            Self {
                writes: heapless::Vec::new(),
            }
        }
    }

    impl I2cBus for MockBus {
        type Error = Infallible;

        fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Infallible> {
            assert_eq!(address, DEFAULT_ADDRESS);
            assert_eq!(data.len(), 1);
            self.writes.extend_from_slice(data).unwrap();
            Ok(())
        }
    }

    /// Mock delay counting settle calls
    struct MockDelay {
        settles: u32,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            assert_eq!(ns, ENABLE_SETTLE_US * 1_000);
            self.settles += 1;
        }
    }

    fn lcd() -> Lcd<MockBus, MockDelay> {
        Lcd::new(MockBus::new(), MockDelay { settles: 0 })
    }

    #[test]
    fn test_command_nibble_encoding() {
        let mut lcd = lcd();
        lcd.command(0xAB).unwrap();

        // High nibble first, backlight (0x08) in every transfer, enable
        // (0x04) pulsed low -> high -> low around each nibble.
        assert_eq!(
            lcd.bus.writes.as_slice(),
            &[0xA8, 0xAC, 0xA8, 0xB8, 0xBC, 0xB8]
        );

        // Three settles per enable pulse, two pulses per byte.
        assert_eq!(lcd.delay.settles, 6);
    }

    #[test]
    fn test_data_transfers_set_register_select() {
        let mut lcd = lcd();
        lcd.write_char(b'A').unwrap();

        assert_eq!(
            lcd.bus.writes.as_slice(),
            &[0x49, 0x4D, 0x49, 0x19, 0x1D, 0x19]
        );
    }

    #[test]
    fn test_backlight_always_set() {
        let mut lcd = lcd();
        lcd.command(0x00).unwrap();
        lcd.write_char(0x00).unwrap();

        for &byte in &lcd.bus.writes {
            assert_ne!(byte & LCD_BACKLIGHT, 0, "byte {:#04x}", byte);
        }
    }

    #[test]
    fn test_row_addresses() {
        assert_eq!(Row::Top.address(), 0x80);
        assert_eq!(Row::Second.address(), 0xC0);
        assert_eq!(Row::Third.address(), 0x94);
        assert_eq!(Row::Bottom.address(), 0xD4);
    }

    #[test]
    fn test_write_row_addresses_then_streams() {
        let mut lcd = lcd();
        lcd.write_row(Row::Second, "Hi").unwrap();

        // One command (cursor) plus two characters, six port bytes each.
        assert_eq!(lcd.bus.writes.len(), 18);

        // The cursor command carries the row base address: high nibble
        // 0xC0 with the command register selected.
        assert_eq!(lcd.bus.writes[0], 0xC0 | LCD_BACKLIGHT);
    }

    #[test]
    fn test_write_row_truncates_at_panel_width() {
        let mut lcd = lcd();
        let long = "a line considerably wider than the panel";
        lcd.write_row(Row::Top, long).unwrap();

        assert_eq!(lcd.bus.writes.len(), (1 + DISPLAY_COLS) * 6);
    }

    #[test]
    fn test_init_sequence() {
        let mut lcd = lcd();
        lcd.init().unwrap();

        // 8 command bytes: 3x reset, 4-bit switch, entry mode, function
        // set, display on, clear.
        assert_eq!(lcd.bus.writes.len(), 8 * 6);

        // Reassemble each command from its two nibble transfers
        // (transfers 0 and 3 of each group of six carry the bare
        // nibbles).
        let commands: heapless::Vec<u8, 8> = lcd
            .bus
            .writes
            .chunks(6)
            .map(|group| (group[0] & 0xF0) | (group[3] >> 4))
            .collect();
        assert_eq!(
            commands.as_slice(),
            &[0x03, 0x03, 0x03, 0x02, 0x06, 0x28, 0x0C, 0x01]
        );
    }
}
