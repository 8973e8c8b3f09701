//! Tuning constants
//!
//! There is no runtime configuration surface; everything the machine
//! needs is fixed at compile time.

/// Control cycle period in milliseconds
pub const CYCLE_PERIOD_MS: u64 = 5;

/// Control cycles between display refreshes
pub const DISPLAY_REFRESH_CYCLES: u32 = 60;

/// Countdown to the first display refresh after power-on
pub const DISPLAY_FIRST_REFRESH_CYCLES: u32 = 30;

/// Pump rate during boost, in steps per second
pub const BOOST_RATE_SPS: u32 = 6500;

/// Steps per second per flow-ADC count
pub const FLOW_RATE_PER_COUNT: u32 = 2;

/// Boost-time ADC counts per armed countdown cycle
pub const BOOST_CHARGE_DIVISOR: u32 = 4;

/// Character columns per display line
pub const DISPLAY_COLS: usize = 20;

/// Display lines
pub const DISPLAY_ROWS: usize = 4;
