//! Status display composition
//!
//! Formats the four status lines from the current control state. Runs on
//! a slower cadence than the control cycle ([`RefreshDivider`]); the
//! refresh itself blocks the loop for the duration of the serial
//! transfers, which the refresh divisor accounts for.
//!
//! Every composed line is exactly [`DISPLAY_COLS`] characters - shorter
//! text is space-padded, longer text is truncated - so a refresh never
//! leaves stale characters from the previous screen.

use core::fmt::{self, Write};

use heapless::String;

use crate::config::{
    CYCLE_PERIOD_MS, DISPLAY_COLS, DISPLAY_FIRST_REFRESH_CYCLES, DISPLAY_REFRESH_CYCLES,
    DISPLAY_ROWS,
};

/// One display line, fixed at the panel width
pub type Line = String<DISPLAY_COLS>;

/// Control state captured for one display refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusView {
    /// Displayed flow, ml/min
    pub flow_ml_min: u32,
    /// Boost countdown, in control cycles
    pub boost_cycles: u32,
    /// Auto-boost toggle
    pub auto_boost: bool,
    /// Process-enable optocoupler
    pub process_enable: bool,
    /// Mist toggle
    pub mist: bool,
}

impl StatusView {
    /// Compose all four lines, top to bottom
    pub fn compose(&self) -> [Line; DISPLAY_ROWS] {
        [
            self.flow_line(),
            self.boost_line(),
            self.mode_line(),
            legend_line(),
        ]
    }

    fn flow_line(&self) -> Line {
        padded(format_args!("Flow:   {:2} ml/min", self.flow_ml_min))
    }

    /// Boost status, one of three mutually exclusive phrasings:
    /// disabled, counting down, or armed while the process is idle.
    fn boost_line(&self) -> Line {
        let secs = boost_seconds(self.boost_cycles);

        if !self.auto_boost {
            padded(format_args!("Boost:   off"))
        } else if self.process_enable && self.mist {
            padded(format_args!("Boost:  {:2} s left", secs))
        } else {
            padded(format_args!("Boost:  {:2} s   activ", secs))
        }
    }

    fn mode_line(&self) -> Line {
        if self.mist {
            padded(format_args!("Cooling: Mist"))
        } else {
            padded(format_args!("Cooling: Air only"))
        }
    }
}

fn legend_line() -> Line {
    padded(format_args!("|Man|Air|Boost|ml|s|"))
}

/// Boost countdown as the seconds figure shown on the panel
pub fn boost_seconds(cycles: u32) -> u32 {
    (cycles as u64 * CYCLE_PERIOD_MS / 500) as u32
}

/// Format into a line, truncated at the panel width and space-padded to
/// exactly fill it
fn padded(args: fmt::Arguments) -> Line {
    let mut line = Line::new();
    let _ = line.write_fmt(args);
    while line.push(' ').is_ok() {}
    line
}

/// Down-counter gating display refreshes to every Nth control cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshDivider {
    remaining: u32,
}

impl RefreshDivider {
    /// Create a divider that first fires after `initial` cycles
    pub const fn new(initial: u32) -> Self {
        Self { remaining: initial }
    }

    /// Divider with the power-on countdown
    pub const fn startup() -> Self {
        Self::new(DISPLAY_FIRST_REFRESH_CYCLES)
    }

    /// Advance one control cycle; returns `true` when the display
    /// should be redrawn this cycle
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            self.remaining = DISPLAY_REFRESH_CYCLES;
            true
        } else {
            self.remaining -= 1;
            false
        }
    }
}

impl Default for RefreshDivider {
    fn default() -> Self {
        Self::startup()
    }
}
