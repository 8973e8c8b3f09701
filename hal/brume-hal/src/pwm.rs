//! PWM slice abstraction
//!
//! The pump step output is an ordinary PWM channel whose counter ticks at
//! 1 MHz (the chip-specific implementation pins the clock divider to
//! sys_clk / 1_000_000). Period and duty are expressed in those ticks.

/// A single PWM slice/channel
pub trait PwmOutput {
    /// Set the counter wrap value (period = wrap + 1 ticks)
    fn set_wrap(&mut self, top: u16);

    /// Set the compare level (output is high while counter < level)
    fn set_level(&mut self, level: u16);

    /// Enable or disable the output
    ///
    /// Disabling must not clear the configured wrap/level, so a later
    /// enable resumes with the previous period.
    fn set_enabled(&mut self, enabled: bool);
}
