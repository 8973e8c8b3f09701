//! PWM slice wrapper
//!
//! Pins the slice's clock divider so the counter ticks at 1 MHz, which
//! is the tick base all pump period math assumes.

use brume_hal::pwm::PwmOutput;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use fixed::traits::ToFixed;

/// A PWM slice with a microsecond counter tick
///
/// embassy-rp applies wrap/level through a full config write, so the
/// wrapper keeps the current config and re-applies it on every change.
pub struct PwmSlice<'d> {
    pwm: Pwm<'d>,
    config: Config,
}

impl<'d> PwmSlice<'d> {
    /// Wrap a slice, dividing the system clock down to 1 MHz and
    /// leaving the output disabled
    pub fn new_1mhz(mut pwm: Pwm<'d>) -> Self {
        let mut config = Config::default();
        config.divider = ((clk_sys_freq() / 1_000_000) as u16).to_fixed();
        config.enable = false;
        pwm.set_config(&config);

        Self { pwm, config }
    }
}

impl PwmOutput for PwmSlice<'_> {
    fn set_wrap(&mut self, top: u16) {
        self.config.top = top;
        self.pwm.set_config(&self.config);
    }

    fn set_level(&mut self, level: u16) {
        self.config.compare_a = level;
        self.pwm.set_config(&self.config);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.config.enable = enabled;
        self.pwm.set_config(&self.config);
    }
}
