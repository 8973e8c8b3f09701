//! Stepper pump speed control
//!
//! The liquid pump is a stepper whose driver takes a step pulse train;
//! commanding a rate means programming a PWM slice that ticks at 1 MHz
//! with the matching period at a fixed 50% duty.

use brume_hal::gpio::OutputPin;
use brume_hal::pwm::PwmOutput;

/// Fixed step-output duty cycle, percent
const DUTY_PERCENT: u32 = 50;

/// Pump rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    fn pin_high(self) -> bool {
        match self {
            Direction::Forward => false,
            Direction::Reverse => true,
        }
    }
}

/// Stepper pump actuator
///
/// Owns the step PWM slice and the direction pin. The wrap/level pair
/// is recomputed whenever the rate changes; stopping disables the
/// output without touching them, so the next rate command re-enables
/// cleanly.
pub struct StepperPump<P, O> {
    pwm: P,
    dir_pin: O,
    rate_sps: u32,
    top: u32,
    level: u32,
    running: bool,
}

impl<P: PwmOutput, O: OutputPin> StepperPump<P, O> {
    /// Create a stopped pump
    pub fn new(pwm: P, dir_pin: O) -> Self {
        Self {
            pwm,
            dir_pin,
            rate_sps: 0,
            top: 0,
            level: 0,
            running: false,
        }
    }

    /// Command a step rate in steps per second
    ///
    /// With the 1 MHz tick base the wrap is `1_000_000 / rate - 1` and
    /// the compare level half the period. A rate of zero divides by
    /// zero, and a rate below 16 steps/s overflows the 16-bit wrap
    /// counter; both are outside the supported range and the ADC
    /// conversion chain never produces them.
    ///
    /// The direction pin is written before the new period takes effect.
    /// The hand-off is not glitch-free, which is invisible at these
    /// step rates.
    pub fn set_rate(&mut self, rate_sps: u32, direction: Direction) {
        self.dir_pin.set_state(direction.pin_high());

        self.rate_sps = rate_sps;
        self.top = 1_000_000 / rate_sps - 1;
        self.level = (self.top + 1) * DUTY_PERCENT / 100 - 1;

        self.pwm.set_wrap(self.top as u16);
        self.pwm.set_level(self.level as u16);
        self.pwm.set_enabled(true);
        self.running = true;
    }

    /// Disable the step output
    pub fn stop(&mut self) {
        self.pwm.set_enabled(false);
        self.running = false;
    }

    /// Last commanded rate, steps/s
    pub fn rate(&self) -> u32 {
        self.rate_sps
    }

    /// Current PWM wrap value
    pub fn top(&self) -> u32 {
        self.top
    }

    /// Current PWM compare level
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Whether the step output is enabled
    pub fn is_running(&self) -> bool {
        self.running
    }
}
