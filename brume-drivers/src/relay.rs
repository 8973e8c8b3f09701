//! Active-low relay outputs
//!
//! The air and liquid relay boards energize when their input is driven
//! low, so the wrapper inverts the logical state at the pin.

use brume_hal::gpio::OutputPin;

/// An active-low relay
pub struct Relay<O> {
    pin: O,
    energized: bool,
}

impl<O: OutputPin> Relay<O> {
    /// Wrap a pin, forcing the relay off
    pub fn new(pin: O) -> Self {
        let mut relay = Self {
            pin,
            energized: false,
        };
        relay.set(false);
        relay
    }

    /// Energize or release the relay
    pub fn set(&mut self, energized: bool) {
        self.energized = energized;

        if energized {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
    }

    /// Energize the relay
    pub fn energize(&mut self) {
        self.set(true);
    }

    /// Release the relay
    pub fn release(&mut self) {
        self.set(false);
    }

    /// Current logical state
    pub fn is_energized(&self) -> bool {
        self.energized
    }
}
