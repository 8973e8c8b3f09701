//! GPIO wrappers
//!
//! Newtypes over embassy-rp pins implementing the HAL traits (the
//! traits and the embassy types are both foreign to this crate).

use brume_hal::gpio::{DigitalInput, OutputPin};
use embassy_rp::gpio::{Input, Output};

/// A digital input pin
pub struct InputPort<'d> {
    inner: Input<'d>,
}

impl<'d> InputPort<'d> {
    /// Wrap a configured input (direction and pulls already set)
    pub fn new(inner: Input<'d>) -> Self {
        Self { inner }
    }
}

impl DigitalInput for InputPort<'_> {
    fn is_high(&self) -> bool {
        self.inner.is_high()
    }
}

/// A digital output pin
pub struct OutputPort<'d> {
    inner: Output<'d>,
}

impl<'d> OutputPort<'d> {
    /// Wrap a configured output (initial level already set)
    pub fn new(inner: Output<'d>) -> Self {
        Self { inner }
    }
}

impl OutputPin for OutputPort<'_> {
    fn set_high(&mut self) {
        self.inner.set_high();
    }

    fn set_low(&mut self) {
        self.inner.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.inner.is_set_high()
    }
}
