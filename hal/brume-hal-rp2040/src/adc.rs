//! ADC channel wrapper
//!
//! RP2040 has a single converter, so channels share it behind a
//! `RefCell` owned by the caller (the control loop is the only task;
//! the borrow can never be contended).

use core::cell::RefCell;

use brume_hal::adc::AnalogInput;
use defmt::warn;
use embassy_rp::adc::{Adc, Blocking, Channel};

/// One analog channel bound to the shared converter
pub struct AdcInput<'a, 'd> {
    adc: &'a RefCell<Adc<'d, Blocking>>,
    channel: Channel<'d>,
}

impl<'a, 'd> AdcInput<'a, 'd> {
    /// Bind a channel to the shared converter
    pub fn new(adc: &'a RefCell<Adc<'d, Blocking>>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl AnalogInput for AdcInput<'_, '_> {
    /// Sample the channel once; a faulted conversion reads as 0
    fn read(&mut self) -> u16 {
        match self.adc.borrow_mut().blocking_read(&mut self.channel) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("ADC conversion fault: {:?}", e);
                0
            }
        }
    }
}
