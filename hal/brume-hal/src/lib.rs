//! Brume Hardware Abstraction Layer
//!
//! This crate defines the peripheral traits the control, driver and
//! display logic is written against, so that all of it can be tested on
//! the host against fakes and reused on other chips.
//!
//! # Traits
//!
//! - [`gpio::DigitalInput`], [`gpio::OutputPin`] - Digital I/O
//! - [`adc::AnalogInput`] - Analog sampling
//! - [`pwm::PwmOutput`] - PWM slice control for the pump step output
//! - [`i2c::I2cBus`] - I2C bus writes for the display bridge

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod i2c;
pub mod pwm;

// Re-export key traits at crate root for convenience
pub use adc::AnalogInput;
pub use gpio::{DigitalInput, OutputPin};
pub use i2c::I2cBus;
pub use pwm::PwmOutput;
