//! RP2040 implementations of the Brume HAL traits
//!
//! Thin wrappers over embassy-rp peripherals. Everything here is
//! blocking: the control loop is the only task and its cycle budget
//! absorbs the transfer times.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod i2c;
pub mod pwm;
