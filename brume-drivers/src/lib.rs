//! Hardware driver implementations
//!
//! This crate provides the drivers the control loop acts through,
//! written against the `brume-hal` traits so they can be exercised on
//! the host with fakes:
//!
//! - 4x20 character LCD behind an I2C bridge
//! - Stepper pump speed control via a PWM slice
//! - Active-low relay outputs

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod lcd;
pub mod pump;
pub mod relay;
