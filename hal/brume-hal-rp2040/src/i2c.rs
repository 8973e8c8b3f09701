//! I2C bus wrapper

use brume_hal::i2c::I2cBus;
use embassy_rp::i2c::{Blocking, Error, I2c};

/// Blocking I2C master port
pub struct I2cPort<'d> {
    inner: I2c<'d, Blocking>,
}

impl<'d> I2cPort<'d> {
    /// Wrap a configured blocking I2C peripheral
    pub fn new(inner: I2c<'d, Blocking>) -> Self {
        Self { inner }
    }
}

impl I2cBus for I2cPort<'_> {
    type Error = Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Error> {
        self.inner.blocking_write(address as u16, data)
    }
}
