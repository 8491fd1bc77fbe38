use std::fmt::Debug;

use embedded_hal::i2c::I2c;
use tracing::trace;

///A byte stream to a single device on an i2c bus.
///
/// Writes and reads are register-pointer sequenced on the device side: writing one byte selects a register, and
/// a following read returns that register's value. Implementations report how many bytes actually moved so that
/// callers can detect short transfers.
pub trait BusChannel {
    type Error: Debug;

    ///Write all of `bytes` in one transaction. Returns the number of bytes transferred.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    ///Read up to `buffer.len()` bytes in one transaction. Returns the number of bytes transferred.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    ///Release the channel. The returned status is whatever the transport reports.
    fn close(self) -> Result<(), Self::Error>
    where
        Self: Sized;
}

///A bus channel that can be opened from a path and then bound to a device address.
pub trait OpenBus: BusChannel + Sized {
    fn open(path: &str) -> Result<Self, Self::Error>;

    fn bind(&mut self, address: u8) -> Result<(), Self::Error>;
}

///Adapts any `embedded_hal` i2c bus to a [`BusChannel`] bound to one address.
///
/// `embedded_hal` transactions either complete or fail, so a successful write or read always reports the full
/// buffer length.
pub struct HalBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> HalBus<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        HalBus { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    ///Give back the wrapped bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> BusChannel for HalBus<I2C> {
    type Error = I2C::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        trace!("i2c {:#04x} write {:02x?}", self.address, bytes);
        self.i2c.write(self.address, bytes)?;
        Ok(bytes.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        self.i2c.read(self.address, buffer)?;
        trace!("i2c {:#04x} read {:02x?}", self.address, buffer);
        Ok(buffer.len())
    }

    fn close(self) -> Result<(), Self::Error> {
        drop(self.i2c);
        Ok(())
    }
}
