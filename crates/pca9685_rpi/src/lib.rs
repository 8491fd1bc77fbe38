//!Linux i2c access on the Raspberry Pi for the PCA9685 driver. It is a wrapper around the rppal library.
//!
//! [`RpiBus`] opens `/dev/i2c-N` bus paths and reports real transfer counts, so short transfers are detected.

//internal error type for rpi i2c
pub mod error;

use error::I2cBusError;
use pca9685_core::{BusChannel, OpenBus};
use rppal::i2c::I2c;
use tracing::{debug, trace};

pub use rppal;

const BUS_PATH_PREFIX: &str = "/dev/i2c-";

///Bus number of a `/dev/i2c-N` path. A bare number is accepted too.
pub fn parse_bus_path(path: &str) -> Result<u8, I2cBusError> {
    let number = path.strip_prefix(BUS_PATH_PREFIX).unwrap_or(path);
    number
        .parse::<u8>()
        .map_err(|_| I2cBusError::from(format!("not an i2c bus path: {}", path)))
}

///One Raspberry Pi i2c bus bound to a device address.
pub struct RpiBus {
    i2c: I2c,
    bus: u8,
}

impl RpiBus {
    pub fn bus(&self) -> u8 {
        self.bus
    }
}

impl BusChannel for RpiBus {
    type Error = I2cBusError;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, I2cBusError> {
        trace!("i2c-{} write {:02x?}", self.bus, bytes);
        Ok(self.i2c.write(bytes)?)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, I2cBusError> {
        let count = self.i2c.read(buffer)?;
        trace!("i2c-{} read {:02x?}", self.bus, &buffer[..count]);
        Ok(count)
    }

    fn close(self) -> Result<(), I2cBusError> {
        // rppal closes the device file on drop
        debug!("closing i2c-{}", self.bus);
        drop(self.i2c);
        Ok(())
    }
}

impl OpenBus for RpiBus {
    fn open(path: &str) -> Result<Self, I2cBusError> {
        let bus = parse_bus_path(path)?;
        let i2c = I2c::with_bus(bus)?;
        Ok(RpiBus { i2c, bus })
    }

    fn bind(&mut self, address: u8) -> Result<(), I2cBusError> {
        self.i2c.set_slave_address(u16::from(address))?;
        Ok(())
    }
}
