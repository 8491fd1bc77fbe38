use std::fmt::{Debug, Display, Formatter};

pub struct I2cBusError {
    pub message: String,
}

impl Debug for I2cBusError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        fmt.write_str(&self.message)
    }
}

impl Display for I2cBusError {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        fmt.write_str(&self.message)
    }
}

impl From<&str> for I2cBusError {
    fn from(s: &str) -> Self {
        Self {
            message: s.to_string(),
        }
    }
}

impl From<String> for I2cBusError {
    fn from(s: String) -> Self {
        Self { message: s }
    }
}

impl From<rppal::i2c::Error> for I2cBusError {
    fn from(err: rppal::i2c::Error) -> Self {
        Self {
            message: format!("RpiI2cError - Cause: {}", err),
        }
    }
}
