//!A mod for the error types
use std::fmt::{self, Debug, Display};

///Errors raised by the PCA9685 driver. `E` is the error type of the bus channel underneath.
pub enum Pca9685Error<E> {
    ///The bus at `path` could not be opened.
    Open { path: String, cause: E },
    ///The bus was opened but the chip address could not be bound.
    Address { address: u8, cause: E },
    ///The bus channel reported an error during a read or write.
    Bus(E),
    ///A transfer moved fewer bytes than requested. The chip may be partially updated.
    ShortTransfer {
        register: u8,
        expected: usize,
        actual: usize,
    },
    ///Channel id outside of 0..=15.
    InvalidChannel(u8),
    ///Tick value outside of 0..=4095.
    InvalidTicks(u16),
    ///Frequency that cannot produce a prescale value (zero).
    InvalidFrequency(u32),
}

impl<E> Pca9685Error<E> {
    ///True when the transport itself could not be reached (open or address bind failed).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::Address { .. })
    }
}

// lets `?` lift raw bus errors
impl<E> From<E> for Pca9685Error<E> {
    fn from(err: E) -> Self {
        Pca9685Error::Bus(err)
    }
}

impl<E: Debug> Debug for Pca9685Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, cause } => write!(f, "Pca9685Error: could not open bus {}. {:?}", path, cause),
            Self::Address { address, cause } => {
                write!(f, "Pca9685Error: could not address device {:#04x}. {:?}", address, cause)
            }
            Self::Bus(cause) => write!(f, "Pca9685Error: bus error. {:?}", cause),
            Self::ShortTransfer {
                register,
                expected,
                actual,
            } => write!(
                f,
                "Pca9685Error: short transfer at register {:#04x}, expected {} bytes but moved {}",
                register, expected, actual
            ),
            Self::InvalidChannel(channel) => write!(f, "Pca9685Error: invalid channel {} (must be 0-15)", channel),
            Self::InvalidTicks(ticks) => write!(f, "Pca9685Error: invalid tick value {} (must be 0-4095)", ticks),
            Self::InvalidFrequency(freq) => write!(f, "Pca9685Error: invalid frequency {} Hz", freq),
        }
    }
}

impl<E: Debug> Display for Pca9685Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

///Common error type when building devices from configuration.
pub enum BuildError {
    Message(String),
    Messages(Vec<String>),
}

impl BuildError {
    pub fn from_string(msg: String) -> Self {
        BuildError::Message(msg)
    }
    pub fn from_errs(errs: Vec<BuildError>) -> Self {
        let mut messages = Vec::with_capacity(errs.len());
        for err in errs {
            match err {
                Self::Message(msg) => messages.push(msg),
                Self::Messages(mut msgs) => messages.append(&mut msgs),
            }
        }
        Self::Messages(messages)
    }
    pub fn message(msg: &str) -> Self {
        BuildError::Message(msg.to_string())
    }
}

impl Debug for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(message) => f.write_fmt(format_args!("BuildError: {}", message)),
            Self::Messages(messages) => f.write_fmt(format_args!(
                "BuildError (multiple): \n{}",
                messages.join("\n")
            )),
        }
    }
}

impl Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl<E: Debug> From<Pca9685Error<E>> for BuildError {
    fn from(err: Pca9685Error<E>) -> Self {
        BuildError::from_string(format!("Could not configure PCA9685 device: {:?}", err))
    }
}
