//!Driver for the NXP PCA9685, a 16 channel 12 bit PWM controller on i2c.
//!
//! [`Pca9685::open`] binds a chip and brings it up with totem-pole outputs at 50 Hz. After that the frequency can
//! be changed with [`Pca9685::set_frequency`] and each output programmed with [`Pca9685::set_channel`], which
//! takes the rising and falling edge as tick positions (0-4095) within one PWM period. Converting duty cycles,
//! pulse widths or servo angles to ticks is up to the caller.
//!
//! The driver talks to the chip through a [`BusChannel`](pca9685_core::BusChannel). Use
//! [`HalBus`](pca9685_core::HalBus) for any `embedded_hal` i2c bus, or `pca9685_rpi::RpiBus` for Linux i2c
//! device paths on a Raspberry Pi.

//register addresses, bit masks and timing constants
pub mod registers;

//MODE1 / MODE2 change requests
pub mod mode;

//read-modify-write of the mode registers and the prescale sequence
pub mod engine;

//on/off tick writes
pub mod channel;

pub mod device;

//deserializable device configuration
pub mod config;

#[cfg(test)]
mod testing;

pub use channel::FullLevel;
pub use config::{ChannelConfig, Pca9685DeviceConfig};
pub use device::Pca9685;
pub use mode::{Mode1Change, Mode2Change, OutputDrive, OutputNotEnabled};
pub use pca9685_core::{BusChannel, BusLock, HalBus, NoLock, OpenBus, Pca9685Error, SharedBusLock};
