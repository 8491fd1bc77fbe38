use pca9685_core::{BusChannel, BusLock, OpenBus, Pca9685Error};
use serde::Deserialize;
use tracing::debug;

use crate::{
    channel::FullLevel,
    device::Pca9685,
    mode::Mode2Change,
    registers::{DEFAULT_ADDRESS, DEFAULT_FREQUENCY_HZ},
};

//system level config -- corresponds to 1 pwm chip instance
#[derive(Debug, Deserialize)]
pub struct Pca9685DeviceConfig {
    #[serde(default = "default_bus")]
    pub bus: String,
    #[serde(default = "default_address")]
    pub i2c_address: u8,
    #[serde(default = "default_frequency")]
    pub frequency_hz: u32,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

//one output on the chip. `full` wins over the on/off ticks when both are given
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    pub channel: u8,
    #[serde(default)]
    pub on: u16,
    #[serde(default)]
    pub off: u16,
    #[serde(default)]
    pub full: Option<FullLevel>,
}

fn default_bus() -> String {
    "/dev/i2c-1".to_string()
}

fn default_address() -> u8 {
    DEFAULT_ADDRESS
}

fn default_frequency() -> u32 {
    DEFAULT_FREQUENCY_HZ
}

impl Pca9685DeviceConfig {
    ///Open the configured chip and apply the configuration to it.
    pub fn open<B, L>(&self, lock: L) -> Result<Pca9685<B, L>, Pca9685Error<B::Error>>
    where
        B: OpenBus,
        L: BusLock,
    {
        let mut device = Pca9685::open_locked(&self.bus, self.i2c_address, lock)?;
        self.apply(&mut device)?;
        Ok(device)
    }

    ///Apply frequency, output inversion and channel settings to an already open chip.
    pub fn apply<B, L>(&self, device: &mut Pca9685<B, L>) -> Result<(), Pca9685Error<B::Error>>
    where
        B: BusChannel,
        L: BusLock,
    {
        // open already programmed the default
        if self.frequency_hz != DEFAULT_FREQUENCY_HZ {
            device.set_frequency(self.frequency_hz)?;
        }
        if self.invert {
            device.apply_mode2(&Mode2Change {
                invert: true,
                ..Default::default()
            })?;
        }
        for ch in &self.channels {
            match ch.full {
                Some(level) => device.set_channel_full(ch.channel, level)?,
                None => device.set_channel(ch.channel, ch.on, ch.off)?,
            }
        }
        debug!(
            "configured PCA9685 {:#04x} on {} with {} channels",
            self.i2c_address,
            self.bus,
            self.channels.len()
        );
        Ok(())
    }
}
