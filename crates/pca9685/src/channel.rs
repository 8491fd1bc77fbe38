use pca9685_core::{BusChannel, Pca9685Error};
use serde::Deserialize;
use tracing::trace;

use crate::{
    engine::write_exact,
    registers::{channel_on_l, ALL_LED_ON_L, CHANNEL_COUNT, FULL_BIT, MAX_TICKS},
};

///Force an output fully on or fully off, ignoring its on/off ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FullLevel {
    On,
    Off,
}

///The 5 byte transaction for one channel's (or the ALL_LED) register block: register address, then the on and off
/// ticks, low byte first.
pub fn pwm_frame(register: u8, on: u16, off: u16) -> [u8; 5] {
    [
        register,
        (on & 0xFF) as u8,
        (on >> 8) as u8,
        (off & 0xFF) as u8,
        (off >> 8) as u8,
    ]
}

fn check_channel<E>(channel: u8) -> Result<(), Pca9685Error<E>> {
    if channel >= CHANNEL_COUNT {
        return Err(Pca9685Error::InvalidChannel(channel));
    }
    Ok(())
}

fn check_ticks<E>(on: u16, off: u16) -> Result<(), Pca9685Error<E>> {
    for ticks in [on, off] {
        if ticks > MAX_TICKS {
            return Err(Pca9685Error::InvalidTicks(ticks));
        }
    }
    Ok(())
}

///Set the rising (`on`) and falling (`off`) edge of `channel` within the 4096 tick period.
pub fn set_channel<B: BusChannel>(bus: &mut B, channel: u8, on: u16, off: u16) -> Result<(), Pca9685Error<B::Error>> {
    check_channel(channel)?;
    check_ticks(on, off)?;
    trace!("channel {} on {} off {}", channel, on, off);
    write_exact(bus, &pwm_frame(channel_on_l(channel), on, off))
}

///Set the same edges on all 16 channels in one transaction.
pub fn set_all_channels<B: BusChannel>(bus: &mut B, on: u16, off: u16) -> Result<(), Pca9685Error<B::Error>> {
    check_ticks(on, off)?;
    trace!("all channels on {} off {}", on, off);
    write_exact(bus, &pwm_frame(ALL_LED_ON_L, on, off))
}

pub fn set_channel_full<B: BusChannel>(bus: &mut B, channel: u8, level: FullLevel) -> Result<(), Pca9685Error<B::Error>> {
    check_channel(channel)?;
    let register = channel_on_l(channel);
    let frame = match level {
        FullLevel::On => [register, 0x00, FULL_BIT, 0x00, 0x00],
        FullLevel::Off => [register, 0x00, 0x00, 0x00, FULL_BIT],
    };
    trace!("channel {} full {:?}", channel, level);
    write_exact(bus, &frame)
}

///Force all 16 outputs fully on or fully off in one transaction.
pub fn set_all_channels_full<B: BusChannel>(bus: &mut B, level: FullLevel) -> Result<(), Pca9685Error<B::Error>> {
    let frame = match level {
        FullLevel::On => [ALL_LED_ON_L, 0x00, FULL_BIT, 0x00, 0x00],
        FullLevel::Off => [ALL_LED_ON_L, 0x00, 0x00, 0x00, FULL_BIT],
    };
    trace!("all channels full {:?}", level);
    write_exact(bus, &frame)
}
