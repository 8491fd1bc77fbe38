//!Register configuration: read-modify-write of MODE1/MODE2 and the sleep / prescale / wake sequence.
//!
//! These functions work on a bare bus channel and take no lock. [`crate::Pca9685`] holds its lock around them.

use pca9685_core::{BusChannel, Pca9685Error};
use tracing::{debug, trace, warn};

use crate::{
    mode::{Mode1Change, Mode2Change},
    registers::{self, MODE1, MODE2, PRESCALE_MAX, PRESCALE_MIN, PRE_SCALE},
};

///Write `bytes` (register address first) in one transaction and check every byte went out.
pub fn write_exact<B: BusChannel>(bus: &mut B, bytes: &[u8]) -> Result<(), Pca9685Error<B::Error>> {
    let actual = bus.write(bytes)?;
    if actual != bytes.len() {
        return Err(Pca9685Error::ShortTransfer {
            register: bytes.first().copied().unwrap_or_default(),
            expected: bytes.len(),
            actual,
        });
    }
    Ok(())
}

///Select `register` and read its value back.
pub fn read_register<B: BusChannel>(bus: &mut B, register: u8) -> Result<u8, Pca9685Error<B::Error>> {
    write_exact(bus, &[register])?;
    let mut buffer = [0u8; 1];
    let actual = bus.read(&mut buffer)?;
    if actual != buffer.len() {
        return Err(Pca9685Error::ShortTransfer {
            register,
            expected: buffer.len(),
            actual,
        });
    }
    Ok(buffer[0])
}

fn update_register<B: BusChannel>(
    bus: &mut B,
    register: u8,
    update: impl FnOnce(u8) -> u8,
) -> Result<(), Pca9685Error<B::Error>> {
    let current = read_register(bus, register)?;
    let value = update(current);
    trace!("register {:#04x}: {:#010b} -> {:#010b}", register, current, value);
    write_exact(bus, &[register, value])
}

///Apply `change` to MODE1. An empty change writes 0 to MODE1 without reading it first.
pub fn apply_mode1<B: BusChannel>(bus: &mut B, change: &Mode1Change) -> Result<(), Pca9685Error<B::Error>> {
    if change.is_empty() {
        debug!("resetting MODE1");
        return write_exact(bus, &[MODE1, 0]);
    }
    update_register(bus, MODE1, |current| change.apply(current))
}

///Apply `change` to MODE2. An empty change writes 0 to MODE2 without reading it first.
pub fn apply_mode2<B: BusChannel>(bus: &mut B, change: &Mode2Change) -> Result<(), Pca9685Error<B::Error>> {
    if change.is_empty() {
        debug!("resetting MODE2");
        return write_exact(bus, &[MODE2, 0]);
    }
    if change.change_on_ack {
        trace!("MODE2 output change on ACK requested, ignored");
    }
    update_register(bus, MODE2, |current| change.apply(current))
}

///Program the PWM frequency.
///
/// The prescaler only takes writes while the oscillator is stopped, so this sleeps the chip, writes PRE_SCALE,
/// wakes it, then sets totem-pole outputs with high impedance while /OE is high. A failure part way through is
/// not rolled back and may leave the chip asleep.
pub fn set_frequency<B: BusChannel>(bus: &mut B, freq: u32) -> Result<(), Pca9685Error<B::Error>> {
    let Some(prescale) = registers::prescale(freq) else {
        return Err(Pca9685Error::InvalidFrequency(freq));
    };
    let raw = registers::OSCILLATOR_HZ / registers::PWM_PERIOD_TICKS / freq;
    if raw < PRESCALE_MIN as u32 + 1 || raw > PRESCALE_MAX as u32 + 1 {
        warn!(
            "{} Hz is outside of the PCA9685 range, prescale {} will be written",
            freq, prescale
        );
    }
    debug!("setting PCA9685 frequency to {} Hz (prescale {})", freq, prescale);

    apply_mode1(bus, &Mode1Change::SLEEP_FOR_PRESCALE)?;
    write_exact(bus, &[PRE_SCALE, prescale])?;
    apply_mode1(bus, &Mode1Change::WAKE)?;
    apply_mode2(bus, &Mode2Change::TOTEM_POLE_HIGH_Z)
}
