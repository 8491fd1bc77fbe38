//!PCA9685 register map and the fixed constants of its PWM timing.
//!
//! Datasheet: https://www.nxp.com/docs/en/data-sheet/PCA9685.pdf

pub const MODE1: u8 = 0x00;
pub const MODE2: u8 = 0x01;
pub const SUBADR1: u8 = 0x02;
pub const SUBADR2: u8 = 0x03;
pub const SUBADR3: u8 = 0x04;
pub const ALLCALLADR: u8 = 0x05;
///First of the four registers of channel 0. Channel `n` starts at `LED0_ON_L + 4 * n`.
pub const LED0_ON_L: u8 = 0x06;
pub const LED15_OFF_H: u8 = 0x45;
pub const ALL_LED_ON_L: u8 = 0xFA;
pub const ALL_LED_ON_H: u8 = 0xFB;
pub const ALL_LED_OFF_L: u8 = 0xFC;
pub const ALL_LED_OFF_H: u8 = 0xFD;
pub const PRE_SCALE: u8 = 0xFE;
///Never written by this driver.
pub const TESTMODE: u8 = 0xFF;

pub const REGISTERS_PER_CHANNEL: u8 = 4;
pub const CHANNEL_COUNT: u8 = 16;

///MODE1 bits
pub mod mode1 {
    ///respond to the LED All Call address
    pub const ALLCALL: u8 = 0x01;
    pub const SUB3: u8 = 0x02;
    pub const SUB2: u8 = 0x04;
    pub const SUB1: u8 = 0x08;
    ///oscillator off
    pub const SLEEP: u8 = 0x10;
    ///register auto-increment
    pub const AI: u8 = 0x20;
    ///use the EXTCLK pin clock
    pub const EXTCLK: u8 = 0x40;
    pub const RESTART: u8 = 0x80;
}

///MODE2 bits
pub mod mode2 {
    ///output-not-enabled field, what LEDn do while /OE is high
    pub const OUTNE: u8 = 0x03;
    ///1 = totem-pole, 0 = open-drain
    pub const OUTDRV: u8 = 0x04;
    ///outputs change on ACK instead of STOP
    pub const OCH: u8 = 0x08;
    pub const INVRT: u8 = 0x10;
}

///Internal oscillator frequency.
pub const OSCILLATOR_HZ: u32 = 25_000_000;
///Ticks in one PWM period.
pub const PWM_PERIOD_TICKS: u32 = 4096;
///Largest on/off tick value.
pub const MAX_TICKS: u16 = 4095;
///Bit 4 of LEDn_ON_H / LEDn_OFF_H forces the output fully on / fully off.
pub const FULL_BIT: u8 = 0x10;

pub const PRESCALE_MIN: u8 = 3;
pub const PRESCALE_MAX: u8 = 255;

pub const DEFAULT_ADDRESS: u8 = 0x40;
pub const DEFAULT_FREQUENCY_HZ: u32 = 50;

///Address of the LEDn_ON_L register of `channel`.
///
/// No range check is done here: a channel above 15 lands on other registers. Callers validate first.
pub const fn channel_on_l(channel: u8) -> u8 {
    LED0_ON_L.wrapping_add(REGISTERS_PER_CHANNEL.wrapping_mul(channel))
}

///PRE_SCALE value for a PWM frequency: `floor(25MHz / 4096 / freq) - 1`, truncated to 8 bits.
///
/// Frequencies that need a prescale outside 3..=255 wrap or saturate silently. `None` for 0 Hz.
pub const fn prescale(freq: u32) -> Option<u8> {
    if freq == 0 {
        return None;
    }
    Some((OSCILLATOR_HZ / PWM_PERIOD_TICKS / freq).wrapping_sub(1) as u8)
}
