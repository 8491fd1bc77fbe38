//!Requested changes to the MODE1 and MODE2 registers.
//!
//! A change names only the flags the caller wants to move. Everything else in the register is read back from the
//! chip and written again unchanged. The packed request words used on the wire by older PCA9685 tooling convert
//! to and from these types with `from_bits` / `bits`.

use crate::registers::{mode1, mode2};

///Packed MODE1 request word, two bits (on, off) per flag.
pub mod mode1_request {
    pub const ALLCALL_ON: u16 = 0x0001;
    pub const ALLCALL_OFF: u16 = 0x0002;
    pub const SUB3_ON: u16 = 0x0004;
    pub const SUB3_OFF: u16 = 0x0008;
    pub const SUB2_ON: u16 = 0x0010;
    pub const SUB2_OFF: u16 = 0x0020;
    pub const SUB1_ON: u16 = 0x0040;
    pub const SUB1_OFF: u16 = 0x0080;
    pub const SLEEP_ON: u16 = 0x0100;
    pub const SLEEP_OFF: u16 = 0x0200;
    pub const AI_ON: u16 = 0x0400;
    pub const AI_OFF: u16 = 0x0800;
    pub const EXTCLK_ON: u16 = 0x1000;
    pub const EXTCLK_OFF: u16 = 0x2000;
    pub const RESTART_ON: u16 = 0x4000;
    pub const RESTART_OFF: u16 = 0x8000;
}

///Packed MODE2 request byte.
pub mod mode2_request {
    pub const OUTNE_0: u8 = 0x00;
    pub const OUTNE_DRV: u8 = 0x01;
    pub const OUTNE_HZ: u8 = 0x02;
    ///both OUTNE bits set selects no OUTNE change
    pub const OUTNE: u8 = 0x03;
    ///request open-drain outputs
    pub const OUT_HZ: u8 = 0x04;
    pub const OCH: u8 = 0x08;
    pub const INVRT: u8 = 0x10;
    ///request totem-pole outputs
    pub const OUT_TP: u8 = 0x20;
}

///Flags to set (`Some(true)`), clear (`Some(false)`) or leave alone (`None`) in MODE1.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Mode1Change {
    pub all_call: Option<bool>,
    pub sub1: Option<bool>,
    pub sub2: Option<bool>,
    pub sub3: Option<bool>,
    pub sleep: Option<bool>,
    pub auto_increment: Option<bool>,
    pub ext_clk: Option<bool>,
    ///Assert RESTART. There is no way to clear it: the chip clears the bit itself once restarted.
    pub restart: bool,
}

impl Mode1Change {
    ///Oscillator off, ALLCALL off, auto-increment on. The chip must be in this state to take a new prescale.
    pub const SLEEP_FOR_PRESCALE: Mode1Change = Mode1Change {
        all_call: Some(false),
        sub1: None,
        sub2: None,
        sub3: None,
        sleep: Some(true),
        auto_increment: Some(true),
        ext_clk: None,
        restart: false,
    };

    pub const WAKE: Mode1Change = Mode1Change {
        all_call: None,
        sub1: None,
        sub2: None,
        sub3: None,
        sleep: Some(false),
        auto_increment: None,
        ext_clk: None,
        restart: false,
    };

    ///An empty change resets MODE1 instead of updating it.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    // (register bit, request) in packed slot order
    fn slots(&self) -> [(u8, Option<bool>); 7] {
        [
            (mode1::ALLCALL, self.all_call),
            (mode1::SUB3, self.sub3),
            (mode1::SUB2, self.sub2),
            (mode1::SUB1, self.sub1),
            (mode1::SLEEP, self.sleep),
            (mode1::AI, self.auto_increment),
            (mode1::EXTCLK, self.ext_clk),
        ]
    }

    ///Register bits this change may write.
    pub fn affected_bits(&self) -> u8 {
        let mut bits = self
            .slots()
            .iter()
            .filter(|(_, state)| state.is_some())
            .fold(0u8, |acc, (bit, _)| acc | *bit);
        if self.restart {
            bits |= mode1::RESTART;
        }
        bits
    }

    ///New MODE1 value given the value currently in the register.
    pub fn apply(&self, current: u8) -> u8 {
        let mut value = current;
        for (bit, state) in self.slots() {
            match state {
                Some(true) => value |= bit,
                Some(false) => value &= !bit,
                None => {}
            }
        }
        if self.restart {
            value |= mode1::RESTART;
        }
        value
    }

    ///Decode a packed request word. If both halves of a slot are set the off half wins, and both halves of the
    /// RESTART slot mean "assert RESTART".
    pub fn from_bits(bits: u16) -> Self {
        let slot = |on: u16, off: u16| {
            if bits & off != 0 {
                Some(false)
            } else if bits & on != 0 {
                Some(true)
            } else {
                None
            }
        };
        use mode1_request::*;
        Mode1Change {
            all_call: slot(ALLCALL_ON, ALLCALL_OFF),
            sub3: slot(SUB3_ON, SUB3_OFF),
            sub2: slot(SUB2_ON, SUB2_OFF),
            sub1: slot(SUB1_ON, SUB1_OFF),
            sleep: slot(SLEEP_ON, SLEEP_OFF),
            auto_increment: slot(AI_ON, AI_OFF),
            ext_clk: slot(EXTCLK_ON, EXTCLK_OFF),
            restart: bits & (RESTART_ON | RESTART_OFF) != 0,
        }
    }

    ///Encode as a packed request word.
    pub fn bits(&self) -> u16 {
        let mut bits = 0;
        for (i, (_, state)) in self.slots().iter().enumerate() {
            match state {
                Some(true) => bits |= 1u16 << (2 * i),
                Some(false) => bits |= 1u16 << (2 * i + 1),
                None => {}
            }
        }
        if self.restart {
            bits |= mode1_request::RESTART_ON;
        }
        bits
    }
}

///What the outputs do while the /OE pin is high (MODE2 OUTNE field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputNotEnabled {
    Low,
    ///driven high with totem-pole outputs, high impedance with open-drain
    High,
    HighImpedance,
}

impl OutputNotEnabled {
    pub fn bits(self) -> u8 {
        match self {
            Self::Low => 0b00,
            Self::High => 0b01,
            Self::HighImpedance => 0b10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDrive {
    TotemPole,
    OpenDrain,
}

///Changes to MODE2. `invert` can only set INVRT, never clear it. `change_on_ack` is accepted and ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Mode2Change {
    pub output_not_enabled: Option<OutputNotEnabled>,
    pub output_drive: Option<OutputDrive>,
    pub invert: bool,
    pub change_on_ack: bool,
    // nonzero request that names nothing: read and write back unchanged
    pub(crate) unchanged: bool,
}

impl Mode2Change {
    ///Rewrites MODE2 with its current value.
    pub const UNCHANGED: Mode2Change = Mode2Change {
        output_not_enabled: None,
        output_drive: None,
        invert: false,
        change_on_ack: false,
        unchanged: true,
    };

    pub const TOTEM_POLE: Mode2Change = Mode2Change {
        output_not_enabled: Some(OutputNotEnabled::Low),
        output_drive: Some(OutputDrive::TotemPole),
        invert: false,
        change_on_ack: false,
        unchanged: false,
    };

    pub const TOTEM_POLE_HIGH_Z: Mode2Change = Mode2Change {
        output_not_enabled: Some(OutputNotEnabled::HighImpedance),
        output_drive: Some(OutputDrive::TotemPole),
        invert: false,
        change_on_ack: false,
        unchanged: false,
    };

    ///An empty change resets MODE2 instead of updating it.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn affected_bits(&self) -> u8 {
        let mut bits = 0;
        if self.output_not_enabled.is_some() {
            bits |= mode2::OUTNE;
        }
        if self.output_drive.is_some() {
            bits |= mode2::OUTDRV;
        }
        if self.invert {
            bits |= mode2::INVRT;
        }
        bits
    }

    ///New MODE2 value given the value currently in the register.
    pub fn apply(&self, current: u8) -> u8 {
        let mut value = current;
        if let Some(outne) = self.output_not_enabled {
            value = (value & !mode2::OUTNE) | outne.bits();
        }
        match self.output_drive {
            Some(OutputDrive::TotemPole) => value |= mode2::OUTDRV,
            Some(OutputDrive::OpenDrain) => value &= !mode2::OUTDRV,
            None => {}
        }
        if self.invert {
            value |= mode2::INVRT;
        }
        value
    }

    ///Decode a packed request byte. Zero is the empty (reset) request. Otherwise OUTNE bits of 0b11 leave the
    /// field alone, and OUT_TP wins over OUT_HZ. A nonzero byte that names no change decodes to
    /// [`Mode2Change::UNCHANGED`], never to the reset.
    pub fn from_bits(bits: u8) -> Self {
        use mode2_request::*;
        if bits == 0 {
            return Self::default();
        }
        let output_not_enabled = match bits & OUTNE {
            OUTNE_0 => Some(OutputNotEnabled::Low),
            OUTNE_DRV => Some(OutputNotEnabled::High),
            OUTNE_HZ => Some(OutputNotEnabled::HighImpedance),
            _ => None,
        };
        let output_drive = if bits & OUT_TP != 0 {
            Some(OutputDrive::TotemPole)
        } else if bits & OUT_HZ != 0 {
            Some(OutputDrive::OpenDrain)
        } else {
            None
        };
        let invert = bits & INVRT != 0;
        let change_on_ack = bits & OCH != 0;
        Mode2Change {
            output_not_enabled,
            output_drive,
            invert,
            change_on_ack,
            unchanged: output_not_enabled.is_none() && output_drive.is_none() && !invert && !change_on_ack,
        }
    }

    ///Encode as a packed request byte.
    pub fn bits(&self) -> u8 {
        use mode2_request::*;
        if self.is_empty() {
            return 0;
        }
        let mut bits = match self.output_not_enabled {
            Some(outne) => outne.bits(),
            None => OUTNE,
        };
        match self.output_drive {
            Some(OutputDrive::TotemPole) => bits |= OUT_TP,
            Some(OutputDrive::OpenDrain) => bits |= OUT_HZ,
            None => {}
        }
        if self.invert {
            bits |= INVRT;
        }
        if self.change_on_ack {
            bits |= OCH;
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::mode1_request::*;
    use super::mode2_request::*;
    use super::*;

    fn all_mode1_requests() -> impl Iterator<Item = Mode1Change> {
        let states = [None, Some(true), Some(false)];
        (0..3u32.pow(7) * 2).map(move |mut n| {
            let restart = n % 2 == 1;
            n /= 2;
            let mut next = || {
                let state = states[(n % 3) as usize];
                n /= 3;
                state
            };
            Mode1Change {
                all_call: next(),
                sub1: next(),
                sub2: next(),
                sub3: next(),
                sleep: next(),
                auto_increment: next(),
                ext_clk: next(),
                restart,
            }
        })
    }

    #[test]
    fn mode1_apply_only_touches_requested_bits() {
        for change in all_mode1_requests() {
            let affected = change.affected_bits();
            let requested = change.apply(0) & affected;
            for current in 0..=u8::MAX {
                assert_eq!(
                    change.apply(current),
                    (current & !affected) | requested,
                    "change {:?} on {:#010b}",
                    change,
                    current
                );
            }
        }
    }

    #[test]
    fn sleep_for_prescale_keeps_other_bits() {
        // RESTART | SUB1 | ALLCALL
        let value = Mode1Change::SLEEP_FOR_PRESCALE.apply(0b1000_1001);
        assert_eq!(value, 0b1011_1000);
        assert_eq!(Mode1Change::WAKE.apply(value), 0b1010_1000);
    }

    #[test]
    fn restart_off_still_asserts_restart() {
        let change = Mode1Change::from_bits(RESTART_OFF);
        assert!(change.restart);
        assert_eq!(change.apply(0x00), 0x80);
        assert_eq!(change.apply(0x80), 0x80);
    }

    #[test]
    fn ext_clk_uses_its_own_bit() {
        let change = Mode1Change::from_bits(EXTCLK_ON);
        assert_eq!(change.apply(0x00), 0x40);
        assert_eq!(Mode1Change::from_bits(SUB2_ON).apply(0x00), 0x04);
    }

    #[test]
    fn mode1_off_half_wins_when_both_set() {
        let change = Mode1Change::from_bits(SLEEP_ON | SLEEP_OFF);
        assert_eq!(change.sleep, Some(false));
    }

    #[test]
    fn mode1_bits_decode_to_named_flags() {
        let change = Mode1Change::from_bits(SLEEP_ON | ALLCALL_OFF | AI_ON);
        assert_eq!(change, Mode1Change::SLEEP_FOR_PRESCALE);
        assert_eq!(Mode1Change::SLEEP_FOR_PRESCALE.bits(), SLEEP_ON | ALLCALL_OFF | AI_ON);
        assert_eq!(Mode1Change::WAKE.bits(), SLEEP_OFF);
        assert!(Mode1Change::from_bits(0).is_empty());
    }

    #[test]
    fn mode2_apply_only_touches_requested_bits() {
        let outnes = [
            None,
            Some(OutputNotEnabled::Low),
            Some(OutputNotEnabled::High),
            Some(OutputNotEnabled::HighImpedance),
        ];
        let drives = [None, Some(OutputDrive::TotemPole), Some(OutputDrive::OpenDrain)];
        for output_not_enabled in outnes {
            for output_drive in drives {
                for invert in [false, true] {
                    let change = Mode2Change {
                        output_not_enabled,
                        output_drive,
                        invert,
                        ..Default::default()
                    };
                    let affected = change.affected_bits();
                    let requested = change.apply(0) & affected;
                    for current in 0..=u8::MAX {
                        let expected = (current & !affected) | requested;
                        // INVRT is set-only, a set bit stays set
                        let expected = expected | (current & mode2::INVRT);
                        assert_eq!(change.apply(current), expected, "change {:?}", change);
                    }
                }
            }
        }
    }

    #[test]
    fn totem_pole_request_sets_outdrv() {
        let change = Mode2Change::from_bits(OUT_TP);
        assert_eq!(change, Mode2Change::TOTEM_POLE);
        assert_eq!(change.apply(0x00), 0x04);
        // OUTNE field cleared, OCH and INVRT untouched
        assert_eq!(change.apply(0x1B), 0x1C);
    }

    #[test]
    fn open_drain_request_clears_outdrv() {
        let change = Mode2Change::from_bits(OUT_HZ | OUTNE);
        assert_eq!(change.output_drive, Some(OutputDrive::OpenDrain));
        assert_eq!(change.output_not_enabled, None);
        assert_eq!(change.apply(0x07), 0x03);
    }

    #[test]
    fn totem_pole_wins_over_open_drain() {
        let change = Mode2Change::from_bits(OUT_HZ | OUT_TP);
        assert_eq!(change.output_drive, Some(OutputDrive::TotemPole));
    }

    #[test]
    fn frequency_mode2_request_is_totem_pole_high_z() {
        let change = Mode2Change::from_bits(OUT_TP | OUTNE_HZ);
        assert_eq!(change, Mode2Change::TOTEM_POLE_HIGH_Z);
        assert_eq!(change.apply(0x00), 0x06);
        assert_eq!(change.bits(), OUT_TP | OUTNE_HZ);
    }

    #[test]
    fn invert_is_set_only() {
        let change = Mode2Change::from_bits(INVRT | OUTNE);
        assert_eq!(change.apply(0x00), 0x10);
        assert_eq!(change.apply(0x10), 0x10);
        assert_eq!(Mode2Change::from_bits(OUTNE).apply(0x10), 0x10);
    }

    #[test]
    fn change_on_ack_has_no_effect() {
        let change = Mode2Change::from_bits(OCH | OUTNE);
        assert!(change.change_on_ack);
        assert_eq!(change.apply(0x00), 0x00);
        assert_eq!(change.apply(0x08), 0x08);
        assert_eq!(change.bits(), OCH | OUTNE);
    }

    #[test]
    fn nonzero_request_naming_nothing_is_not_a_reset() {
        for bits in [OUTNE, OUTNE | 0x40, OUTNE | 0x80] {
            let change = Mode2Change::from_bits(bits);
            assert_eq!(change, Mode2Change::UNCHANGED);
            assert!(!change.is_empty());
            assert_eq!(change.apply(0x14), 0x14);
        }
        assert_eq!(Mode2Change::UNCHANGED.bits(), OUTNE);
    }

    #[test]
    fn empty_mode2_request_is_zero() {
        assert!(Mode2Change::from_bits(0).is_empty());
        assert_eq!(Mode2Change::default().bits(), 0);
        assert_eq!(OUTNE_0, 0);
        assert_eq!(OUTNE_DRV, OutputNotEnabled::High.bits());
    }
}
