use pca9685_core::{BusChannel, BusLock, NoLock, OpenBus, Pca9685Error};
use tracing::debug;

use crate::{
    channel::{self, FullLevel},
    engine,
    mode::{Mode1Change, Mode2Change},
    registers::{DEFAULT_FREQUENCY_HZ, MODE1, MODE2, PRE_SCALE},
};

///An open PCA9685.
///
/// Owns the bus channel bound to the chip. Every public operation holds `lock` for its whole register sequence,
/// so devices that share a physical bus between threads should be given clones of one
/// [`SharedBusLock`](pca9685_core::SharedBusLock). Dropping the handle releases the channel without reporting
/// its close status, use [`Pca9685::close`] to get it.
pub struct Pca9685<B, L = NoLock> {
    bus: B,
    lock: L,
}

impl<B: OpenBus> Pca9685<B, NoLock> {
    ///Open the bus at `bus_path`, bind `address` and bring the chip up with totem-pole outputs at 50 Hz.
    pub fn open(bus_path: &str, address: u8) -> Result<Self, Pca9685Error<B::Error>> {
        Self::open_locked(bus_path, address, NoLock)
    }
}

impl<B: OpenBus, L: BusLock> Pca9685<B, L> {
    pub fn open_locked(bus_path: &str, address: u8, lock: L) -> Result<Self, Pca9685Error<B::Error>> {
        let mut bus = B::open(bus_path).map_err(|cause| Pca9685Error::Open {
            path: bus_path.to_string(),
            cause,
        })?;
        bus.bind(address)
            .map_err(|cause| Pca9685Error::Address { address, cause })?;
        debug!("opened PCA9685 at {:#04x} on {}", address, bus_path);
        Self::from_channel_locked(bus, lock)
    }
}

impl<B: BusChannel> Pca9685<B, NoLock> {
    ///Bring up a chip on a channel that is already open and bound.
    pub fn from_channel(bus: B) -> Result<Self, Pca9685Error<B::Error>> {
        Self::from_channel_locked(bus, NoLock)
    }
}

impl<B: BusChannel, L: BusLock> Pca9685<B, L> {
    pub fn from_channel_locked(bus: B, lock: L) -> Result<Self, Pca9685Error<B::Error>> {
        let mut device = Pca9685 { bus, lock };
        device.power_on()?;
        Ok(device)
    }

    // reset both mode registers, select totem-pole outputs, then the default frequency
    fn power_on(&mut self) -> Result<(), Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        engine::apply_mode1(&mut self.bus, &Mode1Change::default())?;
        engine::apply_mode2(&mut self.bus, &Mode2Change::default())?;
        engine::apply_mode2(&mut self.bus, &Mode2Change::TOTEM_POLE)?;
        engine::set_frequency(&mut self.bus, DEFAULT_FREQUENCY_HZ)
    }

    pub fn apply_mode1(&mut self, change: &Mode1Change) -> Result<(), Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        engine::apply_mode1(&mut self.bus, change)
    }

    pub fn apply_mode2(&mut self, change: &Mode2Change) -> Result<(), Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        engine::apply_mode2(&mut self.bus, change)
    }

    ///See [`engine::set_frequency`].
    pub fn set_frequency(&mut self, freq: u32) -> Result<(), Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        engine::set_frequency(&mut self.bus, freq)
    }

    ///`on` and `off` are tick positions in 0..=4095 within the PWM period.
    pub fn set_channel(&mut self, channel: u8, on: u16, off: u16) -> Result<(), Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        channel::set_channel(&mut self.bus, channel, on, off)
    }

    pub fn set_all_channels(&mut self, on: u16, off: u16) -> Result<(), Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        channel::set_all_channels(&mut self.bus, on, off)
    }

    pub fn set_channel_full(&mut self, channel: u8, level: FullLevel) -> Result<(), Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        channel::set_channel_full(&mut self.bus, channel, level)
    }

    pub fn set_all_channels_full(&mut self, level: FullLevel) -> Result<(), Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        channel::set_all_channels_full(&mut self.bus, level)
    }

    pub fn read_mode1(&mut self) -> Result<u8, Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        engine::read_register(&mut self.bus, MODE1)
    }

    pub fn read_mode2(&mut self) -> Result<u8, Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        engine::read_register(&mut self.bus, MODE2)
    }

    pub fn read_prescale(&mut self) -> Result<u8, Pca9685Error<B::Error>> {
        let _guard = self.lock.acquire();
        engine::read_register(&mut self.bus, PRE_SCALE)
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn lock(&self) -> &L {
        &self.lock
    }

    ///Release the bus channel and return its close status unchanged.
    pub fn close(self) -> Result<(), B::Error> {
        let Pca9685 { bus, lock } = self;
        let _guard = lock.acquire();
        bus.close()
    }
}
