//!Core types shared by the pca9685 crates: the bus channel contract the driver talks through, the lock
//! capability used to share one physical bus between threads, and the error types.
//!
//! The driver itself lives in the `pca9685` crate. A Raspberry Pi implementation of the bus channel lives in
//! `pca9685_rpi`.

pub mod error;

//byte oriented channel to one device on an i2c bus
pub mod bus;

//injected mutual exclusion for buses shared between threads
pub mod lock;

pub use bus::{BusChannel, HalBus, OpenBus};
pub use error::{BuildError, Pca9685Error};
pub use lock::{BusLock, NoLock, SharedBusLock};
