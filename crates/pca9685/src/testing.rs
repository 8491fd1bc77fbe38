//!A bus channel double that emulates the PCA9685 register file and records every transfer.

use std::sync::{Arc, Mutex, MutexGuard};

use pca9685_core::{BusChannel, OpenBus};

use crate::registers::{MODE1, MODE2, PRE_SCALE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    Write(Vec<u8>),
    Read(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

pub const MISSING_BUS: &str = "/dev/i2c-missing";

struct Chip {
    registers: [u8; 256],
    pointer: u8,
    log: Vec<Transfer>,
    writes: usize,
    short_write: Option<usize>,
    fail_write: Option<usize>,
    short_read: bool,
    close_status: Result<(), MockError>,
    address: Option<u8>,
}

///Clones share one emulated chip, like two handles on the same bus.
#[derive(Clone)]
pub struct MockBus {
    chip: Arc<Mutex<Chip>>,
}

impl MockBus {
    ///Power-on register values from the datasheet.
    pub fn new() -> Self {
        let mut registers = [0u8; 256];
        registers[MODE1 as usize] = 0x11;
        registers[MODE2 as usize] = 0x04;
        registers[PRE_SCALE as usize] = 0x1E;
        MockBus {
            chip: Arc::new(Mutex::new(Chip {
                registers,
                pointer: 0,
                log: Vec::new(),
                writes: 0,
                short_write: None,
                fail_write: None,
                short_read: false,
                close_status: Ok(()),
                address: None,
            })),
        }
    }

    fn chip(&self) -> MutexGuard<'_, Chip> {
        self.chip.lock().unwrap()
    }

    pub fn with_register(self, register: u8, value: u8) -> Self {
        self.chip().registers[register as usize] = value;
        self
    }

    ///The `nth` write call (from 0) moves one byte less than asked.
    pub fn short_write_on(self, nth: usize) -> Self {
        self.chip().short_write = Some(nth);
        self
    }

    ///The `nth` write call (from 0) fails outright.
    pub fn fail_write_on(self, nth: usize) -> Self {
        self.chip().fail_write = Some(nth);
        self
    }

    ///Every read moves zero bytes.
    pub fn short_read(self) -> Self {
        self.chip().short_read = true;
        self
    }

    pub fn close_status(self, status: Result<(), MockError>) -> Self {
        self.chip().close_status = status;
        self
    }

    pub fn log(&self) -> Vec<Transfer> {
        self.chip().log.clone()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.chip()
            .log
            .iter()
            .filter_map(|transfer| match transfer {
                Transfer::Write(bytes) => Some(bytes.clone()),
                Transfer::Read(_) => None,
            })
            .collect()
    }

    pub fn register(&self, register: u8) -> u8 {
        self.chip().registers[register as usize]
    }

    pub fn address(&self) -> Option<u8> {
        self.chip().address
    }
}

impl BusChannel for MockBus {
    type Error = MockError;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, MockError> {
        let mut chip = self.chip();
        let index = chip.writes;
        chip.writes += 1;
        chip.log.push(Transfer::Write(bytes.to_vec()));
        if chip.fail_write == Some(index) {
            return Err(MockError);
        }
        let count = if chip.short_write == Some(index) {
            bytes.len() - 1
        } else {
            bytes.len()
        };
        if let Some((register, data)) = bytes[..count].split_first() {
            chip.pointer = *register;
            for byte in data {
                let pointer = chip.pointer;
                chip.registers[pointer as usize] = *byte;
                chip.pointer = pointer.wrapping_add(1);
            }
        }
        Ok(count)
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, MockError> {
        let mut chip = self.chip();
        if chip.short_read {
            chip.log.push(Transfer::Read(Vec::new()));
            return Ok(0);
        }
        for byte in buffer.iter_mut() {
            let pointer = chip.pointer;
            *byte = chip.registers[pointer as usize];
            chip.pointer = pointer.wrapping_add(1);
        }
        chip.log.push(Transfer::Read(buffer.to_vec()));
        Ok(buffer.len())
    }

    fn close(self) -> Result<(), MockError> {
        let status = self.chip().close_status;
        status
    }
}

impl OpenBus for MockBus {
    fn open(path: &str) -> Result<Self, MockError> {
        if path == MISSING_BUS {
            return Err(MockError);
        }
        Ok(MockBus::new())
    }

    fn bind(&mut self, address: u8) -> Result<(), MockError> {
        if address > 0x7F {
            return Err(MockError);
        }
        self.chip().address = Some(address);
        Ok(())
    }
}
