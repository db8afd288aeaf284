use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::{Error, HardwareError};
use crate::io::I2cBus;

#[derive(Debug, Default)]
struct MockI2cState {
    registers: HashMap<(u8, u8), u8>,
    writes: Vec<(u8, Vec<u8>)>,
}

/// Mock implementation of [`I2cBus`]: a register file per address, with auto-increment writes.
#[derive(Clone, Debug, Default)]
pub struct MockI2cBus {
    state: Arc<RwLock<MockI2cState>>,
    failing: bool,
}

impl MockI2cBus {
    /// Makes every transfer fail (simulates a missing chip).
    pub fn set_failing(mut self, failing: bool) -> Self {
        self.failing = failing;
        self
    }

    /// Returns the value of a `register` of the device at `address` (0 if never written).
    pub fn get_register(&self, address: u8, register: u8) -> u8 {
        self.state
            .read()
            .registers
            .get(&(address, register))
            .copied()
            .unwrap_or_default()
    }

    /// Returns the last raw write: (address, bytes).
    pub fn last_write(&self) -> Option<(u8, Vec<u8>)> {
        self.state.read().writes.last().cloned()
    }

    /// Returns the number of writes received.
    pub fn count_writes(&self) -> usize {
        self.state.read().writes.len()
    }

    fn check(&self, address: u8) -> Result<(), Error> {
        match self.failing {
            true => Err(HardwareError::I2cTransfer {
                address,
                info: String::from("no acknowledge"),
            }
            .into()),
            false => Ok(()),
        }
    }
}

impl I2cBus for MockI2cBus {
    fn i2c_write(&mut self, address: u8, data: &[u8]) -> Result<(), Error> {
        self.check(address)?;
        let mut state = self.state.write();
        if let Some((register, values)) = data.split_first() {
            for (offset, value) in values.iter().enumerate() {
                state
                    .registers
                    .insert((address, register.wrapping_add(offset as u8)), *value);
            }
        }
        state.writes.push((address, data.to_vec()));
        Ok(())
    }

    fn i2c_read(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), Error> {
        self.check(address)?;
        for (offset, byte) in buffer.iter_mut().enumerate() {
            *byte = self.get_register(address, register.wrapping_add(offset as u8));
        }
        Ok(())
    }
}
