use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::{Error, HardwareError};
use crate::io::PwmOutput;

#[derive(Debug, Default)]
struct MockPwmState {
    pulses: HashMap<u8, u16>,
    released: HashSet<u8>,
    history: Vec<(u8, u16)>,
    closed: bool,
    failing: bool,
}

/// Mock implementation of [`PwmOutput`]: records every pulse written.
///
/// Clones share their records (and failure mode), so a test can keep one while a device owns
/// another.
#[derive(Clone, Debug, Default)]
pub struct MockPwmOutput {
    state: Arc<RwLock<MockPwmState>>,
}

impl MockPwmOutput {
    /// Makes every command fail (simulates an unplugged board), for all clones.
    pub fn set_failing(self, failing: bool) -> Self {
        self.state.write().failing = failing;
        self
    }

    /// Returns the pulse currently emitted on `channel`.
    pub fn get_pulse(&self, channel: u8) -> Option<u16> {
        self.state.read().pulses.get(&channel).copied()
    }

    /// Returns every (channel, pulse) written, oldest first.
    pub fn get_history(&self) -> Vec<(u8, u16)> {
        self.state.read().history.clone()
    }

    /// Forgets the recorded history.
    pub fn clear_history(&self) {
        self.state.write().history.clear();
    }

    /// Checks whether `channel` has been released and not written since.
    pub fn is_released(&self, channel: u8) -> bool {
        self.state.read().released.contains(&channel)
    }

    /// Checks whether the output has been closed.
    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }

    fn check(&self, channel: u8) -> Result<(), Error> {
        match self.state.read().failing {
            true => Err(HardwareError::UnknownChannel {
                channel,
                context: "mock output failure",
            }
            .into()),
            false => Ok(()),
        }
    }
}

impl PwmOutput for MockPwmOutput {
    fn write_pulse(&mut self, channel: u8, pulse_us: u16) -> Result<(), Error> {
        self.check(channel)?;
        let mut state = self.state.write();
        state.pulses.insert(channel, pulse_us);
        state.released.remove(&channel);
        state.history.push((channel, pulse_us));
        Ok(())
    }

    fn release(&mut self, channel: u8) -> Result<(), Error> {
        self.check(channel)?;
        let mut state = self.state.write();
        state.pulses.remove(&channel);
        state.released.insert(channel);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.state.write().closed = true;
        Ok(())
    }
}
