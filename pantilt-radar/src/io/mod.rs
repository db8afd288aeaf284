//! Defines the narrow interfaces through which the radar reaches physical hardware.
//!
//! The wire transports themselves (GPIO PWM, I2C, USB) live outside this crate: anything able
//! to implement these traits can drive the radar. See [`crate::hardware`] for the
//! implementations shipped with the crate.

use std::any::type_name;
use std::fmt::Debug;

use dyn_clone::DynClone;

use crate::errors::Error;

// Makes a Box<dyn PwmOutput> clone (a PCA9685 shared between servos).
dyn_clone::clone_trait_object!(PwmOutput);
dyn_clone::clone_trait_object!(I2cBus);
dyn_clone::clone_trait_object!(ControlTransfer);

/// Something able to emit servo pulses on numbered channels: a GPIO pin, a PCA9685 chip...
///
/// Commands are synchronous and assumed applied once the call returns.
pub trait PwmOutput: DynClone + Send + Sync + Debug {
    /// Returns the output name (used for logs only).
    fn get_name(&self) -> &str {
        type_name::<Self>().split("::").last().unwrap_or("PwmOutput")
    }

    /// Sends a pulse of `pulse_us` microseconds every period on the given `channel`.
    fn write_pulse(&mut self, channel: u8, pulse_us: u16) -> Result<(), Error>;

    /// Stops emitting pulses on `channel`: the servo attached goes limp.
    fn release(&mut self, channel: u8) -> Result<(), Error>;

    /// Gracefully shuts down the whole output.
    fn close(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// Raw I2C bus access.
pub trait I2cBus: DynClone + Send + Sync + Debug {
    /// Writes `data` to the I2C device at the specified `address`.
    ///
    /// The first byte is the register, following bytes are written in auto-increment mode.
    fn i2c_write(&mut self, address: u8, data: &[u8]) -> Result<(), Error>;

    /// Reads `buffer.len()` bytes starting at `register` of the I2C device at `address`.
    fn i2c_read(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), Error>;
}

/// USB control endpoint (used by HID toys that take their commands as SET_REPORT requests).
pub trait ControlTransfer: DynClone + Send + Sync + Debug {
    /// Sends a host-to-device control transfer, returns the number of bytes written.
    fn control_out(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<usize, Error>;
}
