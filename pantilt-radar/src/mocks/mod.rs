//! Recording stand-ins for every hardware collaborator (available to tests and behind the
//! `mocks` feature).

mod control_transfer;
mod display;
mod i2c_bus;
mod pwm_output;
mod sensor;

pub use control_transfer::{MockControlTransfer, Transfer};
pub use display::MockDisplay;
pub use i2c_bus::MockI2cBus;
pub use pwm_output::MockPwmOutput;
pub use sensor::MockDistanceSensor;
