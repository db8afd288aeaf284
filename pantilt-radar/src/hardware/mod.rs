//! Defines the pieces of hardware shipped with the crate: the PCA9685 PWM driver and a simulated
//! bus used to run the radar without any hardware attached.

mod pca9685;
mod simulated;

pub use pca9685::PCA9685;
pub use simulated::{Obstacle, SimulatedBus, SimulatedSensor};
