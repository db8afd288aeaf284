//! Defines the devices the radar is built from: servos, the pan-tilt mount, the range finder
//! and the USB launcher riding along.

pub use crate::devices::launcher::{Launcher, LauncherCommand};
pub use crate::devices::pan_tilt::PanTilt;
pub use crate::devices::sensor::DistanceSensor;
pub use crate::devices::servo::Servo;

mod launcher;
mod pan_tilt;
mod sensor;
mod servo;
