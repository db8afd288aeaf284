//! The radar itself: sweep, sampling, drawing, and the loop tying them together.

pub use crate::radar::canvas::{Blended, Canvas, Rgba};
pub use crate::radar::profile::RadarProfile;
pub use crate::radar::renderer::{FrameSummary, RadarRenderer};
pub use crate::radar::sampler::{DistanceSampler, Measurement, Unit};
pub use crate::radar::scanner::{Scanner, TickReport};
pub use crate::radar::sweep::{normalized, ActuatorCommand, Direction, SweepDriver, SweepState};
pub use crate::radar::trail::TrailBuffer;

mod canvas;
pub mod geometry;
mod profile;
pub mod renderer;
mod sampler;
mod scanner;
mod sweep;
mod trail;
