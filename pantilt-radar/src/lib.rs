//! <h1 align="center">PANTILT-RADAR - A sonar sweep drawn like a radar screen</h1>
//!
//! A servo swings an ultrasonic range finder back and forth over 180°, a pan-tilt mount follows
//! it, and every reading is drawn on a radar-style screen: range rings, a rotating sweep line,
//! and a fading trail of everything that came closer than the detection threshold.
//!
//! # Getting Started
//!
//! The radar needs:
//! - a [`PwmOutput`](io::PwmOutput) for the sweep servo, and one for the pan-tilt mount
//!   (most-likely a [`PCA9685`](hardware::PCA9685) over an [`I2cBus`](io::I2cBus)),
//! - a [`DistanceSensor`](devices::DistanceSensor),
//! - a [`DisplaySurface`](display::DisplaySurface) the frames are shown on.
//!
//! The crate ships a simulated bus and sensor to run without hardware:
//! ```rust
//! use pantilt_radar::display::NullSurface;
//! use pantilt_radar::hardware::{SimulatedBus, SimulatedSensor, PCA9685};
//! use pantilt_radar::radar::{RadarProfile, Scanner};
//! use pantilt_radar::utils::Shutdown;
//!
//! #[tokio::main]
//! async fn main() {
//!     let profile = RadarProfile::centimeters().set_tick_ms(0);
//!
//!     let bus = SimulatedBus::default();
//!     let pca9685 = PCA9685::default(bus.clone()).unwrap();
//!     let sensor = SimulatedSensor::new(&bus, profile.get_servo_channel())
//!         .with_obstacle(45.0, 10.0, 0.4);
//!
//!     let mut scanner = Scanner::attach(profile, &bus, &pca9685, sensor, NullSurface::default())
//!         .unwrap();
//!     let ticks = scanner.run(&Shutdown::new(), Some(5)).await.unwrap();
//!     assert_eq!(ticks, 5);
//! }
//! ```
//!
//! # Feature flags
//!
//! - **serde** -- Enables serialize/deserialize capabilities for profiles (and JSON profile loading).
//! - **mocks** -- Provides mocked collaborators of all kinds (useful for tests mostly).

pub mod devices;
pub mod display;
pub mod errors;
pub mod hardware;
pub mod io;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod radar;
pub mod utils;
