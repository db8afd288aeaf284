use std::fmt::Debug;

use crate::errors::Error;

/// Represents a range finder (an HC-SR04 ultrasonic sensor most-likely).
///
/// Readings are given in meters: conversion to a display unit is the job of
/// [`crate::radar::DistanceSampler`].
pub trait DistanceSensor: Debug + Send {
    /// Measures the distance (in meters) to the nearest object in front of the sensor.
    ///
    /// Blocks for the duration of the measurement. Never retried: an error is fatal to the
    /// radar loop.
    fn read_distance(&mut self) -> Result<f64, Error>;

    /// Returns the distance (in meters) reported when nothing echoes back.
    fn get_max_distance(&self) -> f64 {
        1.0
    }
}
