use std::fmt::{Display, Formatter};

use log::trace;

use crate::devices::DistanceSensor;
use crate::errors::Error;

/// The unit distances are displayed (and thresholds configured) in.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    #[default]
    Centimeters,
    Inches,
}

impl Unit {
    /// Converts a distance in meters into this unit.
    pub fn from_meters(&self, meters: f64) -> f64 {
        match self {
            Unit::Centimeters => meters * 100.0,
            Unit::Inches => meters * 39.37,
        }
    }

    /// Returns the short label printed next to values.
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Centimeters => "cm",
            Unit::Inches => "in",
        }
    }
}

/// A single distance reading, in the configured display unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Full-precision value: used for threshold comparison and geometry.
    pub value: f64,
    pub unit: Unit,
}

impl Measurement {
    /// Creates a measurement of `value` expressed in `unit`.
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Returns the value rounded to 2 decimals (display only).
    pub fn rounded(&self) -> f64 {
        (self.value * 100.0).round() / 100.0
    }

    /// Checks whether the measurement is a detection: at or below the `threshold` (same unit).
    pub fn is_detection(&self, threshold: f64) -> bool {
        self.value <= threshold
    }
}

impl Display for Measurement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.rounded(), self.unit.label())
    }
}

/// Reads the range finder and converts its readings into the display unit.
#[derive(Debug)]
pub struct DistanceSampler {
    sensor: Box<dyn DistanceSensor>,
    unit: Unit,
}

impl DistanceSampler {
    /// Creates a sampler over the given sensor.
    pub fn new<S: DistanceSensor + 'static>(sensor: S, unit: Unit) -> Self {
        Self {
            sensor: Box::new(sensor),
            unit,
        }
    }

    /// Takes one measurement. Sensor failures are returned as is.
    pub fn sample(&mut self) -> Result<Measurement, Error> {
        let meters = self.sensor.read_distance()?;
        let measurement = Measurement::new(self.unit.from_meters(meters), self.unit);
        trace!("Sampled {} ({}m)", measurement, meters);
        Ok(measurement)
    }

    /// Returns the display unit.
    pub fn get_unit(&self) -> Unit {
        self.unit
    }

    /// Returns the sensor maximum range, in the display unit.
    pub fn get_max_range(&self) -> f64 {
        self.unit.from_meters(self.sensor.get_max_distance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockDistanceSensor;

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Unit::Centimeters.from_meters(0.5), 50.0);
        assert!((Unit::Inches.from_meters(0.7) - 27.559).abs() < 1e-9);
        assert_eq!(Unit::Centimeters.label(), "cm");
        assert_eq!(Unit::Inches.label(), "in");
    }

    #[test]
    fn test_measurement_rounding_is_display_only() {
        let measurement = Measurement::new(27.5591, Unit::Inches);
        assert_eq!(measurement.rounded(), 27.56);
        assert_eq!(measurement.value, 27.5591);
        assert_eq!(format!("{}", measurement), "27.56 in");
        // Rounded up display, but still below the threshold at full precision.
        assert!(measurement.is_detection(27.56));
        assert!(!Measurement::new(27.5649, Unit::Inches).is_detection(27.56));
    }

    #[test]
    fn test_detection_is_inclusive() {
        assert!(Measurement::new(70.0, Unit::Centimeters).is_detection(70.0));
        assert!(Measurement::new(69.99, Unit::Centimeters).is_detection(70.0));
        assert!(!Measurement::new(70.01, Unit::Centimeters).is_detection(70.0));
    }

    #[test]
    fn test_sampler() {
        let sensor = MockDistanceSensor::new([0.5, 1.0]);
        let mut sampler = DistanceSampler::new(sensor, Unit::Centimeters);
        assert_eq!(sampler.get_unit(), Unit::Centimeters);
        assert_eq!(sampler.get_max_range(), 100.0);
        assert_eq!(sampler.sample().unwrap(), Measurement::new(50.0, Unit::Centimeters));
        assert_eq!(sampler.sample().unwrap().value, 100.0);
        // Script exhausted: the failure propagates.
        let error = sampler.sample().err().unwrap();
        assert_eq!(error.to_string(), "Sensor error: no echo received.");
    }

    #[test]
    fn test_sampler_inches() {
        let sensor = MockDistanceSensor::new([1.0]);
        let mut sampler = DistanceSampler::new(sensor, Unit::Inches);
        assert_eq!(sampler.sample().unwrap().to_string(), "39.37 in");
    }
}
