use std::collections::VecDeque;

use crate::devices::DistanceSensor;
use crate::errors::Error;

/// Mock implementation of [`DistanceSensor`]: replays a scripted list of readings (in meters).
///
/// Once the script is exhausted, every read fails like an unplugged sensor would.
#[derive(Clone, Debug, Default)]
pub struct MockDistanceSensor {
    readings: VecDeque<f64>,
    reads: usize,
}

impl MockDistanceSensor {
    /// Creates a sensor replaying the given readings (in meters).
    pub fn new<I: IntoIterator<Item = f64>>(readings: I) -> Self {
        Self {
            readings: readings.into_iter().collect(),
            reads: 0,
        }
    }

    /// Creates a sensor replaying the given readings given in centimeters.
    pub fn from_centimeters<I: IntoIterator<Item = f64>>(readings: I) -> Self {
        Self::new(readings.into_iter().map(|cm| cm / 100.0))
    }

    /// Returns the number of successful reads.
    pub fn count_reads(&self) -> usize {
        self.reads
    }
}

impl DistanceSensor for MockDistanceSensor {
    fn read_distance(&mut self) -> Result<f64, Error> {
        let reading = self.readings.pop_front().ok_or(Error::SensorError {
            info: String::from("no echo received"),
        })?;
        self.reads += 1;
        Ok(reading)
    }
}
