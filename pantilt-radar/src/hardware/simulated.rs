use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::trace;
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::devices::DistanceSensor;
use crate::errors::Error;
use crate::io::{ControlTransfer, I2cBus, PwmOutput};
use crate::utils::{Range, Scalable};

#[derive(Debug, Default)]
struct SimulatedState {
    pulses: HashMap<u8, u16>,
    registers: HashMap<(u8, u8), u8>,
    control_transfers: usize,
}

/// An in-memory stand-in for every hardware bus the radar talks to.
///
/// All clones share the same state: a servo writing a pulse through one clone is visible from a
/// [`SimulatedSensor`] holding another.
#[derive(Clone, Debug, Default)]
pub struct SimulatedBus {
    state: Arc<RwLock<SimulatedState>>,
}

impl SimulatedBus {
    /// Returns the last pulse width written on `channel` (None if never written or released).
    pub fn get_pulse(&self, channel: u8) -> Option<u16> {
        self.state.read().pulses.get(&channel).copied()
    }

    /// Returns the number of USB control transfers received so far.
    pub fn get_control_transfers(&self) -> usize {
        self.state.read().control_transfers
    }
}

impl Display for SimulatedBus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        write!(
            f,
            "SIMULATED BUS [pulses={}, registers={}]",
            state.pulses.len(),
            state.registers.len()
        )
    }
}

impl PwmOutput for SimulatedBus {
    fn write_pulse(&mut self, channel: u8, pulse_us: u16) -> Result<(), Error> {
        trace!("Simulated PWM: channel {} <- {}us", channel, pulse_us);
        self.state.write().pulses.insert(channel, pulse_us);
        Ok(())
    }

    fn release(&mut self, channel: u8) -> Result<(), Error> {
        trace!("Simulated PWM: channel {} released", channel);
        self.state.write().pulses.remove(&channel);
        Ok(())
    }
}

impl I2cBus for SimulatedBus {
    fn i2c_write(&mut self, address: u8, data: &[u8]) -> Result<(), Error> {
        trace!("Simulated I2C: 0x{:02X} <- {:02X?}", address, data);
        if let Some((register, values)) = data.split_first() {
            let mut state = self.state.write();
            for (offset, value) in values.iter().enumerate() {
                let register = register.wrapping_add(offset as u8);
                state.registers.insert((address, register), *value);
            }
        }
        Ok(())
    }

    fn i2c_read(&mut self, address: u8, register: u8, buffer: &mut [u8]) -> Result<(), Error> {
        let state = self.state.read();
        for (offset, byte) in buffer.iter_mut().enumerate() {
            let register = register.wrapping_add(offset as u8);
            *byte = state
                .registers
                .get(&(address, register))
                .copied()
                .unwrap_or_default();
        }
        Ok(())
    }
}

impl ControlTransfer for SimulatedBus {
    fn control_out(
        &mut self,
        request_type: u8,
        request: u8,
        value: u16,
        index: u16,
        data: &[u8],
    ) -> Result<usize, Error> {
        trace!(
            "Simulated USB: type=0x{:02X} request=0x{:02X} value=0x{:04X} index={} data={:02X?}",
            request_type,
            request,
            value,
            index,
            data
        );
        self.state.write().control_transfers += 1;
        Ok(data.len())
    }
}

/// An object standing in front of the simulated radar.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    /// Bearing of the obstacle center (in degrees, 0-180).
    pub bearing: f64,
    /// Half of the angular width of the obstacle (in degrees).
    pub half_width: f64,
    /// Distance to the sensor (in meters).
    pub distance: f64,
}

/// An ultrasonic sensor simulated on top of a [`SimulatedBus`]: it reads where the sweep servo
/// points and echoes the nearest [`Obstacle`] in that direction.
#[derive(Debug)]
pub struct SimulatedSensor {
    bus: SimulatedBus,
    /// The bus channel of the servo carrying the sensor.
    channel: u8,
    /// The servo PWM range matching the [0, 180] degrees sweep.
    pwm_range: Range<u16>,
    obstacles: Vec<Obstacle>,
    /// Reading returned when nothing echoes back (in meters, default: 1m).
    max_distance: f64,
    /// Amplitude of the uniform measurement noise (in meters, default: 5mm).
    noise: f64,
    rng: StdRng,
}

impl SimulatedSensor {
    /// Creates a sensor mounted on the servo driven by `channel` of the given `bus`.
    pub fn new(bus: &SimulatedBus, channel: u8) -> Self {
        Self {
            bus: bus.clone(),
            channel,
            pwm_range: Range::from([1000, 2000]),
            obstacles: vec![],
            max_distance: 1.0,
            noise: 0.005,
            rng: StdRng::from_entropy(),
        }
    }

    /// Adds an obstacle to the simulated scene.
    pub fn with_obstacle(mut self, bearing: f64, half_width: f64, distance: f64) -> Self {
        self.obstacles.push(Obstacle {
            bearing,
            half_width,
            distance,
        });
        self
    }

    /// Sets the reading returned when nothing echoes back.
    pub fn set_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Sets the measurement noise amplitude (0 for perfect readings).
    pub fn set_noise(mut self, noise: f64) -> Self {
        self.noise = noise.abs();
        self
    }

    /// Makes the noise reproducible.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Sets the servo PWM range matching the [0, 180] degrees sweep (default: [1000, 2000]).
    pub fn set_pwm_range<R: Into<Range<u16>>>(mut self, pwm_range: R) -> Self {
        self.pwm_range = pwm_range.into();
        self
    }

    /// Returns the obstacles of the scene.
    pub fn get_obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Returns the bearing (in degrees) the sensor currently faces, if the servo is powered.
    pub fn get_bearing(&self) -> Option<f64> {
        self.bus.get_pulse(self.channel).map(|pulse| {
            pulse.scale(self.pwm_range, Range::from([0.0, 180.0]))
        })
    }
}

impl DistanceSensor for SimulatedSensor {
    fn read_distance(&mut self) -> Result<f64, Error> {
        let echo = self.get_bearing().and_then(|bearing| {
            self.obstacles
                .iter()
                .filter(|obstacle| (obstacle.bearing - bearing).abs() <= obstacle.half_width)
                .map(|obstacle| obstacle.distance)
                .reduce(f64::min)
        });
        let distance = echo.unwrap_or(self.max_distance);
        let jitter = match self.noise > 0.0 {
            true => self.rng.gen_range(-self.noise..=self.noise),
            false => 0.0,
        };
        Ok((distance + jitter).min(self.max_distance).max(0.0))
    }

    fn get_max_distance(&self) -> f64 {
        self.max_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::PCA9685;

    #[test]
    fn test_simulated_bus_pulses() {
        let mut bus = SimulatedBus::default();
        let observer = bus.clone();
        assert_eq!(observer.get_pulse(14), None);
        bus.write_pulse(14, 1500).unwrap();
        assert_eq!(observer.get_pulse(14), Some(1500));
        bus.release(14).unwrap();
        assert_eq!(observer.get_pulse(14), None);
    }

    #[test]
    fn test_simulated_bus_registers() {
        let bus = SimulatedBus::default();
        let mut pca9685 = PCA9685::default(bus.clone()).unwrap();
        assert_eq!(pca9685.read_from_reg(0xFE).unwrap(), 121);
        pca9685.write_pulse(0, 1500).unwrap();
        assert_eq!(pca9685.read_from_reg(0x08).unwrap(), 0x33);
        assert_eq!(pca9685.read_from_reg(0x09).unwrap(), 0x01);
    }

    #[test]
    fn test_simulated_bus_control_transfer() {
        let mut bus = SimulatedBus::default();
        let written = bus.control_out(0x21, 0x09, 0x0200, 0, &[0x02, 0x20]).unwrap();
        assert_eq!(written, 2);
        assert_eq!(bus.get_control_transfers(), 1);
    }

    #[test]
    fn test_simulated_sensor_echo() {
        let mut bus = SimulatedBus::default();
        let mut sensor = SimulatedSensor::new(&bus, 14)
            .with_obstacle(90.0, 5.0, 0.4)
            .with_obstacle(93.0, 2.0, 0.3)
            .set_noise(0.0);

        // Servo not powered yet: nothing echoes back.
        assert_eq!(sensor.get_bearing(), None);
        assert_eq!(sensor.read_distance().unwrap(), 1.0);

        bus.write_pulse(14, 1500).unwrap();
        assert_eq!(sensor.get_bearing(), Some(90.0));
        assert_eq!(sensor.read_distance().unwrap(), 0.4);

        // Both obstacles are in sight: the nearest echoes.
        bus.write_pulse(14, 1511).unwrap();
        assert_eq!(sensor.read_distance().unwrap(), 0.3);

        bus.write_pulse(14, 1000).unwrap();
        assert_eq!(sensor.read_distance().unwrap(), 1.0);
    }

    #[test]
    fn test_simulated_sensor_edge_of_obstacle() {
        let mut bus = SimulatedBus::default();
        bus.write_pulse(14, 1500).unwrap();
        let mut sensor = SimulatedSensor::new(&bus, 14)
            .with_obstacle(99.0, 9.0, 0.6)
            .set_noise(0.0);
        assert_eq!(sensor.read_distance().unwrap(), 0.6);

        let mut sensor = SimulatedSensor::new(&bus, 14)
            .with_obstacle(99.5, 9.0, 0.6)
            .set_noise(0.0);
        assert_eq!(sensor.read_distance().unwrap(), 1.0);
    }

    #[test]
    fn test_simulated_sensor_odd_max_distance() {
        let mut bus = SimulatedBus::default();
        bus.write_pulse(14, 1000).unwrap();

        let mut sensor = SimulatedSensor::new(&bus, 14).set_max_distance(-1.0);
        assert_eq!(sensor.read_distance().unwrap(), 0.0);

        let mut sensor = SimulatedSensor::new(&bus, 14)
            .with_obstacle(0.0, 5.0, 0.3)
            .set_max_distance(f64::NAN)
            .set_noise(0.0);
        assert_eq!(sensor.read_distance().unwrap(), 0.3);
    }

    #[test]
    fn test_simulated_sensor_noise() {
        let mut bus = SimulatedBus::default();
        bus.write_pulse(3, 1500).unwrap();
        let mut sensor = SimulatedSensor::new(&bus, 3)
            .with_obstacle(90.0, 10.0, 0.5)
            .set_noise(0.01)
            .set_seed(42);
        for _ in 0..50 {
            let distance = sensor.read_distance().unwrap();
            assert!((0.48..=0.52).contains(&distance));
        }
    }
}
