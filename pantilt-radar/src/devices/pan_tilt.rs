use std::fmt::{Display, Formatter};

use log::{debug, warn};

use crate::devices::Servo;
use crate::errors::Error;
use crate::io::PwmOutput;
use crate::utils::Range;

/// A two-axis mount (pan-tilt HAT): two servos on the channels of the same PWM output.
#[derive(Clone, Debug)]
pub struct PanTilt {
    /// The horizontal (left/right) servo.
    pan: Servo,
    /// The vertical (up/down) servo.
    tilt: Servo,
    /// The pulse width (in µs) both servos are recentered to.
    center: u16,
}

impl PanTilt {
    /// Creates a pan-tilt mount on the given channels and centers it (1500µs).
    ///
    /// ```
    /// use pantilt_radar::devices::PanTilt;
    /// use pantilt_radar::hardware::{SimulatedBus, PCA9685};
    ///
    /// let pca9685 = PCA9685::default(SimulatedBus::default()).unwrap();
    /// let mut pan_tilt = PanTilt::new(&pca9685, 0, 1).unwrap();
    /// pan_tilt.set_pulses(1500, 1000).unwrap();
    /// assert_eq!(pan_tilt.get_pulses(), (1500, 1000));
    /// ```
    pub fn new(
        output: &(dyn PwmOutput + 'static),
        pan_channel: u8,
        tilt_channel: u8,
    ) -> Result<Self, Error> {
        let center = 1500;
        Ok(Self {
            pan: Servo::new(output, pan_channel, center)?,
            tilt: Servo::new(output, tilt_channel, center)?,
            center,
        })
    }

    /// Commands both axes by pulse width (in µs). Tilt is written first.
    pub fn set_pulses(&mut self, pan_us: u16, tilt_us: u16) -> Result<&Self, Error> {
        self.tilt.set_pulse(tilt_us)?;
        self.pan.set_pulse(pan_us)?;
        Ok(self)
    }

    /// Commands both axes by normalized value in [-1, 1].
    pub fn set_values(&mut self, pan: f64, tilt: f64) -> Result<&Self, Error> {
        self.tilt.set_value(tilt)?;
        self.pan.set_value(pan)?;
        Ok(self)
    }

    /// Moves both axes back to center.
    pub fn recenter(&mut self) -> Result<&Self, Error> {
        debug!("Recentering {}", self);
        self.set_pulses(self.center, self.center)
    }

    /// Recenters the mount then shuts down the underlying PWM output.
    ///
    /// The output is closed even when recentering fails: the first error is returned.
    pub fn close(&mut self) -> Result<(), Error> {
        let recentered = self.recenter().map(|_| ());
        if let Err(error) = &recentered {
            warn!("Unable to recenter {}: {}", self, error);
        }
        let closed = self.pan.close();
        recentered.and(closed)
    }

    // ########################################
    // Setters and Getters.

    /// Returns the current (pan, tilt) pulse widths.
    pub fn get_pulses(&self) -> (u16, u16) {
        (self.pan.get_pulse(), self.tilt.get_pulse())
    }

    /// Returns the pan servo.
    pub fn get_pan(&self) -> &Servo {
        &self.pan
    }

    /// Returns the tilt servo.
    pub fn get_tilt(&self) -> &Servo {
        &self.tilt
    }

    /// Returns the recentering pulse width.
    pub fn get_center(&self) -> u16 {
        self.center
    }

    /// Sets the PWM range both servos accept (default [1000, 2000]). The center stays in range.
    pub fn set_pwm_range<R: Into<Range<u16>>>(mut self, pwm_range: R) -> Self {
        let pwm_range = pwm_range.into().ordered();
        self.pan = self.pan.set_pwm_range(pwm_range);
        self.tilt = self.tilt.set_pwm_range(pwm_range);
        self.center = pwm_range.clamp(self.center);
        self
    }
}

impl Display for PanTilt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (pan, tilt) = self.get_pulses();
        write!(
            f,
            "PAN-TILT (pan={}, tilt={}) [pan={}, tilt={}]",
            self.pan.get_channel(),
            self.tilt.get_channel(),
            pan,
            tilt
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::PCA9685;
    use crate::mocks::{MockI2cBus, MockPwmOutput};

    #[test]
    fn test_pan_tilt_creation() {
        let output = MockPwmOutput::default();
        let pan_tilt = PanTilt::new(&output, 0, 1).unwrap();
        assert_eq!(pan_tilt.get_pulses(), (1500, 1500));
        assert_eq!(pan_tilt.get_pan().get_channel(), 0);
        assert_eq!(pan_tilt.get_tilt().get_channel(), 1);
        assert_eq!(output.get_pulse(0), Some(1500));
        assert_eq!(output.get_pulse(1), Some(1500));
    }

    #[test]
    fn test_pan_tilt_write_order() {
        let output = MockPwmOutput::default();
        let mut pan_tilt = PanTilt::new(&output, 0, 1).unwrap();
        output.clear_history();
        pan_tilt.set_pulses(1500, 1250).unwrap();
        assert_eq!(output.get_history(), vec![(1, 1250), (0, 1500)]);
    }

    #[test]
    fn test_pan_tilt_values() {
        let output = MockPwmOutput::default();
        let mut pan_tilt = PanTilt::new(&output, 0, 1).unwrap();
        pan_tilt.set_values(-1.0, 1.0).unwrap();
        assert_eq!(pan_tilt.get_pulses(), (1000, 2000));
    }

    #[test]
    fn test_pan_tilt_recenter() {
        let output = MockPwmOutput::default();
        let mut pan_tilt = PanTilt::new(&output, 0, 1).unwrap();
        pan_tilt.set_pulses(1000, 2000).unwrap();
        pan_tilt.recenter().unwrap();
        assert_eq!(pan_tilt.get_pulses(), (1500, 1500));
    }

    #[test]
    fn test_pan_tilt_pwm_range() {
        let output = MockPwmOutput::default();
        let mut pan_tilt = PanTilt::new(&output, 0, 1)
            .unwrap()
            .set_pwm_range([1000, 2500]);
        pan_tilt.set_pulses(2500, 2400).unwrap();
        assert_eq!(pan_tilt.get_pulses(), (2500, 2400));
        assert_eq!(pan_tilt.get_center(), 1500);
    }

    #[test]
    fn test_pan_tilt_close_over_pca9685() {
        let bus = MockI2cBus::default();
        let pca9685 = PCA9685::default(bus.clone()).unwrap();
        let mut pan_tilt = PanTilt::new(&pca9685, 0, 1).unwrap();
        pan_tilt.set_pulses(1000, 2000).unwrap();
        pan_tilt.close().unwrap();
        // Channel 0 recentered: off = (4915 + 1) >> 4 = 0x133.
        assert_eq!(bus.get_register(0x40, 0x08), 0x33);
        // Sleeping.
        assert_eq!(bus.get_register(0x40, 0x00), 0x10);
    }

    #[test]
    fn test_pan_tilt_close_after_failure() {
        let output = MockPwmOutput::default();
        let mut pan_tilt = PanTilt::new(&output, 0, 1).unwrap();
        let _unplugged = output.clone().set_failing(true);

        assert!(pan_tilt.close().is_err());
        assert!(output.is_closed());
    }

    #[test]
    fn test_pan_tilt_display() {
        let output = MockPwmOutput::default();
        let pan_tilt = PanTilt::new(&output, 0, 1).unwrap();
        assert_eq!(
            format!("{}", pan_tilt),
            "PAN-TILT (pan=0, tilt=1) [pan=1500, tilt=1500]"
        );
    }
}
