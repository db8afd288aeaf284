use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::trace;
use parking_lot::RwLock;

use crate::errors::Error;
use crate::io::PwmOutput;
use crate::utils::{Range, Scalable};

/// Represents a Servo controlled by a pulse-width channel of a [`PwmOutput`].
///
/// The servo can be commanded three ways, all ending up as a pulse width:
/// - in degrees ([`Self::to`]) within its `degree_range`,
/// - by a normalized value in [-1, 1] ([`Self::set_value`]), -1 being the minimum pulse,
/// - by a raw pulse width in µs ([`Self::set_pulse`]) within its `pwm_range`.
#[derive(Clone, Debug)]
pub struct Servo {
    // ########################################
    // # Basics
    /// The output channel used to control the Servo.
    channel: u8,
    /// The current pulse width (in µs).
    state: Arc<RwLock<u16>>,
    /// The pulse width the servo goes back to on reset (default: center of `pwm_range`).
    default: u16,

    // ########################################
    // # Settings
    /// The servo PWM range for control (default: [1000, 2000]).
    pwm_range: Range<u16>,
    /// The servo theoretical degree of movement (default: [0, 180]).
    degree_range: Range<u16>,
    /// Specifies if the servo command is inverted (default: false).
    inverted: bool,

    // ########################################
    // # Volatile utility data.
    attached: bool,
    output: Box<dyn PwmOutput>,
}

impl Servo {
    /// Creates an instance of a Servo attached to the given output channel and moves it to its
    /// `default` pulse width.
    ///
    /// # Errors
    /// * `UnknownChannel`: the output does not have such a channel.
    pub fn new(
        output: &(dyn PwmOutput + 'static),
        channel: u8,
        default: u16,
    ) -> Result<Self, Error> {
        Self::create(output, channel, default, false)
    }

    /// Creates an instance of an inverted Servo (see [`Self::set_inverted`]).
    pub fn new_inverted(
        output: &(dyn PwmOutput + 'static),
        channel: u8,
        default: u16,
    ) -> Result<Self, Error> {
        Self::create(output, channel, default, true)
    }

    /// Inner helper.
    fn create(
        output: &(dyn PwmOutput + 'static),
        channel: u8,
        default: u16,
        inverted: bool,
    ) -> Result<Self, Error> {
        let pwm_range = Range::from([1000, 2000]);
        let default = pwm_range.clamp(default);
        let mut servo = Self {
            channel,
            state: Arc::new(RwLock::new(default)),
            default,
            pwm_range,
            degree_range: Range::from([0, 180]),
            inverted,
            attached: false,
            output: dyn_clone::clone_box(output),
        };
        servo.set_pulse(default)?;
        Ok(servo)
    }

    /// Moves the servo to the requested position (in degrees) at max speed.
    pub fn to(&mut self, degrees: u16) -> Result<&Self, Error> {
        let degrees = self.degree_range.clamp(degrees) as f64;
        let degree_range = Range::from([
            self.degree_range.start as f64,
            self.degree_range.end as f64,
        ]);
        let pulse = degrees.scale(degree_range, self.oriented_pwm_range());
        self.set_pulse(pulse.round() as u16)
    }

    /// Moves the servo to a normalized position: -1 is the minimum pulse, 0 the center and 1 the
    /// maximum pulse. Values outside [-1, 1] are clamped.
    pub fn set_value(&mut self, value: f64) -> Result<&Self, Error> {
        let value = Range::from([-1.0, 1.0]).clamp(value);
        let pulse = value.scale(Range::from([-1.0, 1.0]), self.oriented_pwm_range());
        self.set_pulse(pulse.round() as u16)
    }

    /// Sends a raw pulse width (in µs), clamped in the servo `pwm_range`.
    pub fn set_pulse(&mut self, pulse_us: u16) -> Result<&Self, Error> {
        let pulse = self.pwm_range.clamp(pulse_us);
        trace!("Servo (channel={}) pulse {}us", self.channel, pulse);
        self.output.write_pulse(self.get_channel(), pulse)?;
        *self.state.write() = pulse;
        self.attached = true;
        Ok(self)
    }

    /// Moves the servo back to its default position.
    pub fn reset(&mut self) -> Result<&Self, Error> {
        self.set_pulse(self.default)
    }

    /// Stops sending pulses: the servo goes limp until commanded again.
    pub fn detach(&mut self) -> Result<&Self, Error> {
        self.output.release(self.get_channel())?;
        self.attached = false;
        Ok(self)
    }

    /// Gracefully shuts down the output the servo is plugged to.
    pub fn close(&mut self) -> Result<(), Error> {
        self.output.close()
    }

    // ########################################
    // Setters and Getters.

    /// Returns the output channel used by the servo.
    pub fn get_channel(&self) -> u8 {
        self.channel
    }

    /// Returns the current pulse width (in µs).
    pub fn get_pulse(&self) -> u16 {
        *self.state.read()
    }

    /// Returns the current position as a normalized value in [-1, 1].
    pub fn get_value(&self) -> f64 {
        let pulse = self.get_pulse();
        let value = pulse.scale(self.pwm_range, Range::from([-1.0, 1.0]));
        match self.inverted {
            false => value,
            true => -value,
        }
    }

    /// Returns the current position in degrees.
    pub fn get_degrees(&self) -> u16 {
        let degree_range = Range::from([
            self.degree_range.start as f64,
            self.degree_range.end as f64,
        ]);
        let value = self.get_value();
        value.scale(Range::from([-1.0, 1.0]), degree_range).round() as u16
    }

    /// Returns the default pulse width (in µs).
    pub fn get_default(&self) -> u16 {
        self.default
    }

    /// Checks whether the servo currently receives pulses.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Returns the theoretical range of pwm controls the servo responds to.
    pub fn get_pwm_range(&self) -> Range<u16> {
        self.pwm_range
    }

    /// Sets the theoretical range of pwm controls the servo responds to.
    ///
    /// - No matter the order given, the range will always have min <= max
    /// - The default pulse is clamped into the new range.
    pub fn set_pwm_range<R: Into<Range<u16>>>(mut self, pwm_range: R) -> Self {
        self.pwm_range = pwm_range.into().ordered();
        self.default = self.pwm_range.clamp(self.default);
        self
    }

    /// Returns the theoretical range of degrees of movement for the servo.
    pub fn get_degree_range(&self) -> Range<u16> {
        self.degree_range
    }

    /// Sets the theoretical range of degrees of movement for the servo (some servos can range from 0 to 90°, 180°, 270°, etc.).
    pub fn set_degree_range<R: Into<Range<u16>>>(mut self, degree_range: R) -> Self {
        self.degree_range = degree_range.into().ordered();
        self
    }

    /// Returns if the servo command is set to be inverted.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Sets the servo command inversion mode: the minimum position then emits the maximum pulse.
    pub fn set_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    // ########################################
    // Inner helpers.

    fn oriented_pwm_range(&self) -> Range<f64> {
        let start = self.pwm_range.start as f64;
        let end = self.pwm_range.end as f64;
        match self.inverted {
            false => Range::from([start, end]),
            true => Range::from([end, start]),
        }
    }
}

impl Display for Servo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SERVO (channel={}) [pulse={}, default={}, range={}]",
            self.channel,
            self.state.read(),
            self.default,
            self.pwm_range
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::devices::Servo;
    use crate::mocks::MockPwmOutput;
    use crate::utils::Range;

    fn _setup_servo(channel: u8) -> (Servo, MockPwmOutput) {
        let output = MockPwmOutput::default();
        let servo = Servo::new(&output, channel, 1500).unwrap();
        (servo, output)
    }

    #[test]
    fn test_servo_creation() {
        let (servo, output) = _setup_servo(14);
        assert_eq!(servo.get_channel(), 14);
        assert_eq!(servo.get_pulse(), 1500);
        assert_eq!(servo.get_default(), 1500);
        assert!(servo.is_attached());
        assert!(!servo.is_inverted());
        assert_eq!(output.get_pulse(14), Some(1500));

        let output = MockPwmOutput::default();
        let servo = Servo::new(&output, 3, 9999).unwrap();
        assert_eq!(servo.get_default(), 2000);
        assert_eq!(output.get_pulse(3), Some(2000));

        let servo = Servo::new_inverted(&output, 3, 1500).unwrap();
        assert!(servo.is_inverted());
    }

    #[test]
    fn test_servo_set_value() {
        let (mut servo, output) = _setup_servo(14);
        servo.set_value(-1.0).unwrap();
        assert_eq!(output.get_pulse(14), Some(1000));
        servo.set_value(0.0).unwrap();
        assert_eq!(output.get_pulse(14), Some(1500));
        servo.set_value(1.0).unwrap();
        assert_eq!(output.get_pulse(14), Some(2000));
        servo.set_value(0.5).unwrap();
        assert_eq!(output.get_pulse(14), Some(1750));
        assert_eq!(servo.get_value(), 0.5);

        // Clamped.
        servo.set_value(3.0).unwrap();
        assert_eq!(output.get_pulse(14), Some(2000));
        servo.set_value(-3.0).unwrap();
        assert_eq!(output.get_pulse(14), Some(1000));
    }

    #[test]
    fn test_servo_to_degrees() {
        let (mut servo, output) = _setup_servo(14);
        servo.to(0).unwrap();
        assert_eq!(output.get_pulse(14), Some(1000));
        servo.to(90).unwrap();
        assert_eq!(output.get_pulse(14), Some(1500));
        servo.to(180).unwrap();
        assert_eq!(output.get_pulse(14), Some(2000));
        assert_eq!(servo.get_degrees(), 180);
        servo.to(666).unwrap();
        assert_eq!(output.get_pulse(14), Some(2000));
    }

    #[test]
    fn test_servo_inverted() {
        let output = MockPwmOutput::default();
        let mut servo = Servo::new(&output, 1, 1500).unwrap().set_inverted(true);
        servo.set_value(-1.0).unwrap();
        assert_eq!(output.get_pulse(1), Some(2000));
        assert_eq!(servo.get_value(), -1.0);
        servo.to(180).unwrap();
        assert_eq!(output.get_pulse(1), Some(1000));
        assert_eq!(servo.get_degrees(), 180);
    }

    #[test]
    fn test_servo_set_pulse() {
        let (mut servo, output) = _setup_servo(0);
        servo.set_pulse(1234).unwrap();
        assert_eq!(output.get_pulse(0), Some(1234));
        servo.set_pulse(600).unwrap();
        assert_eq!(output.get_pulse(0), Some(1000));
        assert_eq!(servo.get_pulse(), 1000);
    }

    #[test]
    fn test_servo_pwm_range_setting() {
        let (servo, _) = _setup_servo(0);
        let servo = servo.set_pwm_range([2500, 1200]);
        assert_eq!(servo.get_pwm_range(), Range::from([1200, 2500]));
        assert_eq!(servo.get_default(), 1500);

        let servo = servo.set_pwm_range([1600, 2500]);
        assert_eq!(servo.get_default(), 1600);
    }

    #[test]
    fn test_servo_degree_range_setting() {
        let (servo, _) = _setup_servo(0);
        let mut servo = servo.set_degree_range([270, 0]);
        assert_eq!(servo.get_degree_range(), Range::from([0, 270]));
        servo.to(135).unwrap();
        assert_eq!(servo.get_pulse(), 1500);
    }

    #[test]
    fn test_servo_reset_and_detach() {
        let (mut servo, output) = _setup_servo(5);
        servo.set_value(1.0).unwrap();
        servo.reset().unwrap();
        assert_eq!(output.get_pulse(5), Some(1500));

        servo.detach().unwrap();
        assert!(!servo.is_attached());
        assert_eq!(output.get_pulse(5), None);
        assert!(output.is_released(5));

        // Any explicit command re-attaches.
        servo.set_value(0.2).unwrap();
        assert!(servo.is_attached());
        assert_eq!(output.get_pulse(5), Some(1600));
    }

    #[test]
    fn test_servo_output_failure() {
        let output = MockPwmOutput::default().set_failing(true);
        assert!(Servo::new(&output, 1, 1500).is_err());
    }

    #[test]
    fn test_servo_close() {
        let (mut servo, output) = _setup_servo(5);
        assert!(servo.close().is_ok());
        assert!(output.is_closed());
    }

    #[test]
    fn test_servo_display() {
        let (servo, _) = _setup_servo(12);
        assert_eq!(
            format!("{}", servo),
            "SERVO (channel=12) [pulse=1500, default=1500, range=1000-2000]"
        );
    }
}
