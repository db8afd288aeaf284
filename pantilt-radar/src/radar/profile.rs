use std::fmt::{Display, Formatter};

use embedded_graphics::prelude::Point;

use crate::errors::Error;
use crate::radar::sampler::Unit;

/// Everything that tells one radar deployment from another.
///
/// Two presets ship with the crate: [`RadarProfile::inches`] (plain black background) and
/// [`RadarProfile::centimeters`] (ambient glow and alert background on detection). Both can be
/// tuned with the consuming setters:
///
/// ```
/// use pantilt_radar::radar::{RadarProfile, Unit};
///
/// let profile = RadarProfile::centimeters()
///     .set_threshold(50.0)
///     .set_glow(false);
/// assert_eq!(profile.get_unit(), Unit::Centimeters);
/// assert!(profile.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct RadarProfile {
    /// Unit of the measurements, threshold and range labels.
    unit: Unit,
    /// Detection threshold (inclusive, in `unit`).
    threshold: f64,
    /// Distance (in `unit`) shown at the outer ring.
    max_range: f64,
    /// Number of evenly spaced range rings.
    rings: u8,
    /// Pause between two ticks (in ms).
    tick_ms: u64,
    /// Trail alpha multiplier applied every tick, over 256.
    trail_decay: u8,
    /// Draw the ambient glow.
    glow: bool,
    /// Number of glow points drawn per frame.
    glow_points: usize,
    /// Switch the background to the alert color on detection.
    alert_background: bool,
    /// Canvas width (in pixels).
    width: u32,
    /// Canvas height (in pixels).
    height: u32,
    /// Radar disc radius (in pixels).
    radius: u32,
    /// Radar center (in pixels).
    center: (i32, i32),
    /// PWM channel of the sweep servo carrying the range finder.
    servo_channel: u8,
    /// PCA9685 channel of the pan servo.
    pan_channel: u8,
    /// PCA9685 channel of the tilt servo.
    tilt_channel: u8,
}

impl Default for RadarProfile {
    fn default() -> Self {
        Self::centimeters()
    }
}

impl RadarProfile {
    /// The plain profile: inches, black background, no glow.
    pub fn inches() -> Self {
        Self {
            unit: Unit::Inches,
            threshold: 27.56,
            max_range: 100.0,
            rings: 4,
            tick_ms: 10,
            trail_decay: 10,
            glow: false,
            glow_points: 200,
            alert_background: false,
            width: 800,
            height: 600,
            radius: 250,
            center: (400, 550),
            servo_channel: 14,
            pan_channel: 0,
            tilt_channel: 1,
        }
    }

    /// The alert profile: centimeters, ambient glow, light-red background on detection.
    pub fn centimeters() -> Self {
        Self {
            unit: Unit::Centimeters,
            threshold: 70.0,
            glow: true,
            alert_background: true,
            ..Self::inches()
        }
    }

    /// Loads a profile from a JSON file. Missing fields take the [`RadarProfile::default`] values.
    #[cfg(feature = "serde")]
    pub fn from_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|error| Error::ConfigError {
            info: format!("cannot read {}: {}", path.as_ref().display(), error),
        })?;
        Self::from_json_str(&content)
    }

    /// Parses a profile from a JSON string. Missing fields take the [`RadarProfile::default`]
    /// values.
    #[cfg(feature = "serde")]
    pub fn from_json_str(content: &str) -> Result<Self, Error> {
        let profile: RadarProfile =
            serde_json::from_str(content).map_err(|error| Error::ConfigError {
                info: error.to_string(),
            })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Checks the profile is usable.
    pub fn validate(&self) -> Result<(), Error> {
        let fail = |info: &str| {
            Err(Error::ConfigError {
                info: String::from(info),
            })
        };
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return fail("threshold must be a positive number");
        }
        if !self.max_range.is_finite() || self.max_range <= 0.0 {
            return fail("max range must be strictly positive");
        }
        if self.rings == 0 {
            return fail("at least one range ring is required");
        }
        if self.width == 0 || self.height == 0 {
            return fail("canvas must not be empty");
        }
        if self.radius == 0 {
            return fail("radar radius must not be zero");
        }
        if self.radius > self.width.max(self.height) {
            return fail("radar radius must fit the canvas");
        }
        if self.center.0 < 0
            || self.center.1 < 0
            || self.center.0 as u32 >= self.width
            || self.center.1 as u32 >= self.height
        {
            return fail("radar center must lie on the canvas");
        }
        if self.pan_channel == self.tilt_channel {
            return fail("pan and tilt need distinct channels");
        }
        if self.pan_channel > 15 || self.tilt_channel > 15 {
            return fail("pan-tilt channels must be within 0-15");
        }
        Ok(())
    }

    // ########################################
    // Setters and Getters.

    pub fn get_unit(&self) -> Unit {
        self.unit
    }
    pub fn set_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn get_threshold(&self) -> f64 {
        self.threshold
    }
    pub fn set_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn get_max_range(&self) -> f64 {
        self.max_range
    }
    pub fn set_max_range(mut self, max_range: f64) -> Self {
        self.max_range = max_range;
        self
    }

    pub fn get_rings(&self) -> u8 {
        self.rings
    }
    pub fn set_rings(mut self, rings: u8) -> Self {
        self.rings = rings;
        self
    }

    pub fn get_tick_ms(&self) -> u64 {
        self.tick_ms
    }
    pub fn set_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    pub fn get_trail_decay(&self) -> u8 {
        self.trail_decay
    }
    pub fn set_trail_decay(mut self, trail_decay: u8) -> Self {
        self.trail_decay = trail_decay;
        self
    }

    pub fn has_glow(&self) -> bool {
        self.glow
    }
    pub fn set_glow(mut self, glow: bool) -> Self {
        self.glow = glow;
        self
    }

    pub fn get_glow_points(&self) -> usize {
        self.glow_points
    }
    pub fn set_glow_points(mut self, glow_points: usize) -> Self {
        self.glow_points = glow_points;
        self
    }

    pub fn has_alert_background(&self) -> bool {
        self.alert_background
    }
    pub fn set_alert_background(mut self, alert_background: bool) -> Self {
        self.alert_background = alert_background;
        self
    }

    /// Returns the canvas (width, height) in pixels.
    pub fn get_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
    pub fn set_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn get_radius(&self) -> u32 {
        self.radius
    }
    pub fn set_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    pub fn get_center(&self) -> Point {
        Point::new(self.center.0, self.center.1)
    }
    pub fn set_center(mut self, x: i32, y: i32) -> Self {
        self.center = (x, y);
        self
    }

    pub fn get_servo_channel(&self) -> u8 {
        self.servo_channel
    }
    pub fn set_servo_channel(mut self, servo_channel: u8) -> Self {
        self.servo_channel = servo_channel;
        self
    }

    /// Returns the pan-tilt (pan, tilt) channels.
    pub fn get_pan_tilt_channels(&self) -> (u8, u8) {
        (self.pan_channel, self.tilt_channel)
    }
    pub fn set_pan_tilt_channels(mut self, pan_channel: u8, tilt_channel: u8) -> Self {
        self.pan_channel = pan_channel;
        self.tilt_channel = tilt_channel;
        self
    }
}

impl Display for RadarProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PROFILE ({}) [threshold={}, range={}, rings={}, tick={}ms, glow={}, alert={}]",
            self.unit.label(),
            self.threshold,
            self.max_range,
            self.rings,
            self.tick_ms,
            self.glow,
            self.alert_background
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_preset() {
        let profile = RadarProfile::inches();
        assert_eq!(profile.get_unit(), Unit::Inches);
        assert_eq!(profile.get_threshold(), 27.56);
        assert_eq!(profile.get_max_range(), 100.0);
        assert_eq!(profile.get_rings(), 4);
        assert_eq!(profile.get_tick_ms(), 10);
        assert_eq!(profile.get_trail_decay(), 10);
        assert!(!profile.has_glow());
        assert!(!profile.has_alert_background());
        assert_eq!(profile.get_size(), (800, 600));
        assert_eq!(profile.get_radius(), 250);
        assert_eq!(profile.get_center(), Point::new(400, 550));
        assert_eq!(profile.get_servo_channel(), 14);
        assert_eq!(profile.get_pan_tilt_channels(), (0, 1));
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_centimeters_preset() {
        let profile = RadarProfile::centimeters();
        assert_eq!(profile.get_unit(), Unit::Centimeters);
        assert_eq!(profile.get_threshold(), 70.0);
        assert!(profile.has_glow());
        assert_eq!(profile.get_glow_points(), 200);
        assert!(profile.has_alert_background());
        assert!(profile.validate().is_ok());
        assert_eq!(RadarProfile::default(), profile);
    }

    #[test]
    fn test_setters() {
        let profile = RadarProfile::inches()
            .set_unit(Unit::Centimeters)
            .set_threshold(12.0)
            .set_max_range(400.0)
            .set_rings(8)
            .set_tick_ms(0)
            .set_trail_decay(128)
            .set_glow(true)
            .set_glow_points(10)
            .set_alert_background(true)
            .set_size(320, 240)
            .set_radius(100)
            .set_center(160, 230)
            .set_servo_channel(3)
            .set_pan_tilt_channels(4, 5);
        assert_eq!(profile.get_unit(), Unit::Centimeters);
        assert_eq!(profile.get_threshold(), 12.0);
        assert_eq!(profile.get_max_range(), 400.0);
        assert_eq!(profile.get_rings(), 8);
        assert_eq!(profile.get_tick_ms(), 0);
        assert_eq!(profile.get_trail_decay(), 128);
        assert!(profile.has_glow());
        assert_eq!(profile.get_glow_points(), 10);
        assert!(profile.has_alert_background());
        assert_eq!(profile.get_size(), (320, 240));
        assert_eq!(profile.get_radius(), 100);
        assert_eq!(profile.get_center(), Point::new(160, 230));
        assert_eq!(profile.get_servo_channel(), 3);
        assert_eq!(profile.get_pan_tilt_channels(), (4, 5));
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let check = |profile: RadarProfile, message: &str| {
            let error = profile.validate().err().unwrap();
            assert_eq!(error.to_string(), format!("Configuration error: {}.", message));
        };
        check(
            RadarProfile::inches().set_threshold(f64::NAN),
            "threshold must be a positive number",
        );
        check(
            RadarProfile::inches().set_threshold(-1.0),
            "threshold must be a positive number",
        );
        check(
            RadarProfile::inches().set_max_range(0.0),
            "max range must be strictly positive",
        );
        check(
            RadarProfile::inches().set_rings(0),
            "at least one range ring is required",
        );
        check(RadarProfile::inches().set_size(0, 600), "canvas must not be empty");
        check(RadarProfile::inches().set_radius(0), "radar radius must not be zero");
        check(
            RadarProfile::inches().set_radius(801),
            "radar radius must fit the canvas",
        );
        check(
            RadarProfile::centimeters().set_radius(3_000_000_000),
            "radar radius must fit the canvas",
        );
        assert!(RadarProfile::inches().set_radius(800).validate().is_ok());
        check(
            RadarProfile::inches().set_center(800, 10),
            "radar center must lie on the canvas",
        );
        check(
            RadarProfile::inches().set_pan_tilt_channels(2, 2),
            "pan and tilt need distinct channels",
        );
        check(
            RadarProfile::inches().set_pan_tilt_channels(0, 16),
            "pan-tilt channels must be within 0-15",
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", RadarProfile::inches()),
            "PROFILE (in) [threshold=27.56, range=100, rings=4, tick=10ms, glow=false, alert=false]"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let profile = RadarProfile::from_json_str(r#"{"unit": "inches", "threshold": 12.5}"#)
            .unwrap();
        assert_eq!(profile.get_unit(), Unit::Inches);
        assert_eq!(profile.get_threshold(), 12.5);
        // Missing fields come from the default profile.
        assert!(profile.has_glow());

        let error = RadarProfile::from_json_str(r#"{"rings": 0}"#).err().unwrap();
        assert_eq!(
            error.to_string(),
            "Configuration error: at least one range ring is required."
        );
        assert!(RadarProfile::from_json_str("{").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("profile.json");
        let json = serde_json::to_string(&RadarProfile::inches()).unwrap();
        std::fs::write(&path, json).unwrap();
        assert_eq!(RadarProfile::from_json(&path).unwrap(), RadarProfile::inches());

        let error = RadarProfile::from_json(directory.path().join("missing.json"))
            .err()
            .unwrap();
        assert!(error.to_string().starts_with("Configuration error: cannot read"));
    }
}
