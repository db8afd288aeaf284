use std::fmt::{Display, Formatter};

use log::{debug, error, info, warn};

use crate::devices::{DistanceSensor, PanTilt, Servo};
use crate::display::DisplaySurface;
use crate::errors::{DisplayError, Error};
use crate::io::PwmOutput;
use crate::pause;
use crate::radar::profile::RadarProfile;
use crate::radar::renderer::{FrameSummary, RadarRenderer};
use crate::radar::sampler::{DistanceSampler, Measurement};
use crate::radar::sweep::{ActuatorCommand, SweepDriver, SweepState};
use crate::utils::Shutdown;

/// What happened during one tick of the radar loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Sweep state after the step.
    pub state: SweepState,
    /// Command sent to the actuators.
    pub command: ActuatorCommand,
    /// Distance measured at the new angle.
    pub measurement: Measurement,
    /// Whether the measurement was within the detection threshold.
    pub detected: bool,
    /// What the frame shows.
    pub frame: FrameSummary,
}

impl Display for TickReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TICK #{} [angle={}, distance={}, detected={}]",
            self.tick, self.state, self.measurement, self.detected
        )
    }
}

/// The radar control loop: owns every collaborator and tears them down exactly once.
///
/// Each tick advances the sweep, commands the sweep servo and the pan-tilt mount, samples the
/// range finder, then draws and presents the frame for the new angle.
#[derive(Debug)]
pub struct Scanner {
    profile: RadarProfile,
    sweep: SweepDriver,
    servo: Servo,
    pan_tilt: PanTilt,
    sampler: DistanceSampler,
    renderer: RadarRenderer,
    display: Box<dyn DisplaySurface>,
    ticks: u64,
    closed: bool,
}

impl Scanner {
    /// Assembles a scanner from ready-made devices.
    ///
    /// # Errors
    /// * `ConfigError`: the profile is not usable (see [`RadarProfile::validate`]).
    pub fn new<S, D>(
        profile: RadarProfile,
        servo: Servo,
        pan_tilt: PanTilt,
        sensor: S,
        display: D,
    ) -> Result<Self, Error>
    where
        S: DistanceSensor + 'static,
        D: DisplaySurface + 'static,
    {
        profile.validate()?;
        Ok(Self {
            sweep: SweepDriver::default(),
            servo,
            pan_tilt,
            sampler: DistanceSampler::new(sensor, profile.get_unit()),
            renderer: RadarRenderer::new(&profile),
            display: Box::new(display),
            ticks: 0,
            closed: false,
            profile,
        })
    }

    /// Assembles a scanner whose servos sit on the channels named by the profile: the sweep servo
    /// on `servo_output`, the pan-tilt mount on `pan_tilt_output` (a PCA9685 most-likely).
    pub fn attach<S, D>(
        profile: RadarProfile,
        servo_output: &(dyn PwmOutput + 'static),
        pan_tilt_output: &(dyn PwmOutput + 'static),
        sensor: S,
        display: D,
    ) -> Result<Self, Error>
    where
        S: DistanceSensor + 'static,
        D: DisplaySurface + 'static,
    {
        profile.validate()?;
        let (pan_channel, tilt_channel) = profile.get_pan_tilt_channels();
        let servo = Servo::new(
            servo_output,
            profile.get_servo_channel(),
            ActuatorCommand::CENTER_PULSE,
        )?;
        let pan_tilt = PanTilt::new(pan_tilt_output, pan_channel, tilt_channel)?;
        Self::new(profile, servo, pan_tilt, sensor, display)
    }

    /// Runs one iteration of the loop.
    ///
    /// # Errors
    /// Any collaborator failure: none is retried.
    pub fn tick(&mut self) -> Result<TickReport, Error> {
        if self.closed {
            return Err(DisplayError::Closed.into());
        }

        let command = self.sweep.advance();
        let state = self.sweep.get_state();
        self.servo.set_value(command.normalized)?;
        self.pan_tilt
            .set_pulses(command.pan_pulse_us, command.tilt_pulse_us)?;

        let measurement = self.sampler.sample()?;
        let detected = measurement.is_detection(self.profile.get_threshold());

        let frame = self.renderer.render(state.angle, &measurement, detected)?;
        self.display.present(self.renderer.frame())?;

        self.ticks += 1;
        let report = TickReport {
            tick: self.ticks,
            state,
            command,
            measurement,
            detected,
            frame,
        };
        debug!("{}", report);
        Ok(report)
    }

    /// Runs the loop until `shutdown` trips, `limit` ticks have been made or a collaborator
    /// fails. Cleanup happens on every way out.
    ///
    /// Returns the number of ticks made by this call.
    pub async fn run(&mut self, shutdown: &Shutdown, limit: Option<u64>) -> Result<u64, Error> {
        info!("Radar started: {}", self.profile);
        let start = self.ticks;
        let result = self.run_loop(shutdown, limit).await;
        if !shutdown.is_running() {
            info!("Radar stopped by user");
        }
        let cleanup = self.cleanup();

        let ticks = self.ticks - start;
        match result {
            Ok(()) => {
                cleanup?;
                info!("Radar stopped after {} ticks", ticks);
                Ok(ticks)
            }
            Err(error) => {
                error!("Radar failed after {} ticks: {}", ticks, error);
                Err(error)
            }
        }
    }

    async fn run_loop(&mut self, shutdown: &Shutdown, limit: Option<u64>) -> Result<(), Error> {
        let start = self.ticks;
        while shutdown.is_running() {
            if let Some(limit) = limit {
                if self.ticks - start >= limit {
                    break;
                }
            }
            self.tick()?;
            pause!(self.profile.get_tick_ms());
        }
        Ok(())
    }

    /// Recenters the sweep servo, recenters the pan-tilt mount and shuts its output down, then
    /// closes the display.
    ///
    /// Every step is attempted even if a previous one failed: the first failure is returned.
    /// Only the first call does anything.
    pub fn cleanup(&mut self) -> Result<(), Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        info!("Radar cleanup");

        let steps = [
            ("recenter sweep servo", self.servo.reset().map(|_| ())),
            ("close pan-tilt", self.pan_tilt.close()),
            ("close display", self.display.close()),
        ];
        let mut outcome = Ok(());
        for (step, result) in steps {
            if let Err(error) = result {
                warn!("Cleanup: cannot {}: {}", step, error);
                if outcome.is_ok() {
                    outcome = Err(error);
                }
            }
        }
        outcome
    }

    // ########################################
    // Setters and Getters.

    /// Starts the sweep from the given state instead of 0° increasing.
    pub fn set_start(mut self, state: SweepState) -> Self {
        self.sweep = SweepDriver::new(state);
        self
    }

    /// Seeds the renderer ambient glow (reproducible frames). The trail starts over.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.renderer = RadarRenderer::new(&self.profile).set_seed(seed);
        self
    }

    pub fn get_profile(&self) -> &RadarProfile {
        &self.profile
    }

    pub fn get_state(&self) -> SweepState {
        self.sweep.get_state()
    }

    pub fn get_servo(&self) -> &Servo {
        &self.servo
    }

    pub fn get_pan_tilt(&self) -> &PanTilt {
        &self.pan_tilt
    }

    pub fn get_renderer(&self) -> &RadarRenderer {
        &self.renderer
    }

    /// Returns the number of ticks completed since creation.
    pub fn count_ticks(&self) -> u64 {
        self.ticks
    }

    /// Checks whether the scanner has been cleaned up.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        if let Err(error) = self.cleanup() {
            warn!("Radar cleanup on drop failed: {}", error);
        }
    }
}
