use std::fmt::{Display, Formatter};

use crate::utils::{Range, Scalable};

/// Way the scan angle moves at the next step.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Increasing,
    Decreasing,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Increasing => Direction::Decreasing,
            Direction::Decreasing => Direction::Increasing,
        }
    }
}

/// The (angle, direction) pair: the whole control state of the sweep.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepState {
    /// Scan angle in degrees, always within [`SweepState::BOUNDS`].
    pub angle: u16,
    pub direction: Direction,
}

impl SweepState {
    /// The sweep arc (in degrees), bounds included.
    pub const BOUNDS: Range<u16> = Range { start: 0, end: 180 };

    /// Creates a state, the angle being clamped in [`SweepState::BOUNDS`].
    pub fn new(angle: u16, direction: Direction) -> Self {
        Self {
            angle: Self::BOUNDS.clamp(angle),
            direction,
        }
    }

    /// Computes the next state: one degree in the current direction, bouncing off the bounds.
    ///
    /// A bound is never overshot: standing on a bound while heading out of the arc reverses the
    /// direction first, so 180 going up steps down to 179.
    ///
    /// ```
    /// use pantilt_radar::radar::{Direction, SweepState};
    ///
    /// let state = SweepState::new(180, Direction::Increasing).step();
    /// assert_eq!(state, SweepState::new(179, Direction::Decreasing));
    /// ```
    pub fn step(self) -> Self {
        let direction = match (self.direction, self.angle) {
            (Direction::Increasing, angle) if angle >= Self::BOUNDS.end => Direction::Decreasing,
            (Direction::Decreasing, angle) if angle <= Self::BOUNDS.start => Direction::Increasing,
            (direction, _) => direction,
        };
        let angle = match direction {
            Direction::Increasing => self.angle + 1,
            Direction::Decreasing => self.angle - 1,
        };
        Self { angle, direction }
    }
}

impl Display for SweepState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}° ({:?})", self.angle, self.direction)
    }
}

/// What the actuators are told for a given scan angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActuatorCommand {
    /// The sweep servo position in [-1, 1].
    pub normalized: f64,
    /// The pan-tilt tilt pulse width (in µs), following the sweep.
    pub tilt_pulse_us: u16,
    /// The pan-tilt pan pulse width (in µs), held centered.
    pub pan_pulse_us: u16,
}

impl ActuatorCommand {
    /// Center pulse width (in µs) of both pan-tilt channels.
    pub const CENTER_PULSE: u16 = 1500;
    /// Half of the pan-tilt pulse excursion (in µs): [1000, 2000] around the center.
    pub const PULSE_SPAN: f64 = 500.0;

    /// Builds the command for `angle` (in degrees, [0, 180]).
    pub fn for_angle(angle: u16) -> Self {
        let normalized = normalized(angle);
        let offset = (normalized * ActuatorCommand::PULSE_SPAN).trunc() as i32;
        Self {
            normalized,
            tilt_pulse_us: (ActuatorCommand::CENTER_PULSE as i32 + offset) as u16,
            pan_pulse_us: ActuatorCommand::CENTER_PULSE,
        }
    }
}

/// Maps a scan angle from [0, 180] onto the normalized actuator range [-1, 1]: `(angle - 90) / 90`.
pub fn normalized(angle: u16) -> f64 {
    angle.scale(SweepState::BOUNDS, Range::from([-1.0, 1.0]))
}

/// Advances the scan angle back and forth across the arc, one degree per tick.
#[derive(Default, Clone, Debug)]
pub struct SweepDriver {
    state: SweepState,
}

impl SweepDriver {
    /// Creates a driver starting from the given state.
    pub fn new(state: SweepState) -> Self {
        Self { state }
    }

    /// Steps once and returns the command for the new angle.
    pub fn advance(&mut self) -> ActuatorCommand {
        self.state = self.state.step();
        ActuatorCommand::for_angle(self.state.angle)
    }

    /// Returns the current state.
    pub fn get_state(&self) -> SweepState {
        self.state
    }

    /// Returns the current scan angle (in degrees).
    pub fn get_angle(&self) -> u16 {
        self.state.angle
    }

    /// Returns the current direction.
    pub fn get_direction(&self) -> Direction {
        self.state.direction
    }
}
