use std::fmt::{Display, Formatter};

use log::{debug, info};

use crate::errors::Error;
use crate::io::ControlTransfer;
use crate::pause;

/// Commands understood by the USB foam-missile launcher.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LauncherCommand {
    Up,
    Down,
    Left,
    Right,
    Stop,
    Fire,
}

impl LauncherCommand {
    /// Returns the 8-byte HID report carrying the command.
    pub fn report(&self) -> [u8; 8] {
        let code = match self {
            LauncherCommand::Down => 0x01,
            LauncherCommand::Up => 0x02,
            LauncherCommand::Left => 0x04,
            LauncherCommand::Right => 0x08,
            LauncherCommand::Fire => 0x10,
            LauncherCommand::Stop => 0x20,
        };
        [0x02, code, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    }
}

impl Display for LauncherCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LauncherCommand::Up => "up",
            LauncherCommand::Down => "down",
            LauncherCommand::Left => "left",
            LauncherCommand::Right => "right",
            LauncherCommand::Stop => "stop",
            LauncherCommand::Fire => "fire",
        };
        write!(f, "{}", name)
    }
}

/// A USB foam-missile launcher driven through HID SET_REPORT control transfers.
#[derive(Clone, Debug)]
pub struct Launcher {
    transport: Box<dyn ControlTransfer>,
    /// How long the fire command is held before stopping (default: 3000ms).
    fire_duration: u64,
    /// Last command sent.
    last: Option<LauncherCommand>,
}

impl Launcher {
    /// USB vendor id of the launcher.
    pub const VENDOR_ID: u16 = 0x2123;
    /// USB product id of the launcher.
    pub const PRODUCT_ID: u16 = 0x1010;

    // HID class SET_REPORT request, output report 0.
    const REQUEST_TYPE: u8 = 0x21;
    const SET_REPORT: u8 = 0x09;
    const REPORT_VALUE: u16 = 0x0200;

    /// Creates a launcher talking through the given USB control endpoint.
    pub fn new(transport: &(dyn ControlTransfer + 'static)) -> Self {
        Self {
            transport: dyn_clone::clone_box(transport),
            fire_duration: 3000,
            last: None,
        }
    }

    /// Sends a single command.
    pub fn send(&mut self, command: LauncherCommand) -> Result<&Self, Error> {
        debug!("Launcher command: {}", command);
        self.transport.control_out(
            Launcher::REQUEST_TYPE,
            Launcher::SET_REPORT,
            Launcher::REPORT_VALUE,
            0,
            &command.report(),
        )?;
        self.last = Some(command);
        Ok(self)
    }

    /// Moves the turret one step: the movement command is immediately followed by a stop.
    pub fn nudge(&mut self, direction: LauncherCommand) -> Result<&Self, Error> {
        self.send(direction)?;
        self.send(LauncherCommand::Stop)
    }

    /// Fires: holds the fire command for the configured duration, then stops.
    pub async fn fire(&mut self) -> Result<&Self, Error> {
        info!("Launcher firing");
        self.send(LauncherCommand::Fire)?;
        pause!(self.fire_duration);
        self.send(LauncherCommand::Stop)
    }

    // ########################################
    // Setters and Getters.

    /// Returns the last command sent.
    pub fn get_last_command(&self) -> Option<LauncherCommand> {
        self.last
    }

    /// Returns how long (in ms) the fire command is held.
    pub fn get_fire_duration(&self) -> u64 {
        self.fire_duration
    }

    /// Sets how long (in ms) the fire command is held.
    pub fn set_fire_duration(mut self, fire_duration: u64) -> Self {
        self.fire_duration = fire_duration;
        self
    }
}

impl Display for Launcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LAUNCHER ({:04x}:{:04x}) [fire_duration={}ms]",
            Launcher::VENDOR_ID,
            Launcher::PRODUCT_ID,
            self.fire_duration
        )
    }
}
