//! Drives the USB foam-missile launcher through a scripted salvo: aim, fire, aim back.
//!
//! The USB transport is simulated: plug a real control endpoint implementing
//! `pantilt_radar::io::ControlTransfer` to drive the physical toy.

use pantilt_radar::devices::{Launcher, LauncherCommand};
use pantilt_radar::errors::Error;
use pantilt_radar::hardware::SimulatedBus;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let bus = SimulatedBus::default();
    let mut launcher = Launcher::new(&bus).set_fire_duration(1000);
    println!("{}", launcher);

    for command in [LauncherCommand::Left, LauncherCommand::Left, LauncherCommand::Up] {
        launcher.nudge(command)?;
    }
    launcher.fire().await?;
    for command in [LauncherCommand::Down, LauncherCommand::Right, LauncherCommand::Right] {
        launcher.nudge(command)?;
    }

    println!("{} USB transfers sent", bus.get_control_transfers());
    Ok(())
}
