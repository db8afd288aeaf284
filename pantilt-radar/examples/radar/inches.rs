//! Runs the plain (inches) radar on simulated hardware for a full back-and-forth sweep and
//! writes one frame out of 30 as PNG files into `target/radar_inches`.

use pantilt_radar::display::PngSurface;
use pantilt_radar::errors::Error;
use pantilt_radar::hardware::{SimulatedBus, SimulatedSensor, PCA9685};
use pantilt_radar::radar::{RadarProfile, Scanner};
use pantilt_radar::utils::Shutdown;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let profile = RadarProfile::inches();
    let bus = SimulatedBus::default();
    let pca9685 = PCA9685::default(bus.clone())?;

    // Something at 20 inches, 60° to the right.
    let sensor =
        SimulatedSensor::new(&bus, profile.get_servo_channel()).with_obstacle(30.0, 6.0, 0.508);
    let display = PngSurface::new("target/radar_inches")?.set_every(30);

    let mut scanner = Scanner::attach(profile, &bus, &pca9685, sensor, display)?;
    let ticks = scanner.run(&Shutdown::on_ctrl_c(), Some(360)).await?;
    println!("{} ticks, last position: {}", ticks, scanner.get_state());
    Ok(())
}
