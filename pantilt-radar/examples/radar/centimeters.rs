//! Runs the alert (centimeters) radar on simulated hardware until Ctrl-C: the background turns
//! red whenever something stands closer than 70cm.

use pantilt_radar::display::PngSurface;
use pantilt_radar::errors::Error;
use pantilt_radar::hardware::{SimulatedBus, SimulatedSensor, PCA9685};
use pantilt_radar::radar::{RadarProfile, Scanner};
use pantilt_radar::utils::Shutdown;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let profile = RadarProfile::centimeters().set_threshold(60.0);
    let bus = SimulatedBus::default();
    let pca9685 = PCA9685::default(bus.clone())?;

    let sensor = SimulatedSensor::new(&bus, profile.get_servo_channel())
        .with_obstacle(90.0, 4.0, 0.35)
        .with_obstacle(135.0, 12.0, 0.8)
        .set_noise(0.01);
    let display = PngSurface::new("target/radar_centimeters")?.set_every(15);

    let mut scanner = Scanner::attach(profile, &bus, &pca9685, sensor, display)?;
    scanner.run(&Shutdown::on_ctrl_c(), None).await?;
    Ok(())
}
