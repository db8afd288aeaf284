//! Shakes a pan-tilt HAT (a PCA9685 on I2C) between its extremes every 50ms, then recenters it
//! and puts the chip to sleep on Ctrl-C.

use pantilt_radar::devices::PanTilt;
use pantilt_radar::errors::Error;
use pantilt_radar::hardware::{SimulatedBus, PCA9685};
use pantilt_radar::pause;
use pantilt_radar::utils::Shutdown;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let shutdown = Shutdown::on_ctrl_c();
    let pca9685 = PCA9685::default(SimulatedBus::default())?;
    println!("{}", pca9685);

    // Pan on channel 0, tilt on channel 1.
    let mut pan_tilt = PanTilt::new(&pca9685, 0, 1)?;

    println!("Start");
    while shutdown.is_running() {
        for (pan, tilt) in [(1500, 1000), (1500, 2000), (1000, 1000), (2000, 2000)] {
            pan_tilt.set_pulses(pan, tilt)?;
            pause!(50);
        }
    }

    println!("Stopping continuous movement");
    pan_tilt.close()?;
    println!("Finished: {}", pan_tilt);
    Ok(())
}
