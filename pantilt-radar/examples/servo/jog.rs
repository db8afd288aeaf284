//! Jogs a single servo: a quarter turn right, then full left and full right every second until
//! Ctrl-C.

use pantilt_radar::devices::Servo;
use pantilt_radar::errors::Error;
use pantilt_radar::hardware::SimulatedBus;
use pantilt_radar::pause;
use pantilt_radar::utils::Shutdown;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let bus = SimulatedBus::default();
    let shutdown = Shutdown::on_ctrl_c();

    // Register a servo on channel 14, centered.
    let mut servo = Servo::new(&bus, 14, 1500)?;

    println!("Moving servo 90° right");
    servo.set_value(0.5)?;
    pause!(1000);

    while shutdown.is_running() {
        println!("Moving servo 180° left");
        servo.set_value(-1.0)?;
        pause!(1000);

        println!("Moving servo 180° right");
        servo.set_value(1.0)?;
        pause!(1000);
    }

    println!("Program stopped by user");
    servo.reset()?;
    Ok(())
}
