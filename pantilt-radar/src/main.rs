use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info};

use pantilt_radar::display::{DisplaySurface, NullSurface, PngSurface};
use pantilt_radar::errors::Error;
use pantilt_radar::hardware::{SimulatedBus, SimulatedSensor, PCA9685};
use pantilt_radar::radar::{RadarProfile, Scanner};
use pantilt_radar::utils::Shutdown;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// Inches, plain background.
    Inches,
    /// Centimeters, ambient glow and alert background.
    Centimeters,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Radar sweep over a simulated pan-tilt range finder")]
struct Args {
    /// Built-in profile to start from
    #[arg(long, value_enum, default_value_t = Preset::Centimeters)]
    profile: Preset,
    /// Load the profile from a JSON file instead (requires the `serde` feature)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Stop after this many ticks (runs until Ctrl-C otherwise)
    #[arg(long)]
    ticks: Option<u64>,
    /// Write frames as PNG files into this directory
    #[arg(long)]
    output: Option<PathBuf>,
    /// Keep one frame out of N when writing PNG files
    #[arg(long, default_value_t = 10)]
    every: usize,
    /// Override the pause between two ticks (in ms)
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Seed the simulated sensor noise and the ambient glow
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<u64, Error> {
    let mut profile = load_profile(&args)?;
    if let Some(tick_ms) = args.tick_ms {
        profile = profile.set_tick_ms(tick_ms);
    }

    let display: Box<dyn DisplaySurface> = match &args.output {
        Some(directory) => Box::new(PngSurface::new(directory)?.set_every(args.every)),
        None => Box::new(NullSurface::default()),
    };

    // The sweep servo sits on a bare PWM pin, the pan-tilt mount on a PCA9685: both simulated.
    let bus = SimulatedBus::default();
    let pca9685 = PCA9685::default(bus.clone())?;
    let mut sensor = SimulatedSensor::new(&bus, profile.get_servo_channel())
        .with_obstacle(45.0, 8.0, 0.45)
        .with_obstacle(120.0, 5.0, 0.25)
        .with_obstacle(150.0, 10.0, 0.85);
    info!("Simulated scene: {} obstacles", sensor.get_obstacles().len());
    if let Some(seed) = args.seed {
        sensor = sensor.set_seed(seed);
    }

    let mut scanner = Scanner::attach(profile, &bus, &pca9685, sensor, display)?;
    if let Some(seed) = args.seed {
        scanner = scanner.set_seed(seed);
    }

    let shutdown = Shutdown::on_ctrl_c();
    scanner.run(&shutdown, args.ticks).await
}

fn load_profile(args: &Args) -> Result<RadarProfile, Error> {
    match &args.config {
        #[cfg(feature = "serde")]
        Some(path) => RadarProfile::from_json(path),
        #[cfg(not(feature = "serde"))]
        Some(path) => Err(Error::ConfigError {
            info: format!(
                "cannot load {}: JSON profiles need the `serde` feature",
                path.display()
            ),
        }),
        None => Ok(match args.profile {
            Preset::Inches => RadarProfile::inches(),
            Preset::Centimeters => RadarProfile::centimeters(),
        }),
    }
}
