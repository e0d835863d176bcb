use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use minimu9::Topology;

mod app;
mod board;
mod util;

#[derive(Parser)]
#[command(name = "MinIMU-9 CLI")]
#[command(bin_name = "minimu9-cli")]
#[command(about = "Read a Pololu MinIMU-9 over Linux I2C")]
struct Cli {
    /// I2C bus device
    #[arg(short = 'b', long, default_value = "/dev/i2c-1")]
    i2c_bus: PathBuf,

    /// Board layout: v5 (LSM6DS33 + LIS3MDL) or v3 (LSM303D + L3GD20H)
    #[arg(short, long, default_value = "v5")]
    topology: Topology,

    /// Magnetometer calibration file
    #[arg(short, long, default_value = "~/.minimu9-ahrs-cal")]
    calibration: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Stream raw magnetometer, accelerometer and gyroscope counts")]
    Raw(app::StreamArgs),
    #[command(about = "Stream calibrated gyro (rad/s), accel (g) and mag (normalized) vectors")]
    Read(app::ReadArgs),
    #[command(about = "Fit a magnetometer calibration to raw readings on stdin")]
    Calibrate(app::CalibrateArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let calibration_path = util::expand_home(&cli.calibration);
    let config = minimu9::ImuConfig {
        topology: cli.topology,
        ..Default::default()
    };

    match cli.command {
        Commands::Raw(args) => app::stream_raw(&cli.i2c_bus, &config, &args),
        Commands::Read(args) => app::stream_calibrated(&cli.i2c_bus, config, &calibration_path, &args),
        Commands::Calibrate(args) => app::calibrate(&calibration_path, &args),
    }
}
