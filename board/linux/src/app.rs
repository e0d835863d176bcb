use std::io::{self, Read};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use linux_embedded_hal::Delay;
use log::{info, warn};
use minimu9::{calibrator, load_calibration, BiasConfig, ImuConfig, Vector3d};

use crate::board::open_imu;

#[derive(clap::Args)]
pub struct StreamArgs {
    /// Stop after this many samples
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Minimum time between samples in milliseconds
    #[arg(short, long, default_value_t = 20)]
    interval_ms: u64,
}

#[derive(clap::Args)]
pub struct ReadArgs {
    #[command(flatten)]
    stream: StreamArgs,

    /// Samples averaged for the gyro bias; the board must be still meanwhile
    #[arg(long, default_value_t = minimu9::config::DEFAULT_BIAS_SAMPLES)]
    bias_samples: u32,
}

#[derive(clap::Args)]
pub struct CalibrateArgs {
    /// Write the result to the calibration file
    #[arg(long)]
    save: bool,
}

/// Call `sample` at most once per `interval` until `count` samples are taken
fn run_loop(args: &StreamArgs, mut sample: impl FnMut() -> Result<()>) -> Result<()> {
    let interval = Duration::from_millis(args.interval_ms);
    let mut taken = 0;
    loop {
        if args.count.is_some_and(|count| taken >= count) {
            return Ok(());
        }
        let started = Instant::now();
        sample()?;
        taken += 1;

        let elapsed = started.elapsed();
        if elapsed < interval {
            std::thread::sleep(interval - elapsed);
        }
    }
}

fn format_vector(v: &Vector3d) -> String {
    format!("{:8.3} {:8.3} {:8.3}", v.x, v.y, v.z)
}

/// Print raw mag, accel and gyro counts, nine integers per line. The first
/// three columns are what `calibrate` consumes.
pub fn stream_raw(bus: &Path, config: &ImuConfig, args: &StreamArgs) -> Result<()> {
    let mut imu = open_imu(bus, config)?;
    run_loop(args, || {
        let m = imu.read_raw_mag()?;
        let a = imu.read_raw_accel()?;
        let g = imu.read_raw_gyro()?;
        println!(
            "{:7} {:7} {:7}  {:7} {:7} {:7}  {:7} {:7} {:7}",
            m.x, m.y, m.z, a.x, a.y, a.z, g.x, g.y, g.z
        );
        Ok(())
    })
}

/// Print calibrated gyro, accel and mag vectors
pub fn stream_calibrated(
    bus: &Path,
    mut config: ImuConfig,
    calibration_path: &Path,
    args: &ReadArgs,
) -> Result<()> {
    config.bias = BiasConfig {
        sample_count: args.bias_samples,
        ..config.bias
    };

    let calibration = load_calibration(calibration_path).with_context(|| {
        format!(
            "run `minimu9-cli raw | minimu9-cli calibrate --save` to create {}",
            calibration_path.display()
        )
    })?;

    let mut imu = open_imu(bus, &config)?;
    imu.set_calibration(calibration);

    info!("Measuring gyro bias, keep the board still");
    let mut delay = Delay;
    let bias = imu.measure_gyro_bias(&mut delay, &config.bias)?;
    info!("Gyro bias: {}", format_vector(&bias));

    run_loop(&args.stream, || {
        let sample = imu.read_all()?;
        println!(
            "{}  {}  {}",
            format_vector(&sample.gyro.value),
            format_vector(&sample.accel.value),
            format_vector(&sample.mag.value)
        );
        Ok(())
    })
}

/// Fit a calibration to raw readings piped on stdin and print it
pub fn calibrate(calibration_path: &Path, args: &CalibrateArgs) -> Result<()> {
    info!("Reading data...");
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read raw readings from stdin")?;
    let readings = calibrator::parse_readings(&input)?;
    info!("Read {} readings, optimizing calibration...", readings.len());

    let cal = calibrator::calibrate(&readings)?;
    println!("{}", cal);

    if args.save {
        cal.save(calibration_path)?;
    } else {
        warn!("Calibration not saved; pass --save to write {}", calibration_path.display());
    }
    Ok(())
}
