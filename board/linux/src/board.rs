use std::path::Path;

use anyhow::{Context, Result};
use linux_embedded_hal::I2cdev;
use log::info;
use minimu9::{ImuConfig, MinImu9};

pub type LinuxImu = MinImu9<I2cdev>;

/// Open every chip of the configured layout on `bus` and power them up
pub fn open_imu(bus: &Path, config: &ImuConfig) -> Result<LinuxImu> {
    let mut imu = MinImu9::open(config.topology, config.scale, || I2cdev::new(bus))
        .with_context(|| format!("failed to open I2C bus {}", bus.display()))?;

    imu.enable()
        .with_context(|| format!("failed to enable {} sensors on {}", config.topology, bus.display()))?;

    info!("Opened {} on {}", config.topology, bus.display());
    Ok(imu)
}
