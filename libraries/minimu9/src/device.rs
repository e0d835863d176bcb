//! Uniform access to the two MinIMU-9 chip layouts.
//!
//! The layout is chosen once when the device is opened. Every read is then
//! routed to whichever chip physically owns that sensor.

use std::fmt;
use std::str::FromStr;

use driver::{DriverError, L3g, Lis3mdl, Lsm303d, Lsm6};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use hal::{AccelSensor, GyroSensor, ImuSample, MagSensor, RawVector, Reading, SensorChip, Vector3d};
use log::info;

use crate::bias::measure_gyro_bias;
use crate::calibration::CalibrationRecord;
use crate::config::{BiasConfig, ScaleConfig};
use crate::error::{ImuError, ImuResult};
use crate::scaling::{normalize_mag, scale_accel, scale_gyro};

/// Physical arrangement of the sensor chips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    /// LSM6DS33 gyro + accelerometer with a separate LIS3MDL magnetometer (MinIMU-9 v5)
    #[default]
    Lsm6Lis3mdl,
    /// LSM303D accelerometer + magnetometer with a separate L3GD20H gyro (MinIMU-9 v3)
    Lsm303L3g,
}

impl FromStr for Topology {
    type Err = ImuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v5" | "lsm6-lis3mdl" => Ok(Topology::Lsm6Lis3mdl),
            "v3" | "lsm303-l3g" => Ok(Topology::Lsm303L3g),
            other => Err(ImuError::config(
                format!("unknown topology '{}', expected v5 or v3", other),
                Some("topology"),
            )),
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::Lsm6Lis3mdl => write!(f, "lsm6-lis3mdl"),
            Topology::Lsm303L3g => write!(f, "lsm303-l3g"),
        }
    }
}

/// The chip drivers present for a topology
pub enum Chips<I2C> {
    Lsm6Lis3mdl {
        gyro_accel: Lsm6<I2C>,
        mag: Lis3mdl<I2C>,
    },
    Lsm303L3g {
        accel_mag: Lsm303d<I2C>,
        gyro: L3g<I2C>,
    },
}

impl<I2C: I2c> Chips<I2C> {
    /// Create the drivers for `topology`, opening one bus handle per chip
    /// through `open_bus`. A failure to open the bus is returned unchanged.
    pub fn open<F, E>(topology: Topology, mut open_bus: F) -> Result<Self, E>
    where
        F: FnMut() -> Result<I2C, E>,
    {
        Ok(match topology {
            Topology::Lsm6Lis3mdl => Chips::Lsm6Lis3mdl {
                gyro_accel: Lsm6::new(open_bus()?),
                mag: Lis3mdl::new(open_bus()?),
            },
            Topology::Lsm303L3g => Chips::Lsm303L3g {
                accel_mag: Lsm303d::new(open_bus()?),
                gyro: L3g::new(open_bus()?),
            },
        })
    }

    pub fn topology(&self) -> Topology {
        match self {
            Chips::Lsm6Lis3mdl { .. } => Topology::Lsm6Lis3mdl,
            Chips::Lsm303L3g { .. } => Topology::Lsm303L3g,
        }
    }

    fn enable(&mut self) -> Result<(), DriverError> {
        match self {
            Chips::Lsm6Lis3mdl { gyro_accel, mag } => {
                gyro_accel.enable()?;
                mag.enable()
            }
            Chips::Lsm303L3g { accel_mag, gyro } => {
                accel_mag.enable()?;
                gyro.enable()
            }
        }
    }

    fn read_gyro_raw(&mut self) -> Result<RawVector, DriverError> {
        match self {
            Chips::Lsm6Lis3mdl { gyro_accel, .. } => gyro_accel.read_gyro_raw(),
            Chips::Lsm303L3g { gyro, .. } => gyro.read_gyro_raw(),
        }
    }

    fn read_accel_raw(&mut self) -> Result<RawVector, DriverError> {
        match self {
            Chips::Lsm6Lis3mdl { gyro_accel, .. } => gyro_accel.read_accel_raw(),
            Chips::Lsm303L3g { accel_mag, .. } => accel_mag.read_accel_raw(),
        }
    }

    fn read_mag_raw(&mut self) -> Result<RawVector, DriverError> {
        match self {
            Chips::Lsm6Lis3mdl { mag, .. } => mag.read_mag_raw(),
            Chips::Lsm303L3g { accel_mag, .. } => accel_mag.read_mag_raw(),
        }
    }
}

/// A MinIMU-9 board: chip drivers plus the calibration state needed to
/// turn their output into physical units
pub struct MinImu9<I2C> {
    chips: Chips<I2C>,
    scale: ScaleConfig,
    calibration: Option<CalibrationRecord>,
    gyro_bias: Vector3d,
}

impl<I2C: I2c> MinImu9<I2C> {
    /// Wrap already constructed chip drivers. The gyro bias starts at zero
    /// and no magnetometer calibration is installed.
    pub fn new(chips: Chips<I2C>, scale: ScaleConfig) -> Self {
        Self {
            chips,
            scale,
            calibration: None,
            gyro_bias: Vector3d::zeros(),
        }
    }

    /// Open the chips for `topology` using `open_bus` for each bus handle
    pub fn open<F, E>(topology: Topology, scale: ScaleConfig, open_bus: F) -> Result<Self, E>
    where
        F: FnMut() -> Result<I2C, E>,
    {
        Ok(Self::new(Chips::open(topology, open_bus)?, scale))
    }

    pub fn topology(&self) -> Topology {
        self.chips.topology()
    }

    /// Power up and configure every chip. Must be called before reading.
    pub fn enable(&mut self) -> ImuResult<()> {
        self.chips.enable()?;
        info!("MinIMU-9 ({}) enabled", self.topology());
        Ok(())
    }

    pub fn set_calibration(&mut self, calibration: CalibrationRecord) {
        self.calibration = Some(calibration);
    }

    pub fn calibration(&self) -> Option<&CalibrationRecord> {
        self.calibration.as_ref()
    }

    pub fn gyro_bias(&self) -> &Vector3d {
        &self.gyro_bias
    }

    /// Raw gyroscope registers with no bias or scale applied
    pub fn read_raw_gyro(&mut self) -> ImuResult<RawVector> {
        Ok(self.chips.read_gyro_raw()?)
    }

    /// Raw accelerometer registers
    pub fn read_raw_accel(&mut self) -> ImuResult<RawVector> {
        Ok(self.chips.read_accel_raw()?)
    }

    /// Raw magnetometer registers
    pub fn read_raw_mag(&mut self) -> ImuResult<RawVector> {
        Ok(self.chips.read_mag_raw()?)
    }

    /// Measure the gyroscope bias and keep it for later gyro reads.
    ///
    /// The board must be stationary. Blocks for
    /// `sample_count * sample_interval_ms`.
    pub fn measure_gyro_bias<D: DelayNs>(
        &mut self,
        delay: &mut D,
        config: &BiasConfig,
    ) -> ImuResult<Vector3d> {
        let chips = &mut self.chips;
        let bias = measure_gyro_bias(
            || -> ImuResult<RawVector> { Ok(chips.read_gyro_raw()?) },
            delay,
            config,
        )?;
        self.gyro_bias = bias;
        Ok(bias)
    }

    /// Angular rate in rad/s
    pub fn read_gyro(&mut self) -> ImuResult<Reading> {
        let raw = self.read_raw_gyro()?;
        Ok(Reading::new(
            raw,
            scale_gyro(&raw, &self.gyro_bias, self.scale.gyro_scale),
        ))
    }

    /// Acceleration in g
    pub fn read_accel(&mut self) -> ImuResult<Reading> {
        let raw = self.read_raw_accel()?;
        Ok(Reading::new(raw, scale_accel(&raw, self.scale.accel_scale)))
    }

    /// Magnetic field normalized against the installed calibration
    pub fn read_mag(&mut self) -> ImuResult<Reading> {
        let calibration = self.calibration.ok_or(ImuError::MissingCalibration)?;
        let raw = self.read_raw_mag()?;
        Ok(Reading::new(raw, normalize_mag(&raw, &calibration)))
    }

    /// Read all three sensors
    pub fn read_all(&mut self) -> ImuResult<ImuSample> {
        Ok(ImuSample {
            gyro: self.read_gyro()?,
            accel: self.read_accel()?,
            mag: self.read_mag()?,
        })
    }

    /// Give the chip drivers back
    pub fn release(self) -> Chips<I2C> {
        self.chips
    }
}
