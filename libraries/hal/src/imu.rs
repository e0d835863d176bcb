/// Capability traits implemented by the individual IMU chip drivers
use crate::types::RawVector;

/// A chip on the sensor bus that must be powered up before use
pub trait SensorChip {
    /// Error reported by the chip's transport
    type Error;

    /// Issue the chip's power-up and configuration sequence
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Human readable part number, used in diagnostics
    fn chip_name(&self) -> &'static str;
}

/// Chip that measures angular rate
pub trait GyroSensor: SensorChip {
    /// Read the raw gyroscope output registers
    fn read_gyro_raw(&mut self) -> Result<RawVector, Self::Error>;
}

/// Chip that measures linear acceleration
pub trait AccelSensor: SensorChip {
    /// Read the raw accelerometer output registers
    fn read_accel_raw(&mut self) -> Result<RawVector, Self::Error>;
}

/// Chip that measures the magnetic field
pub trait MagSensor: SensorChip {
    /// Read the raw magnetometer output registers
    fn read_mag_raw(&mut self) -> Result<RawVector, Self::Error>;
}
