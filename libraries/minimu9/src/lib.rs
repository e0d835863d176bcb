//! # MinIMU-9 sensor layer
//!
//! Reads a Pololu MinIMU-9 nine-axis IMU over I2C and turns raw register
//! counts into calibrated vectors:
//!
//! - angular rate in rad/s, with a measured zero-rate bias removed
//! - acceleration in g
//! - magnetic field direction normalized per axis to roughly [-1, 1]
//!   against a persisted min/max calibration
//!
//! Both board layouts are supported in one binary, selected by
//! [`Topology`] when the device is opened:
//!
//! - **v5**: LSM6DS33 gyro + accelerometer, LIS3MDL magnetometer
//! - **v3**: LSM303D accelerometer + magnetometer, L3GD20H gyro

pub mod bias;
pub mod calibration;
pub mod calibrator;
pub mod config;
pub mod device;
pub mod error;
pub mod scaling;

pub use bias::measure_gyro_bias;
pub use calibration::{load_calibration, CalibrationRecord};
pub use config::{BiasConfig, ImuConfig, ScaleConfig, ACCEL_SCALE, GYRO_SCALE};
pub use device::{Chips, MinImu9, Topology};
pub use error::{ImuError, ImuResult};
pub use hal::{ImuSample, RawVector, Reading, Vector3d};
pub use scaling::{normalize_mag, scale_accel, scale_gyro};
