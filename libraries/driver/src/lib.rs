//! Blocking I2C drivers for the ST inertial sensors found on Pololu
//! MinIMU-9 boards.
//!
//! Every driver is generic over an `embedded_hal::i2c::I2c` bus, so the
//! same code runs against a Linux `/dev/i2c-N` handle or a test double.

mod error;
mod register;

pub mod imu;

pub use error::DriverError;
pub use imu::{L3g, Lis3mdl, Lsm303d, Lsm6};
pub use register::RegisterBus;
