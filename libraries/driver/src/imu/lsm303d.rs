use embedded_hal::i2c::I2c;
use hal::{AccelSensor, MagSensor, RawVector, SensorChip};
use log::debug;

use crate::register::AUTO_INCREMENT;
use crate::{DriverError, RegisterBus};

// LSM303D I2C addresses (depends on SA0 pin state)
pub const LSM303D_I2C_ADDR_SA0_HIGH: u8 = 0x1D;
pub const LSM303D_I2C_ADDR_SA0_LOW: u8 = 0x1E;

pub const LSM303D_REG_WHO_AM_I: u8 = 0x0F;
pub const LSM303D_REG_OUT_X_L_M: u8 = 0x08;
pub const LSM303D_REG_CTRL1: u8 = 0x20;
pub const LSM303D_REG_CTRL2: u8 = 0x21;
pub const LSM303D_REG_CTRL5: u8 = 0x24;
pub const LSM303D_REG_CTRL6: u8 = 0x25;
pub const LSM303D_REG_CTRL7: u8 = 0x26;
pub const LSM303D_REG_OUT_X_L_A: u8 = 0x28;

pub const LSM303D_WHO_ID: u8 = 0x49;

/// LSM303D combined accelerometer and magnetometer
pub struct Lsm303d<I2C> {
    bus: RegisterBus<I2C>,
}

impl<I2C: I2c> Lsm303d<I2C> {
    /// Create a driver at the default address (SA0 high, as on the MinIMU-9 v3)
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, LSM303D_I2C_ADDR_SA0_HIGH)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            bus: RegisterBus::new(i2c, address, "LSM303D"),
        }
    }

    pub fn release(self) -> I2C {
        self.bus.release()
    }
}

impl<I2C: I2c> SensorChip for Lsm303d<I2C> {
    type Error = DriverError;

    fn enable(&mut self) -> Result<(), DriverError> {
        self.bus.expect_identity(LSM303D_REG_WHO_AM_I, &[LSM303D_WHO_ID])?;

        // Accelerometer: 50 Hz, all axes enabled
        self.bus.write_reg(LSM303D_REG_CTRL1, 0x57)?;
        // ±8 g full scale
        self.bus.write_reg(LSM303D_REG_CTRL2, 0x18)?;
        // Magnetometer: high resolution, 6.25 Hz
        self.bus.write_reg(LSM303D_REG_CTRL5, 0x64)?;
        // ±4 gauss
        self.bus.write_reg(LSM303D_REG_CTRL6, 0x20)?;
        // Continuous conversion
        self.bus.write_reg(LSM303D_REG_CTRL7, 0x00)?;

        debug!("LSM303D enabled at 0x{:02X}", self.bus.address());
        Ok(())
    }

    fn chip_name(&self) -> &'static str {
        "LSM303D"
    }
}

impl<I2C: I2c> AccelSensor for Lsm303d<I2C> {
    fn read_accel_raw(&mut self) -> Result<RawVector, DriverError> {
        self.bus.read_vector(LSM303D_REG_OUT_X_L_A | AUTO_INCREMENT)
    }
}

impl<I2C: I2c> MagSensor for Lsm303d<I2C> {
    fn read_mag_raw(&mut self) -> Result<RawVector, DriverError> {
        self.bus.read_vector(LSM303D_REG_OUT_X_L_M | AUTO_INCREMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::tests::FakeDevice;

    #[test]
    fn test_accel_and_mag_share_one_device() {
        let device = FakeDevice::new(LSM303D_I2C_ADDR_SA0_HIGH)
            .with_reg(LSM303D_REG_WHO_AM_I, LSM303D_WHO_ID)
            .with_vector(LSM303D_REG_OUT_X_L_A, [4096, 0, 0])
            .with_vector(LSM303D_REG_OUT_X_L_M, [-500, 520, 17]);
        let mut chip = Lsm303d::new(device);

        chip.enable().expect("enable should succeed");
        assert_eq!(chip.read_accel_raw().unwrap(), RawVector::new(4096, 0, 0));
        assert_eq!(chip.read_mag_raw().unwrap(), RawVector::new(-500, 520, 17));
        assert_eq!(chip.release().writes.len(), 5);
    }
}
