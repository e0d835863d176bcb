use embedded_hal::i2c::I2c;
use hal::{MagSensor, RawVector, SensorChip};
use log::debug;

use crate::register::AUTO_INCREMENT;
use crate::{DriverError, RegisterBus};

// LIS3MDL I2C addresses (depends on SA1 pin state)
pub const LIS3MDL_I2C_ADDR_SA1_HIGH: u8 = 0x1E;
pub const LIS3MDL_I2C_ADDR_SA1_LOW: u8 = 0x1C;

pub const LIS3MDL_REG_WHO_AM_I: u8 = 0x0F;
pub const LIS3MDL_REG_CTRL_REG1: u8 = 0x20;
pub const LIS3MDL_REG_CTRL_REG2: u8 = 0x21;
pub const LIS3MDL_REG_CTRL_REG3: u8 = 0x22;
pub const LIS3MDL_REG_CTRL_REG4: u8 = 0x23;
pub const LIS3MDL_REG_OUT_X_L: u8 = 0x28;

pub const LIS3MDL_WHO_ID: u8 = 0x3D;

/// LIS3MDL three-axis magnetometer
pub struct Lis3mdl<I2C> {
    bus: RegisterBus<I2C>,
}

impl<I2C: I2c> Lis3mdl<I2C> {
    /// Create a driver at the default address (SA1 high, as on the MinIMU-9 v5)
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, LIS3MDL_I2C_ADDR_SA1_HIGH)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            bus: RegisterBus::new(i2c, address, "LIS3MDL"),
        }
    }

    pub fn release(self) -> I2C {
        self.bus.release()
    }
}

impl<I2C: I2c> SensorChip for Lis3mdl<I2C> {
    type Error = DriverError;

    fn enable(&mut self) -> Result<(), DriverError> {
        self.bus.expect_identity(LIS3MDL_REG_WHO_AM_I, &[LIS3MDL_WHO_ID])?;

        // Ultra-high-performance X/Y, 10 Hz ODR
        self.bus.write_reg(LIS3MDL_REG_CTRL_REG1, 0x70)?;
        // ±4 gauss
        self.bus.write_reg(LIS3MDL_REG_CTRL_REG2, 0x00)?;
        // Continuous conversion
        self.bus.write_reg(LIS3MDL_REG_CTRL_REG3, 0x00)?;
        // Ultra-high-performance Z
        self.bus.write_reg(LIS3MDL_REG_CTRL_REG4, 0x0C)?;

        debug!("LIS3MDL enabled at 0x{:02X}", self.bus.address());
        Ok(())
    }

    fn chip_name(&self) -> &'static str {
        "LIS3MDL"
    }
}

impl<I2C: I2c> MagSensor for Lis3mdl<I2C> {
    fn read_mag_raw(&mut self) -> Result<RawVector, DriverError> {
        self.bus.read_vector(LIS3MDL_REG_OUT_X_L | AUTO_INCREMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::tests::FakeDevice;

    #[test]
    fn test_enable_and_read() {
        let device = FakeDevice::new(LIS3MDL_I2C_ADDR_SA1_HIGH)
            .with_reg(LIS3MDL_REG_WHO_AM_I, LIS3MDL_WHO_ID)
            .with_vector(LIS3MDL_REG_OUT_X_L, [-1200, 300, 4500]);
        let mut mag = Lis3mdl::new(device);

        mag.enable().expect("enable should succeed");
        assert_eq!(mag.read_mag_raw().unwrap(), RawVector::new(-1200, 300, 4500));

        let device = mag.release();
        assert_eq!(device.writes.len(), 4, "four control registers are written");
        assert_eq!(device.writes[0], (LIS3MDL_REG_CTRL_REG1, 0x70));
    }

    #[test]
    fn test_alternate_address() {
        let device = FakeDevice::new(LIS3MDL_I2C_ADDR_SA1_LOW).with_reg(LIS3MDL_REG_WHO_AM_I, LIS3MDL_WHO_ID);
        let mut mag = Lis3mdl::with_address(device, LIS3MDL_I2C_ADDR_SA1_LOW);
        assert!(mag.enable().is_ok());
    }
}
