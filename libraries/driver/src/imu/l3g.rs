use embedded_hal::i2c::I2c;
use hal::{GyroSensor, RawVector, SensorChip};
use log::debug;

use crate::register::AUTO_INCREMENT;
use crate::{DriverError, RegisterBus};

// L3GD20H / L3GD20 I2C addresses (depends on SA0 pin state)
pub const L3G_I2C_ADDR_SA0_HIGH: u8 = 0x6B;
pub const L3G_I2C_ADDR_SA0_LOW: u8 = 0x6A;

pub const L3G_REG_WHO_AM_I: u8 = 0x0F;
pub const L3G_REG_CTRL1: u8 = 0x20;
pub const L3G_REG_CTRL4: u8 = 0x23;
pub const L3G_REG_OUT_X_L: u8 = 0x28;
pub const L3G_REG_LOW_ODR: u8 = 0x39;

pub const L3GD20H_WHO_ID: u8 = 0xD7;
pub const L3GD20_WHO_ID: u8 = 0xD4;

/// L3GD20H (or the older L3GD20) three-axis gyroscope
pub struct L3g<I2C> {
    bus: RegisterBus<I2C>,
    /// Identity found at enable time, None before
    variant: Option<u8>,
}

impl<I2C: I2c> L3g<I2C> {
    /// Create a driver at the default address (SA0 high, as on the MinIMU-9 v3)
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, L3G_I2C_ADDR_SA0_HIGH)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            bus: RegisterBus::new(i2c, address, "L3GD20H"),
            variant: None,
        }
    }

    pub fn release(self) -> I2C {
        self.bus.release()
    }
}

impl<I2C: I2c> SensorChip for L3g<I2C> {
    type Error = DriverError;

    fn enable(&mut self) -> Result<(), DriverError> {
        let id = self
            .bus
            .expect_identity(L3G_REG_WHO_AM_I, &[L3GD20H_WHO_ID, L3GD20_WHO_ID])?;
        self.variant = Some(id);

        // Low-ODR mode off; the register only exists on the L3GD20H
        if id == L3GD20H_WHO_ID {
            self.bus.write_reg(L3G_REG_LOW_ODR, 0x00)?;
        }
        // ±2000 dps full scale
        self.bus.write_reg(L3G_REG_CTRL4, 0x20)?;
        // Normal power mode, all axes, 189.4 Hz ODR
        self.bus.write_reg(L3G_REG_CTRL1, 0x6F)?;

        debug!("{} enabled at 0x{:02X}", self.chip_name(), self.bus.address());
        Ok(())
    }

    fn chip_name(&self) -> &'static str {
        match self.variant {
            Some(L3GD20_WHO_ID) => "L3GD20",
            _ => "L3GD20H",
        }
    }
}

impl<I2C: I2c> GyroSensor for L3g<I2C> {
    fn read_gyro_raw(&mut self) -> Result<RawVector, DriverError> {
        self.bus.read_vector(L3G_REG_OUT_X_L | AUTO_INCREMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::tests::FakeDevice;

    #[test]
    fn test_l3gd20h_enable_sequence() {
        let device = FakeDevice::new(L3G_I2C_ADDR_SA0_HIGH).with_reg(L3G_REG_WHO_AM_I, L3GD20H_WHO_ID);
        let mut gyro = L3g::new(device);
        gyro.enable().expect("enable should succeed");
        assert_eq!(gyro.chip_name(), "L3GD20H");

        let device = gyro.release();
        assert_eq!(
            device.writes,
            vec![(L3G_REG_LOW_ODR, 0x00), (L3G_REG_CTRL4, 0x20), (L3G_REG_CTRL1, 0x6F)]
        );
    }

    #[test]
    fn test_l3gd20_skips_low_odr() {
        let device = FakeDevice::new(L3G_I2C_ADDR_SA0_HIGH)
            .with_reg(L3G_REG_WHO_AM_I, L3GD20_WHO_ID)
            .with_vector(L3G_REG_OUT_X_L, [7, -7, 0]);
        let mut gyro = L3g::new(device);
        gyro.enable().expect("enable should succeed");
        assert_eq!(gyro.chip_name(), "L3GD20");
        assert_eq!(gyro.read_gyro_raw().unwrap(), RawVector::new(7, -7, 0));
        assert!(!gyro.release().writes.iter().any(|(reg, _)| *reg == L3G_REG_LOW_ODR));
    }
}
