use embedded_hal::i2c::I2c;
use hal::{AccelSensor, GyroSensor, RawVector, SensorChip};
use log::debug;

use crate::{DriverError, RegisterBus};

// LSM6DS33 I2C addresses (depends on SA0 pin state)
pub const LSM6_I2C_ADDR_SA0_HIGH: u8 = 0x6B;
pub const LSM6_I2C_ADDR_SA0_LOW: u8 = 0x6A;

// Register addresses
pub const LSM6_REG_WHO_AM_I: u8 = 0x0F;
pub const LSM6_REG_CTRL1_XL: u8 = 0x10;
pub const LSM6_REG_CTRL2_G: u8 = 0x11;
pub const LSM6_REG_CTRL3_C: u8 = 0x12;
pub const LSM6_REG_OUTX_L_G: u8 = 0x22;
pub const LSM6_REG_OUTX_L_XL: u8 = 0x28;

// Chip ID for verification
pub const LSM6DS33_WHO_ID: u8 = 0x69;

// ODR 1.66 kHz, full scale ±8 g
const CTRL1_XL_1660HZ_8G: u8 = 0x8C;
// ODR 1.66 kHz, full scale 2000 dps
const CTRL2_G_1660HZ_2000DPS: u8 = 0x8C;
// IF_INC: auto-increment register address on multi-byte access
const CTRL3_C_IF_INC: u8 = 0x04;

/// LSM6DS33 combined gyroscope and accelerometer
pub struct Lsm6<I2C> {
    bus: RegisterBus<I2C>,
}

impl<I2C: I2c> Lsm6<I2C> {
    /// Create a driver at the default address (SA0 high, as on the MinIMU-9 v5)
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, LSM6_I2C_ADDR_SA0_HIGH)
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            bus: RegisterBus::new(i2c, address, "LSM6DS33"),
        }
    }

    pub fn release(self) -> I2C {
        self.bus.release()
    }
}

impl<I2C: I2c> SensorChip for Lsm6<I2C> {
    type Error = DriverError;

    fn enable(&mut self) -> Result<(), DriverError> {
        self.bus.expect_identity(LSM6_REG_WHO_AM_I, &[LSM6DS33_WHO_ID])?;

        self.bus.write_reg(LSM6_REG_CTRL1_XL, CTRL1_XL_1660HZ_8G)?;
        self.bus.write_reg(LSM6_REG_CTRL2_G, CTRL2_G_1660HZ_2000DPS)?;
        self.bus.write_reg(LSM6_REG_CTRL3_C, CTRL3_C_IF_INC)?;

        debug!("LSM6DS33 enabled at 0x{:02X}", self.bus.address());
        Ok(())
    }

    fn chip_name(&self) -> &'static str {
        "LSM6DS33"
    }
}

impl<I2C: I2c> GyroSensor for Lsm6<I2C> {
    fn read_gyro_raw(&mut self) -> Result<RawVector, DriverError> {
        self.bus.read_vector(LSM6_REG_OUTX_L_G)
    }
}

impl<I2C: I2c> AccelSensor for Lsm6<I2C> {
    fn read_accel_raw(&mut self) -> Result<RawVector, DriverError> {
        self.bus.read_vector(LSM6_REG_OUTX_L_XL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::tests::FakeDevice;

    #[test]
    fn test_enable_writes_configuration() {
        let device = FakeDevice::new(LSM6_I2C_ADDR_SA0_HIGH).with_reg(LSM6_REG_WHO_AM_I, LSM6DS33_WHO_ID);
        let mut lsm6 = Lsm6::new(device);
        lsm6.enable().expect("enable should succeed");

        let device = lsm6.release();
        assert_eq!(
            device.writes,
            vec![
                (LSM6_REG_CTRL1_XL, 0x8C),
                (LSM6_REG_CTRL2_G, 0x8C),
                (LSM6_REG_CTRL3_C, 0x04),
            ]
        );
    }

    #[test]
    fn test_enable_rejects_wrong_chip() {
        let device = FakeDevice::new(LSM6_I2C_ADDR_SA0_HIGH).with_reg(LSM6_REG_WHO_AM_I, 0x00);
        let mut lsm6 = Lsm6::new(device);
        assert!(matches!(
            lsm6.enable(),
            Err(DriverError::UnexpectedDevice { chip: "LSM6DS33", .. })
        ));
    }

    #[test]
    fn test_reads_gyro_and_accel_from_separate_blocks() {
        let device = FakeDevice::new(LSM6_I2C_ADDR_SA0_HIGH)
            .with_vector(LSM6_REG_OUTX_L_G, [10, 20, -30])
            .with_vector(LSM6_REG_OUTX_L_XL, [0, 0, 4096]);
        let mut lsm6 = Lsm6::new(device);

        assert_eq!(lsm6.read_gyro_raw().unwrap(), RawVector::new(10, 20, -30));
        assert_eq!(lsm6.read_accel_raw().unwrap(), RawVector::new(0, 0, 4096));
    }
}
