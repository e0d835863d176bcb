/// Register-level access to a single device on an I2C bus
use embedded_hal::i2c::{Error as _, I2c};
use hal::RawVector;

use crate::DriverError;

/// Set on the register address to auto-increment over multi-byte reads
/// (LIS3MDL, LSM303D, L3GD20H)
pub const AUTO_INCREMENT: u8 = 0x80;

/// An I2C bus handle bound to one device address
pub struct RegisterBus<I2C> {
    i2c: I2C,
    address: u8,
    chip: &'static str,
}

impl<I2C: I2c> RegisterBus<I2C> {
    pub fn new(i2c: I2C, address: u8, chip: &'static str) -> Self {
        Self { i2c, address, chip }
    }

    /// 7-bit address of the device
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give the bus handle back
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn bus_error(&self, err: I2C::Error) -> DriverError {
        DriverError::Bus {
            chip: self.chip,
            address: self.address,
            kind: err.kind(),
        }
    }

    /// Read a single register
    pub fn read_reg(&mut self, reg: u8) -> Result<u8, DriverError> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg], &mut buffer)
            .map_err(|e| self.bus_error(e))?;
        Ok(buffer[0])
    }

    /// Write a single register
    pub fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), DriverError> {
        self.i2c
            .write(self.address, &[reg, value])
            .map_err(|e| self.bus_error(e))
    }

    /// Read three consecutive little-endian signed 16-bit values starting at `reg`
    pub fn read_vector(&mut self, reg: u8) -> Result<RawVector, DriverError> {
        let mut buffer = [0u8; 6];
        self.i2c
            .write_read(self.address, &[reg], &mut buffer)
            .map_err(|e| self.bus_error(e))?;

        Ok(RawVector::new(
            i16::from_le_bytes([buffer[0], buffer[1]]) as i32,
            i16::from_le_bytes([buffer[2], buffer[3]]) as i32,
            i16::from_le_bytes([buffer[4], buffer[5]]) as i32,
        ))
    }

    /// Check the identity register against one of the accepted values,
    /// returning the value found
    pub fn expect_identity(&mut self, reg: u8, accepted: &[u8]) -> Result<u8, DriverError> {
        let found = self.read_reg(reg)?;
        if accepted.contains(&found) {
            Ok(found)
        } else {
            Err(DriverError::UnexpectedDevice {
                chip: self.chip,
                address: self.address,
                expected: accepted[0],
                found,
            })
        }
    }
}
