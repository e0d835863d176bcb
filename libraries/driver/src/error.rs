use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

/// Errors raised by the chip drivers
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// The bus transfer itself failed
    #[error("I2C transfer to {chip} at 0x{address:02X} failed: {kind:?}")]
    Bus {
        /// Chip being addressed
        chip: &'static str,
        /// 7-bit device address
        address: u8,
        /// Failure reported by the bus implementation
        kind: ErrorKind,
    },

    /// The device answered but its identity register did not match
    #[error("{chip} at 0x{address:02X} reported WHO_AM_I 0x{found:02X}, expected 0x{expected:02X}")]
    UnexpectedDevice {
        /// Chip that was expected
        chip: &'static str,
        /// 7-bit device address
        address: u8,
        /// Identity value the driver expected
        expected: u8,
        /// Identity value the device returned
        found: u8,
    },
}
