use std::io;
use std::path::PathBuf;

use driver::DriverError;
use thiserror::Error;

/// Primary error type for the MinIMU-9 crate
#[derive(Error, Debug)]
pub enum ImuError {
    /// Bus open, read or write failure at the chip-driver boundary
    #[error("Transport error: {0}")]
    Transport(#[from] DriverError),

    /// Calibration file missing or unreadable
    #[error("Failed to open calibration file {}: {source}", path.display())]
    FileAccess {
        /// File that could not be opened
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Calibration data is not exactly six valid numbers
    #[error("Failed to parse calibration: {message}")]
    Parse {
        /// Detailed error message
        message: String,
    },

    /// A calibration axis whose bounds cannot be normalized against
    #[error("Invalid calibration for axis {axis}: max {max} must be greater than min {min}")]
    InvalidCalibration {
        /// Axis index (0, 1 or 2)
        axis: usize,
        min: f32,
        max: f32,
    },

    /// Magnetometer read attempted before a calibration was installed
    #[error("Magnetometer calibration has not been loaded")]
    MissingCalibration,

    /// Not enough input to compute a result
    #[error("Insufficient data: {message}")]
    InsufficientData {
        /// Detailed error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message
        message: String,
        /// Configuration parameter that caused the error
        parameter: Option<String>,
    },
}

impl ImuError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        ImuError::Parse {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>, parameter: Option<&str>) -> Self {
        ImuError::Configuration {
            message: message.into(),
            parameter: parameter.map(|p| p.to_string()),
        }
    }
}

/// Type alias for Result with ImuError
pub type ImuResult<T> = Result<T, ImuError>;
