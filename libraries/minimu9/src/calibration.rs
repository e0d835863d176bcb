//! Persisted magnetometer calibration.
//!
//! The file holds six numbers separated by any whitespace, in the order
//! `min_x max_x min_y max_y min_z max_z`. Nothing else is allowed.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use hal::Vector3d;
use log::{debug, info};

use crate::error::{ImuError, ImuResult};

/// Number of values in a calibration record
pub const CALIBRATION_FIELDS: usize = 6;

/// Per-axis magnetometer bounds observed while the device was rotated
/// through every orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationRecord {
    min: Vector3d,
    max: Vector3d,
}

impl CalibrationRecord {
    /// Create a record, checking that every axis has `max > min`
    pub fn new(min: Vector3d, max: Vector3d) -> ImuResult<Self> {
        for axis in 0..3 {
            let (lo, hi) = (min[axis], max[axis]);
            if !lo.is_finite() || !hi.is_finite() || hi <= lo {
                return Err(ImuError::InvalidCalibration {
                    axis,
                    min: lo,
                    max: hi,
                });
            }
        }
        Ok(Self { min, max })
    }

    /// Build from the six values in file order
    pub fn from_values(values: [f32; CALIBRATION_FIELDS]) -> ImuResult<Self> {
        Self::new(
            Vector3d::new(values[0], values[2], values[4]),
            Vector3d::new(values[1], values[3], values[5]),
        )
    }

    /// The six values in file order
    pub fn values(&self) -> [f32; CALIBRATION_FIELDS] {
        [
            self.min.x, self.max.x, self.min.y, self.max.y, self.min.z, self.max.z,
        ]
    }

    /// Lower bound per axis
    pub fn min(&self) -> &Vector3d {
        &self.min
    }

    /// Upper bound per axis
    pub fn max(&self) -> &Vector3d {
        &self.max
    }

    /// Write the record to `path` in the calibration file format.
    ///
    /// Values are written at full precision, unlike `Display`, so a saved
    /// record always loads back unchanged.
    pub fn save(&self, path: &Path) -> ImuResult<()> {
        let line = self
            .values()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        fs::write(path, format!("{}\n", line)).map_err(|source| ImuError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved magnetometer calibration to {}", path.display());
        Ok(())
    }
}

impl FromStr for CalibrationRecord {
    type Err = ImuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.len() != CALIBRATION_FIELDS {
            return Err(ImuError::parse(format!(
                "expected {} numbers, found {}",
                CALIBRATION_FIELDS,
                tokens.len()
            )));
        }

        let mut values = [0.0f32; CALIBRATION_FIELDS];
        for (value, token) in values.iter_mut().zip(&tokens) {
            *value = token
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ImuError::parse(format!("'{}' is not a number", token)))?;
        }

        Self::from_values(values)
    }
}

/// Six values truncated to integers, separated by single spaces
impl fmt::Display for CalibrationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.values();
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", v.trunc() as i64)?;
        }
        Ok(())
    }
}

/// Load the calibration record stored at `path`.
///
/// Resolving `~` or other shell syntax is the caller's job.
pub fn load_calibration(path: &Path) -> ImuResult<CalibrationRecord> {
    let bytes = fs::read(path).map_err(|source| ImuError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = std::str::from_utf8(&bytes)
        .map_err(|_| ImuError::parse(format!("{}: not a text file", path.display())))?;

    let record = contents.parse::<CalibrationRecord>().map_err(|err| match err {
        ImuError::Parse { message } => {
            ImuError::parse(format!("{}: {}", path.display(), message))
        }
        other => other,
    })?;

    debug!("Loaded magnetometer calibration {} from {}", record, path.display());
    Ok(record)
}
