use std::f32::consts::PI;

use crate::device::Topology;

/// Accelerometer sensitivity in g per LSB: 0.244 mg/LSB for a 16-bit
/// reading at ±8 g full scale
pub const ACCEL_SCALE: f32 = 0.000244;

/// Gyroscope sensitivity in rad/s per LSB: 70 mdps/LSB at ±2000 dps
/// full scale
pub const GYRO_SCALE: f32 = 0.07 * PI / 180.0;

/// Default number of samples averaged for the gyroscope bias
pub const DEFAULT_BIAS_SAMPLES: u32 = 32;

/// Default pause between gyroscope bias samples in milliseconds
pub const DEFAULT_BIAS_INTERVAL_MS: u32 = 20;

/// Per-LSB scale factors for the configured chip family
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleConfig {
    /// g per accelerometer LSB
    pub accel_scale: f32,

    /// rad/s per gyroscope LSB
    pub gyro_scale: f32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            accel_scale: ACCEL_SCALE,
            gyro_scale: GYRO_SCALE,
        }
    }
}

/// Sampling parameters for the gyroscope bias measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiasConfig {
    /// Number of raw samples averaged
    pub sample_count: u32,

    /// Pause after each sample in milliseconds
    pub sample_interval_ms: u32,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_BIAS_SAMPLES,
            sample_interval_ms: DEFAULT_BIAS_INTERVAL_MS,
        }
    }
}

/// Configuration for a MinIMU-9 device
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuConfig {
    /// Which chip pair is fitted
    pub topology: Topology,

    /// Scale factors
    pub scale: ScaleConfig,

    /// Gyroscope bias sampling
    pub bias: BiasConfig,
}
