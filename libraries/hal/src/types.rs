/// Common data types for the sensor abstraction
pub use nalgebra::Vector3;

/// 3D vector of physical quantities using nalgebra
pub type Vector3d = Vector3<f32>;

/// Raw sensor register triple, one signed count per axis
pub type RawVector = Vector3<i32>;

/// A single sensor reading: the register counts it came from and the
/// calibrated value derived from them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Raw register counts as read from the chip
    pub raw: RawVector,

    /// Calibrated value in the sensor's physical unit
    pub value: Vector3d,
}

impl Reading {
    pub fn new(raw: RawVector, value: Vector3d) -> Self {
        Self { raw, value }
    }
}

/// One reading of all three sensors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSample {
    /// Angular rate in rad/s
    pub gyro: Reading,

    /// Acceleration in g
    pub accel: Reading,

    /// Normalized magnetic field direction, roughly within [-1, 1] per axis
    pub mag: Reading,
}
