//! Conversions from raw register counts to physical units.

use hal::{RawVector, Vector3d};

use crate::calibration::CalibrationRecord;

fn to_float(raw: &RawVector) -> Vector3d {
    raw.map(|v| v as f32)
}

/// Accelerometer counts to g. No offset is removed.
pub fn scale_accel(raw: &RawVector, accel_scale: f32) -> Vector3d {
    to_float(raw) * accel_scale
}

/// Gyroscope counts to rad/s after removing the zero-rate bias
pub fn scale_gyro(raw: &RawVector, bias: &Vector3d, gyro_scale: f32) -> Vector3d {
    (to_float(raw) - bias) * gyro_scale
}

/// Map each magnetometer axis from its calibrated [min, max] range onto
/// [-1, 1]. Readings outside the calibrated range land outside [-1, 1].
pub fn normalize_mag(raw: &RawVector, cal: &CalibrationRecord) -> Vector3d {
    Vector3d::from_fn(|i, _| {
        let (min, max) = (cal.min()[i], cal.max()[i]);
        (raw[i] as f32 - min) / (max - min) * 2.0 - 1.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ACCEL_SCALE, GYRO_SCALE};

    fn calibration() -> CalibrationRecord {
        CalibrationRecord::new(
            Vector3d::new(-500.0, -480.0, -510.0),
            Vector3d::new(500.0, 520.0, 490.0),
        )
        .expect("valid calibration")
    }

    #[test]
    fn test_normalize_mag_bounds_map_to_unit() {
        let cal = calibration();
        let at_min = normalize_mag(&RawVector::new(-500, -480, -510), &cal);
        let at_max = normalize_mag(&RawVector::new(500, 520, 490), &cal);

        assert_eq!(at_min, Vector3d::new(-1.0, -1.0, -1.0));
        assert_eq!(at_max, Vector3d::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_normalize_mag_axes_are_independent() {
        let cal = calibration();
        let v = normalize_mag(&RawVector::new(-500, 520, 0), &cal);
        assert_eq!(v.x, -1.0);
        assert_eq!(v.y, 1.0);
        assert!((v.z - 0.02).abs() < 1e-6, "z should be 0.02, got {}", v.z);
    }

    #[test]
    fn test_normalize_mag_is_monotonic() {
        let cal = calibration();
        let mut previous = f32::NEG_INFINITY;
        for raw in (-2000..=2000).step_by(37) {
            let v = normalize_mag(&RawVector::new(raw, 0, 0), &cal);
            assert!(v.x > previous, "normalization must increase with raw value");
            previous = v.x;
        }
    }

    #[test]
    fn test_normalize_mag_out_of_range_is_not_clamped() {
        let cal = calibration();
        let v = normalize_mag(&RawVector::new(1500, -1480, 0), &cal);
        assert!((v.x - 3.0).abs() < 1e-6);
        assert!((v.y + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_accel_one_g() {
        let v = scale_accel(&RawVector::new(4096, 0, 0), ACCEL_SCALE);
        assert!((v.x - 1.0).abs() < 1e-3, "4096 LSB should be about 1 g, got {}", v.x);
        assert_eq!(v.y, 0.0);
        assert_eq!(v.z, 0.0);
    }

    #[test]
    fn test_scale_accel_is_linear() {
        assert_eq!(scale_accel(&RawVector::zeros(), ACCEL_SCALE), Vector3d::zeros());

        let raw = RawVector::new(123, -456, 789);
        let base = scale_accel(&raw, ACCEL_SCALE);
        for k in [-3, 2, 5] {
            let scaled = scale_accel(&(raw * k), ACCEL_SCALE);
            assert!((scaled - base * k as f32).norm() < 1e-4);
        }
    }

    #[test]
    fn test_scale_gyro_removes_bias() {
        let bias = Vector3d::new(12.0, -7.0, 3.0);
        let v = scale_gyro(&RawVector::new(12, -7, 3), &bias, GYRO_SCALE);
        assert_eq!(v, Vector3d::zeros());
    }

    #[test]
    fn test_scale_gyro_zero_reading_zero_bias() {
        for scale in [GYRO_SCALE, 1.0, 1234.5] {
            let v = scale_gyro(&RawVector::zeros(), &Vector3d::zeros(), scale);
            assert_eq!(v.norm(), 0.0);
        }
    }

    #[test]
    fn test_scale_gyro_full_scale() {
        // 2000 dps / 0.07 dps per LSB
        let v = scale_gyro(&RawVector::new(28571, 0, 0), &Vector3d::zeros(), GYRO_SCALE);
        assert!((v.x.to_degrees() - 2000.0).abs() < 0.1, "got {} dps", v.x.to_degrees());
    }
}
