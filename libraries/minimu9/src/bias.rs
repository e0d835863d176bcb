//! Gyroscope zero-rate bias estimation.

use embedded_hal::delay::DelayNs;
use hal::{RawVector, Vector3d};
use log::debug;

use crate::config::BiasConfig;
use crate::error::ImuError;

/// Average `config.sample_count` raw gyroscope readings, pausing
/// `config.sample_interval_ms` after each one.
///
/// The device must be held still for the whole measurement. With the
/// default configuration this blocks for about 640 ms. The sample source
/// and the delay are injected so the procedure can run against recorded
/// data without waiting.
pub fn measure_gyro_bias<F, E, D>(
    mut read_raw: F,
    delay: &mut D,
    config: &BiasConfig,
) -> Result<Vector3d, E>
where
    F: FnMut() -> Result<RawVector, E>,
    E: From<ImuError>,
    D: DelayNs,
{
    if config.sample_count == 0 {
        return Err(ImuError::config(
            "gyro bias needs at least one sample",
            Some("sample_count"),
        )
        .into());
    }

    let mut sum = Vector3d::zeros();
    for _ in 0..config.sample_count {
        let raw = read_raw()?;
        sum += raw.map(|v| v as f32);
        delay.delay_ms(config.sample_interval_ms);
    }

    let bias = sum / config.sample_count as f32;
    debug!(
        "Gyro bias from {} samples: ({:.2}, {:.2}, {:.2})",
        config.sample_count, bias.x, bias.y, bias.z
    );
    Ok(bias)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ImuResult;

    /// Delay that returns immediately but remembers how long it was asked to wait
    #[derive(Default)]
    pub struct NoopDelay {
        pub total_ns: u64,
    }

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn test_constant_stream_returns_sample() {
        let sample = RawVector::new(-17, 42, 3);
        let mut delay = NoopDelay::default();
        let bias: Vector3d =
            measure_gyro_bias(|| ImuResult::Ok(sample), &mut delay, &BiasConfig::default())
                .expect("bias should be measured");

        assert_eq!(bias, Vector3d::new(-17.0, 42.0, 3.0));
    }

    #[test]
    fn test_mean_of_varying_samples() {
        let mut samples = vec![RawVector::new(0, 10, -4), RawVector::new(2, 20, -8)].into_iter();
        let config = BiasConfig {
            sample_count: 2,
            sample_interval_ms: 5,
        };
        let mut delay = NoopDelay::default();
        let bias = measure_gyro_bias(
            || samples.next().ok_or(ImuError::parse("exhausted")),
            &mut delay,
            &config,
        )
        .unwrap();

        assert_eq!(bias, Vector3d::new(1.0, 15.0, -6.0));
    }

    #[test]
    fn test_waits_between_every_sample() {
        let mut calls = 0;
        let mut delay = NoopDelay::default();
        measure_gyro_bias(
            || {
                calls += 1;
                ImuResult::Ok(RawVector::zeros())
            },
            &mut delay,
            &BiasConfig::default(),
        )
        .unwrap();

        assert_eq!(calls, 32);
        assert_eq!(delay.total_ns, 32 * 20 * 1_000_000, "expected 640 ms of pauses");
    }

    #[test]
    fn test_read_failure_aborts() {
        let mut calls = 0;
        let mut delay = NoopDelay::default();
        let result = measure_gyro_bias(
            || {
                calls += 1;
                if calls == 3 {
                    Err(ImuError::MissingCalibration)
                } else {
                    Ok(RawVector::zeros())
                }
            },
            &mut delay,
            &BiasConfig::default(),
        );

        assert!(result.is_err());
        assert_eq!(calls, 3, "no samples are taken after a failure");
    }

    #[test]
    fn test_zero_samples_is_config_error() {
        let config = BiasConfig {
            sample_count: 0,
            sample_interval_ms: 20,
        };
        let mut delay = NoopDelay::default();
        let result = measure_gyro_bias(|| ImuResult::Ok(RawVector::zeros()), &mut delay, &config);
        assert!(matches!(result, Err(ImuError::Configuration { .. })));
    }
}
