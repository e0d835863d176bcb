//! Magnetometer calibration from a recording of raw readings.
//!
//! The board is turned through as many orientations as possible while raw
//! magnetometer triples are captured. A good calibration maps every
//! reading onto the unit sphere, so the fit maximises
//! `-mean((|normalize_mag(r)| - 1)^2)` with a Nelder-Mead simplex search
//! seeded from the 1st and 99th percentile of each axis.

use hal::RawVector;
use log::{debug, warn};
use nalgebra::Vector6;

use crate::calibration::{CalibrationRecord, CALIBRATION_FIELDS};
use crate::error::{ImuError, ImuResult};
use crate::scaling::normalize_mag;

/// Below this many readings the fit is unlikely to cover every orientation
pub const RECOMMENDED_READINGS: usize = 300;

/// Iteration limit for the simplex search
pub const MAX_ITERATIONS: usize = 1000;

// Nelder-Mead coefficients
const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

// Convergence tolerances on the simplex size and on the spread of costs
const X_TOLERANCE: f64 = 1e-4;
const F_TOLERANCE: f64 = 1e-4;

/// Parse captured raw readings, one per line. Only the first three
/// integers of each line are used; blank lines are skipped.
pub fn parse_readings(text: &str) -> ImuResult<Vec<RawVector>> {
    let mut readings = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().take(3).collect();
        if tokens.is_empty() {
            continue;
        }
        if tokens.len() < 3 {
            return Err(ImuError::parse(format!(
                "line {}: expected at least 3 values",
                line_no + 1
            )));
        }

        let mut axes = [0i32; 3];
        for (axis, token) in axes.iter_mut().zip(&tokens) {
            *axis = token.parse().map_err(|_| {
                ImuError::parse(format!("line {}: '{}' is not an integer", line_no + 1, token))
            })?;
        }
        readings.push(RawVector::new(axes[0], axes[1], axes[2]));
    }
    Ok(readings)
}

fn percentile(sorted: &[i32], p: f64) -> i32 {
    sorted[(p / 100.0 * (sorted.len() - 1) as f64) as usize]
}

/// Initial estimate: the 1st and 99th percentile of every axis
pub fn guess(readings: &[RawVector]) -> ImuResult<CalibrationRecord> {
    if readings.is_empty() {
        return Err(ImuError::InsufficientData {
            message: "no magnetometer readings".into(),
        });
    }

    let mut values = [0.0f32; CALIBRATION_FIELDS];
    for axis in 0..3 {
        let mut column: Vec<i32> = readings.iter().map(|r| r[axis]).collect();
        column.sort_unstable();
        values[axis * 2] = percentile(&column, 1.0) as f32;
        values[axis * 2 + 1] = percentile(&column, 99.0) as f32;
    }
    CalibrationRecord::from_values(values)
}

/// How well `cal` maps the readings onto the unit sphere. Zero is perfect;
/// larger negative values are worse.
pub fn score(cal: &CalibrationRecord, readings: &[RawVector]) -> f32 {
    if readings.is_empty() {
        return 0.0;
    }
    let total: f32 = readings
        .iter()
        .map(|r| (normalize_mag(r, cal).norm() - 1.0).powi(2))
        .sum();
    -total / readings.len() as f32
}

/// Cost minimised by the simplex search, in double precision. Bounds that
/// cannot be normalized against cost infinitely much.
fn cost(values: &Vector6<f64>, readings: &[RawVector]) -> f64 {
    for axis in 0..3 {
        if values[axis * 2 + 1] <= values[axis * 2] {
            return f64::INFINITY;
        }
    }
    let total: f64 = readings
        .iter()
        .map(|r| {
            let squared: f64 = (0..3)
                .map(|axis| {
                    let (lo, hi) = (values[axis * 2], values[axis * 2 + 1]);
                    let v = (r[axis] as f64 - lo) / (hi - lo) * 2.0 - 1.0;
                    v * v
                })
                .sum();
            (squared.sqrt() - 1.0).powi(2)
        })
        .sum();
    total / readings.len() as f64
}

fn nelder_mead<F>(f: F, start: Vector6<f64>, max_iterations: usize) -> (Vector6<f64>, usize)
where
    F: Fn(&Vector6<f64>) -> f64,
{
    const N: usize = 6;

    let mut simplex: Vec<(Vector6<f64>, f64)> = Vec::with_capacity(N + 1);
    simplex.push((start, f(&start)));
    for k in 0..N {
        let mut x = start;
        x[k] = if x[k] != 0.0 { x[k] * 1.05 } else { 0.00025 };
        simplex.push((x, f(&x)));
    }

    let mut iterations = 0;
    while iterations < max_iterations {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

        let (best_x, best_f) = simplex[0];
        let x_spread = simplex[1..]
            .iter()
            .map(|(x, _)| (x - best_x).amax())
            .fold(0.0, f64::max);
        let f_spread = simplex[1..]
            .iter()
            .map(|(_, fx)| (fx - best_f).abs())
            .fold(0.0, f64::max);
        if x_spread <= X_TOLERANCE && f_spread <= F_TOLERANCE {
            break;
        }
        iterations += 1;

        let centroid = simplex[..N]
            .iter()
            .fold(Vector6::zeros(), |acc, (x, _)| acc + x)
            / N as f64;
        let (worst_x, worst_f) = simplex[N];

        let reflected = centroid + (centroid - worst_x) * REFLECT;
        let reflected_f = f(&reflected);

        if reflected_f < best_f {
            let expanded = centroid + (centroid - worst_x) * (REFLECT * EXPAND);
            let expanded_f = f(&expanded);
            simplex[N] = if expanded_f < reflected_f {
                (expanded, expanded_f)
            } else {
                (reflected, reflected_f)
            };
            continue;
        }

        if reflected_f < simplex[N - 1].1 {
            simplex[N] = (reflected, reflected_f);
            continue;
        }

        let (contracted, limit) = if reflected_f < worst_f {
            (centroid + (reflected - centroid) * CONTRACT, reflected_f)
        } else {
            (centroid - (centroid - worst_x) * CONTRACT, worst_f)
        };
        let contracted_f = f(&contracted);
        if contracted_f <= limit {
            simplex[N] = (contracted, contracted_f);
            continue;
        }

        // Shrink every vertex towards the best one
        for vertex in simplex.iter_mut().skip(1) {
            let x = best_x + (vertex.0 - best_x) * SHRINK;
            *vertex = (x, f(&x));
        }
    }

    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
    (simplex[0].0, iterations)
}

/// Fit a calibration record to raw magnetometer readings
pub fn calibrate(readings: &[RawVector]) -> ImuResult<CalibrationRecord> {
    if readings.len() < RECOMMENDED_READINGS {
        warn!(
            "Only {} readings were provided; at least {} are recommended",
            readings.len(),
            RECOMMENDED_READINGS
        );
    }

    let initial = guess(readings)?;
    debug!(
        "Initial calibration: {} score={:.4}",
        initial,
        score(&initial, readings)
    );

    let start = Vector6::from_iterator(initial.values().iter().map(|&v| v as f64));
    let (fitted, iterations) = nelder_mead(|x| cost(x, readings), start, MAX_ITERATIONS);

    let mut values = [0.0f32; CALIBRATION_FIELDS];
    for (value, fitted) in values.iter_mut().zip(fitted.iter()) {
        *value = *fitted as f32;
    }
    let cal = CalibrationRecord::from_values(values)?;
    debug!(
        "Final calibration after {} iterations: {} score={:.4}",
        iterations,
        cal,
        score(&cal, readings)
    );

    if !is_plausible(&cal, readings) {
        warn!("The generated calibration appears to be wrong; please try again with a different data set");
    }
    Ok(cal)
}

/// False when any bound lies more than one observed range beyond the
/// observed minimum or maximum of its axis
pub fn is_plausible(cal: &CalibrationRecord, readings: &[RawVector]) -> bool {
    if readings.is_empty() {
        return false;
    }
    (0..3).all(|axis| {
        let lo = readings.iter().map(|r| r[axis]).min().unwrap_or(0) as f32;
        let hi = readings.iter().map(|r| r[axis]).max().unwrap_or(0) as f32;
        let range = hi - lo;
        cal.min()[axis] >= lo - range && cal.max()[axis] <= hi + range
    })
}
