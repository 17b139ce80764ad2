//! Derived-value calculators.
//!
//! Pure functions of the current readings. Results are never stored in the
//! live record; they are only mirrored into the submitted payload when the
//! user has not entered an explicit override.

use crate::trials::{Reading, TrialArray};

/// Slack applied before rounding up so float noise such as
/// `95.00000000000001` does not ceil to 96.
const CEIL_TOLERANCE: f64 = 1e-9;

fn ceil_tolerant(value: f64) -> f64 {
    (value - CEIL_TOLERANCE).ceil()
}

/// Rounds `value` to `decimals` decimal places (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Sand equivalent of one trial: `ceil(100 * sand / clay)`.
///
/// `None` when either reading is missing or the clay reading is not
/// strictly positive.
pub fn sand_equivalent(clay: Reading, sand: Reading) -> Option<f64> {
    match (clay, sand) {
        (Some(clay), Some(sand)) if clay > 0.0 => Some(ceil_tolerant(100.0 * sand / clay)),
        _ => None,
    }
}

/// Per-trial sand equivalents, index-aligned with the readings.
pub fn sand_equivalent_trials<const N: usize>(
    clay: &TrialArray<N>,
    sand: &TrialArray<N>,
) -> [Option<f64>; N] {
    std::array::from_fn(|i| sand_equivalent(clay.get(i), sand.get(i)))
}

/// Ceiling of the mean of the non-null trial results.
///
/// Rounding happens once, after averaging. `None` if no trial produced a
/// result.
pub fn sand_equivalent_average(results: &[Option<f64>]) -> Option<f64> {
    let valid: Vec<f64> = results.iter().flatten().copied().collect();
    if valid.is_empty() {
        return None;
    }
    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    Some(ceil_tolerant(mean))
}

/// Sum of retained sieve masses (missing slots count as zero), 3 decimals.
pub fn total_retained_mass(masses: &[Reading]) -> f64 {
    round_to(masses.iter().map(|m| m.unwrap_or(0.0)).sum(), 3)
}

/// Percentage of mass lost during sieving, 4 decimals.
///
/// `((before - after) / before) * 100`, or `None` when either mass is missing
/// or `before` is zero.
pub fn sieving_error(before: Reading, after: Reading) -> Option<f64> {
    match (before, after) {
        (Some(before), Some(after)) if before != 0.0 => {
            Some(round_to((before - after) / before * 100.0, 4))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_tolerant_absorbs_float_noise() {
        assert_eq!(ceil_tolerant(95.000_000_000_01), 95.0);
        assert_eq!(ceil_tolerant(95.01), 96.0);
    }

    #[test]
    fn round_to_decimals() {
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(0.95, 4), 0.95);
    }
}
