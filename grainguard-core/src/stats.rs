//! Robust and descriptive statistics over `f64` slices
//!
//! All functions skip non-finite values (missing readings are stored as
//! `NaN`) and return `None` when too few finite values remain, so callers
//! decide how to degrade instead of receiving a silent `NaN`.
//!
//! The `*_in_place` variants reorder their input and never allocate; the
//! streaming filter uses them on a stack scratch array.

use alloc::vec::Vec;

/// Finite values of a slice, in original order
fn finite(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

fn sort(values: &mut [f64]) {
    values.sort_unstable_by(|a, b| a.total_cmp(b));
}

/// Median of a slice of finite values, sorting it in place
///
/// Even-length slices average the two middle values.
pub fn median_in_place(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    sort(values);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Median absolute deviation of finite values, reusing the slice as scratch
///
/// Raw MAD: `median(|x - median(x)|)` without the normal-consistency factor.
/// Returns `(median, mad)`.
pub fn median_and_mad_in_place(values: &mut [f64]) -> Option<(f64, f64)> {
    let center = median_in_place(values)?;
    for v in values.iter_mut() {
        *v = libm::fabs(*v - center);
    }
    let mad = median_in_place(values)?;
    Some((center, mad))
}

/// Median of the finite values of a slice
pub fn median(values: &[f64]) -> Option<f64> {
    median_in_place(&mut finite(values))
}

/// Median absolute deviation of the finite values of a slice
pub fn mad(values: &[f64]) -> Option<f64> {
    median_and_mad_in_place(&mut finite(values)).map(|(_, mad)| mad)
}

/// Percentile of the finite values using linear interpolation between
/// order statistics
///
/// `pct` is in percent (`0.0..=100.0`); values outside are clamped.
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    let mut sorted = finite(values);
    if sorted.is_empty() {
        return None;
    }
    sort(&mut sorted);

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = libm::floor(rank) as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Arithmetic mean of the finite values
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sample standard deviation (n - 1 denominator) of the finite values
///
/// Needs at least two finite values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let count = values.iter().filter(|v| v.is_finite()).count();
    if count < 2 {
        return None;
    }
    let center = mean(values)?;
    let sum_sq: f64 = values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| (v - center) * (v - center))
        .sum();
    Some(libm::sqrt(sum_sq / (count - 1) as f64))
}

/// Largest finite value
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().filter(|v| v.is_finite()).reduce(f64::max)
}

/// Smallest finite value
pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().filter(|v| v.is_finite()).reduce(f64::min)
}

/// Smallest absolute finite value
pub fn min_abs(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| libm::fabs(*v))
        .reduce(f64::min)
}

/// Largest absolute finite value
pub fn max_abs(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| libm::fabs(*v))
        .reduce(f64::max)
}
