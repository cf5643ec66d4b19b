// ABOUTME: Numeric primitives shared by the forecasting and hypothesis-testing components
// ABOUTME: Implements means, variances, smoothing windows, trend and seasonal extraction from scratch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics
#![allow(clippy::cast_precision_loss)] // Safe: statistical calculations with controlled ranges

//! Numeric primitives over in-memory `f64` sequences.
//!
//! Everything here is a pure function: no allocation beyond the returned
//! vectors, no I/O, no shared state. Callers are responsible for validating
//! sample sizes before calling the infallible functions; the fallible ones
//! signal their own requirements.

use crate::errors::{EngineError, EngineResult};

/// Arithmetic mean. Returns 0.0 for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divide by n). Returns 0.0 for an empty slice.
#[must_use]
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>()
        / values.len() as f64
}

/// Population standard deviation.
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Pooled standard deviation of two samples:
/// `sqrt(((nA-1)*varA + (nB-1)*varB) / (nA+nB-2))`.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientSampleSize`] unless both samples have
/// at least 2 observations (the denominator vanishes otherwise).
pub fn pooled_std_dev(a: &[f64], b: &[f64]) -> EngineResult<f64> {
    if a.len() < 2 || b.len() < 2 {
        return Err(EngineError::InsufficientSampleSize(format!(
            "pooled standard deviation needs at least 2 observations per sample, got {} and {}",
            a.len(),
            b.len()
        )));
    }

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let pooled_var =
        ((n_a - 1.0).mul_add(variance(a), (n_b - 1.0) * variance(b))) / (n_a + n_b - 2.0);
    Ok(pooled_var.sqrt())
}

/// Trailing (causal) moving average: index `i` averages
/// `values[max(0, i-window+1)..=i]`. A zero window is treated as 1.
#[must_use]
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = i.saturating_sub(window - 1);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// Coarse slope estimate: mean of the second half minus mean of the first
/// half, divided by the half-length. Not an OLS fit; the middle element of an
/// odd-length series belongs to neither half. Returns 0.0 for fewer than 2
/// values.
#[must_use]
pub fn linear_trend(values: &[f64]) -> f64 {
    let half = values.len() / 2;
    if half == 0 {
        return 0.0;
    }
    let first = mean(&values[..half]);
    let second = mean(&values[values.len() - half..]);
    (second - first) / half as f64
}

/// Additive seasonal components: for each phase `0..period`, the mean of all
/// values observed at that phase. Phase means are not centered and the series
/// is not detrended first, so each component carries the series level with it.
/// Phases with no observations contribute 0.0.
#[must_use]
pub fn seasonal_components(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return Vec::new();
    }

    let mut sums = vec![0.0_f64; period];
    let mut counts = vec![0_usize; period];
    for (i, value) in values.iter().enumerate() {
        let phase = i % period;
        sums[phase] += value;
        counts[phase] += 1;
    }

    sums.iter()
        .zip(&counts)
        .map(|(sum, &count)| if count == 0 { 0.0 } else { sum / count as f64 })
        .collect()
}

/// Median value. Returns 0.0 for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let len = sorted.len();
    if len % 2 == 0 {
        f64::midpoint(sorted[len / 2 - 1], sorted[len / 2])
    } else {
        sorted[len / 2]
    }
}

/// Detect outliers using the modified z-score over the median absolute
/// deviation. Returns the indices of values whose score exceeds `threshold`.
/// Fewer than 3 values, or a zero MAD, yields no outliers.
#[must_use]
pub fn detect_outliers(values: &[f64], threshold: f64) -> Vec<usize> {
    if values.len() < 3 {
        return Vec::new();
    }

    let med = median(values);
    let deviations: Vec<f64> = values.iter().map(|v| (v - med).abs()).collect();
    let mad = median(&deviations);

    if mad == 0.0 {
        return Vec::new(); // All values are the same
    }

    values
        .iter()
        .enumerate()
        .filter(|(_, &value)| (0.6745 * (value - med) / mad).abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_variance_of_known_sample() {
        // Classic textbook sample: mean 5, population variance 4
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&values) - 5.0).abs() < 1e-12);
        assert!((variance(&values) - 4.0).abs() < 1e-12);
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn moving_average_uses_trailing_window() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let smoothed = moving_average(&values, 3);
        assert!((smoothed[0] - 1.0).abs() < 1e-12);
        assert!((smoothed[1] - 1.5).abs() < 1e-12);
        assert!((smoothed[2] - 2.0).abs() < 1e-12);
        assert!((smoothed[3] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn linear_trend_of_linear_series() {
        // Halves [0,1] and [2,3]: (2.5 - 0.5) / 2 = 1.0
        let values = [0.0, 1.0, 2.0, 3.0];
        assert!((linear_trend(&values) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn seasonal_components_are_phase_means() {
        let values = [1.0, 10.0, 3.0, 20.0];
        let components = seasonal_components(&values, 2);
        assert!((components[0] - 2.0).abs() < 1e-12);
        assert!((components[1] - 15.0).abs() < 1e-12);
    }

    #[test]
    fn pooled_std_dev_rejects_tiny_samples() {
        let result = pooled_std_dev(&[1.0], &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(crate::errors::EngineError::InsufficientSampleSize(_))
        ));
    }

    #[test]
    fn outlier_detection_flags_extreme_value() {
        let values = [10.0, 10.5, 9.8, 10.2, 55.0, 10.1];
        let outliers = detect_outliers(&values, 3.5);
        assert_eq!(outliers, vec![4]);
    }
}
