// ABOUTME: Two-sample hypothesis testing kit with effect-size and power estimation
// ABOUTME: Implements t/z/chi-square statistics, Cohen's d, Cramer's V, and normal-approximation power
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics
#![allow(clippy::cast_precision_loss)] // Safe: sample sizes are small integers

//! Two-sample significance testing.
//!
//! The kit exposes the raw statistics for callers that want them and a single
//! [`statistical_test`] entry point that the dashboard consumes: statistic,
//! two-tailed p-value, significance verdict at the requested confidence,
//! standardized effect size, and post-hoc power.

use crate::distributions::{
    chi_square_p_value, inverse_normal_cdf, normal_cdf, p_value_from_t, p_value_from_z,
};
use crate::errors::{EngineError, EngineResult};
use crate::statistics::{mean, pooled_std_dev, variance};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hypothesis test selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestType {
    /// Pooled-variance two-sample t-test
    TTest,
    /// Two-sample z-test with per-sample standard deviations
    ZTest,
    /// Chi-square goodness-of-fit over observed/expected frequencies
    ChiSquare,
}

/// Outcome of a hypothesis test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticalTestResult {
    /// Which test produced this result
    pub test_type: TestType,
    /// Two-tailed p-value in `[0, 1]`
    pub p_value: f64,
    /// Whether the p-value beats `1 - confidence_level`
    pub is_significant: bool,
    /// Standardized effect size (Cohen's d, or Cramer's V for chi-square)
    pub effect_size: f64,
    /// Combined number of observations across both inputs
    pub sample_size: usize,
    /// Post-hoc statistical power in `[0, 1]`
    pub power: f64,
}

/// Pooled-variance two-sample t statistic. Identical constant samples
/// collapse to 0 rather than NaN.
///
/// # Errors
///
/// Returns [`EngineError::DegenerateSample`] when either sample has fewer
/// than 2 observations.
pub fn t_statistic(a: &[f64], b: &[f64]) -> EngineResult<f64> {
    require_two_observations(a, b)?;

    let pooled = pooled_std_dev(a, b)?;
    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let se = pooled * (1.0 / n_a + 1.0 / n_b).sqrt();
    if se == 0.0 {
        return Ok(0.0);
    }
    Ok((mean(a) - mean(b)) / se)
}

/// Two-sample z statistic with per-sample (population) variances:
/// `se = sqrt(varA/nA + varB/nB)`. Zero standard error collapses to 0.
///
/// # Errors
///
/// Returns [`EngineError::DegenerateSample`] when either sample has fewer
/// than 2 observations.
pub fn z_statistic(a: &[f64], b: &[f64]) -> EngineResult<f64> {
    require_two_observations(a, b)?;

    let se = (variance(a) / a.len() as f64 + variance(b) / b.len() as f64).sqrt();
    if se == 0.0 {
        return Ok(0.0);
    }
    Ok((mean(a) - mean(b)) / se)
}

/// Chi-square goodness-of-fit statistic: `sum((O - E)^2 / E)`.
///
/// # Errors
///
/// - [`EngineError::MismatchedLengths`] when the vectors differ in length
/// - [`EngineError::DegenerateSample`] when fewer than 2 categories are
///   supplied or any expected frequency is not positive
pub fn chi_square_statistic(observed: &[f64], expected: &[f64]) -> EngineResult<f64> {
    if observed.len() != expected.len() {
        return Err(EngineError::MismatchedLengths {
            observed: observed.len(),
            expected: expected.len(),
        });
    }
    require_two_observations(observed, expected)?;
    if expected.iter().any(|&e| e <= 0.0) {
        return Err(EngineError::DegenerateSample(
            "expected frequencies must all be positive".into(),
        ));
    }

    Ok(observed
        .iter()
        .zip(expected)
        .map(|(&o, &e)| {
            let diff = o - e;
            diff * diff / e
        })
        .sum())
}

/// Cohen's d standardized mean difference:
/// `|mean(a) - mean(b)| / pooled_std_dev`. Zero pooled deviation yields 0.
///
/// # Errors
///
/// Returns [`EngineError::InsufficientSampleSize`] when either sample has
/// fewer than 2 observations.
pub fn cohens_d(a: &[f64], b: &[f64]) -> EngineResult<f64> {
    let pooled = pooled_std_dev(a, b)?;
    if pooled == 0.0 {
        return Ok(0.0);
    }
    Ok((mean(a) - mean(b)).abs() / pooled)
}

/// Cramer's V association measure for frequency vectors:
/// `sqrt(chi2 / (n * (min(kO, kE) - 1)))` with `n = sum(observed)`.
///
/// # Errors
///
/// Propagates the validation errors of [`chi_square_statistic`].
pub fn cramers_v(observed: &[f64], expected: &[f64]) -> EngineResult<f64> {
    let chi_square = chi_square_statistic(observed, expected)?;
    let n: f64 = observed.iter().sum();
    if n <= 0.0 {
        return Ok(0.0);
    }
    let k = observed.len().min(expected.len()) as f64;
    Ok((chi_square / (n * (k - 1.0))).sqrt())
}

/// Post-hoc power of a two-sample design at per-group size `n`, effect size
/// `effect_size`, and two-tailed significance level `alpha`:
/// `normal_cdf(d * sqrt(n/2) - z_{1 - alpha/2})`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidProbability`] when `1 - alpha/2` leaves the
/// open unit interval.
pub fn statistical_power(n: usize, effect_size: f64, alpha: f64) -> EngineResult<f64> {
    let critical = inverse_normal_cdf(1.0 - alpha / 2.0)?;
    let shift = effect_size * (n as f64 / 2.0).sqrt();
    Ok(normal_cdf(shift - critical).clamp(0.0, 1.0))
}

/// Run the selected two-sample test and assemble the full verdict.
///
/// For [`TestType::ChiSquare`] the samples are interpreted as observed and
/// expected frequency vectors. Power is evaluated at the per-group mean size
/// `(nA + nB) / 2`.
///
/// # Errors
///
/// - [`EngineError::DegenerateSample`] when either sample has fewer than 2
///   observations
/// - [`EngineError::MismatchedLengths`] for chi-square length mismatches
/// - [`EngineError::InvalidProbability`] when `confidence_level` leaves no
///   valid significance level
pub fn statistical_test(
    a: &[f64],
    b: &[f64],
    test_type: TestType,
    confidence_level: f64,
) -> EngineResult<StatisticalTestResult> {
    debug!(
        n_a = a.len(),
        n_b = b.len(),
        ?test_type,
        confidence_level,
        "running statistical test"
    );

    let alpha = 1.0 - confidence_level;
    let (p_value, effect_size) = match test_type {
        TestType::TTest => {
            let t = t_statistic(a, b)?;
            let df = a.len() + b.len() - 2;
            (p_value_from_t(t.abs(), df), cohens_d(a, b)?)
        }
        TestType::ZTest => {
            let z = z_statistic(a, b)?;
            (p_value_from_z(z), cohens_d(a, b)?)
        }
        TestType::ChiSquare => {
            let chi_square = chi_square_statistic(a, b)?;
            let df = a.len() - 1;
            (chi_square_p_value(chi_square, df), cramers_v(a, b)?)
        }
    };

    let per_group = (a.len() + b.len()) / 2;
    let power = statistical_power(per_group, effect_size, alpha)?;

    Ok(StatisticalTestResult {
        test_type,
        p_value,
        is_significant: p_value < alpha,
        effect_size,
        sample_size: a.len() + b.len(),
        power,
    })
}

/// Shared sample-size guard for the variance-based tests
fn require_two_observations(a: &[f64], b: &[f64]) -> EngineResult<()> {
    if a.len() < 2 || b.len() < 2 {
        return Err(EngineError::DegenerateSample(format!(
            "each sample needs at least 2 observations, got {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_statistic_of_identical_samples_is_zero() {
        let sample = [4.0, 5.0, 6.0, 7.0];
        let t = t_statistic(&sample, &sample).unwrap();
        assert!(t.abs() < 1e-12);
    }

    #[test]
    fn constant_identical_samples_do_not_produce_nan() {
        let sample = [5.0, 5.0, 5.0];
        assert!(t_statistic(&sample, &sample).unwrap().abs() < f64::EPSILON);
        assert!(z_statistic(&sample, &sample).unwrap().abs() < f64::EPSILON);
        assert!(cohens_d(&sample, &sample).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn chi_square_rejects_mismatched_lengths() {
        let result = chi_square_statistic(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert!(matches!(
            result,
            Err(EngineError::MismatchedLengths {
                observed: 3,
                expected: 2
            })
        ));
    }

    #[test]
    fn power_increases_with_effect_size() {
        let small = statistical_power(50, 0.2, 0.05).unwrap();
        let large = statistical_power(50, 0.8, 0.05).unwrap();
        assert!(large > small);
        assert!((0.0..=1.0).contains(&small));
        assert!((0.0..=1.0).contains(&large));
    }
}
