// ABOUTME: Probability approximations built from scratch, no statistics library
// ABOUTME: Normal CDF (Abramowitz-Stegun), inverse normal CDF (Acklam), and t/chi-square p-value surrogates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics
#![allow(clippy::cast_precision_loss)] // Safe: degrees of freedom are small integers

//! Probability approximations.
//!
//! The engine deliberately carries its own distribution code instead of a
//! statistics dependency. The normal CDF is the Abramowitz-Stegun 26.2.17
//! rational approximation (about 1e-7 absolute error); its inverse is the
//! Acklam rational approximation. The t and chi-square p-values are normal
//! surrogates, documented per function; a deliberate simplification that is
//! adequate for the dashboard's large-sample verdicts.

use crate::errors::{EngineError, EngineResult};

/// 1 / sqrt(2 * pi)
const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Abramowitz-Stegun 26.2.17 coefficients
const AS_P: f64 = 0.231_641_9;
const AS_B1: f64 = 0.319_381_530;
const AS_B2: f64 = -0.356_563_782;
const AS_B3: f64 = 1.781_477_937;
const AS_B4: f64 = -1.821_255_978;
const AS_B5: f64 = 1.330_274_429;

/// Standard normal cumulative distribution function.
///
/// Abramowitz-Stegun rational approximation evaluated on `|z|`, reflected for
/// negative arguments. Accurate to roughly 7 significant digits over the whole
/// real line.
#[must_use]
pub fn normal_cdf(z: f64) -> f64 {
    let x = z.abs();
    let t = 1.0 / AS_P.mul_add(x, 1.0);
    let poly = t.mul_add(
        t.mul_add(t.mul_add(t.mul_add(AS_B5, AS_B4), AS_B3), AS_B2),
        AS_B1,
    ) * t;
    let upper_tail = INV_SQRT_2PI * (-0.5 * x * x).exp() * poly;

    if z >= 0.0 {
        1.0 - upper_tail
    } else {
        upper_tail
    }
}

/// Acklam central-region numerator coefficients
const ACK_A: [f64; 6] = [
    -39.696_830_286_653_76,
    220.946_098_424_520_5,
    -275.928_510_446_968_7,
    138.357_751_867_269,
    -30.664_798_066_147_16,
    2.506_628_277_459_239,
];

/// Acklam central-region denominator coefficients
const ACK_B: [f64; 5] = [
    -54.476_098_798_224_06,
    161.585_836_858_040_9,
    -155.698_979_859_886_6,
    66.801_311_887_719_72,
    -13.280_681_552_885_72,
];

/// Acklam tail-region numerator coefficients
const ACK_C: [f64; 6] = [
    -0.007_784_894_002_430_293,
    -0.322_396_458_041_136_5,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];

/// Acklam tail-region denominator coefficients
const ACK_D: [f64; 4] = [
    0.007_784_695_709_041_462,
    0.322_467_129_070_039_8,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];

/// Break-point between the tail and central regions of the Acklam
/// approximation
const ACK_P_LOW: f64 = 0.024_25;

/// Inverse of the standard normal CDF (the quantile function).
///
/// Acklam rational approximation, relative error below 1.15e-9 over the open
/// interval.
///
/// # Errors
///
/// Returns [`EngineError::InvalidProbability`] unless `0 < p < 1` (strict:
/// the quantile diverges at both boundaries).
pub fn inverse_normal_cdf(p: f64) -> EngineResult<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(EngineError::InvalidProbability(p));
    }

    let x = if p < ACK_P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        tail_rational(q)
    } else if p <= 1.0 - ACK_P_LOW {
        let q = p - 0.5;
        let r = q * q;
        let num = horner(r, &ACK_A) * q;
        let den = horner(r, &ACK_B).mul_add(r, 1.0);
        num / den
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -tail_rational(q)
    };

    Ok(x)
}

/// Acklam tail expression for the lower tail; the upper tail negates it.
fn tail_rational(q: f64) -> f64 {
    let num = horner(q, &ACK_C);
    let den = horner(q, &ACK_D).mul_add(q, 1.0);
    num / den
}

/// Horner evaluation with coefficients ordered from the highest degree down.
fn horner(x: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().fold(0.0, |acc, &c| acc.mul_add(x, c))
}

/// Two-tailed p-value for a z statistic: `2 * (1 - normal_cdf(|z|))`, clamped
/// to `[0, 1]`.
#[must_use]
pub fn p_value_from_z(z: f64) -> f64 {
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

/// Two-tailed p-value for a t statistic, approximated through the normal
/// distribution with a moment-matching shrink of the statistic:
/// `z = t / sqrt(1 + t^2 / (4 * df))`. The Student-t distribution is not
/// modeled exactly; the surrogate is accurate for large degrees of freedom
/// and conservative for small ones. `df == 0` yields 1.0.
#[must_use]
pub fn p_value_from_t(t: f64, degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom == 0 {
        return 1.0;
    }

    let df = degrees_of_freedom as f64;
    let z = t / (t * t / (4.0 * df) + 1.0).sqrt();
    p_value_from_z(z)
}

/// Upper-tail p-value for a chi-square statistic, approximated with a
/// logistic surrogate of the chi-square CDF centered at `df` with scale
/// `sqrt(2 * df)` (the distribution's mean and standard deviation). A
/// documented simplification, not an exact CDF. `df == 0` yields 1.0.
#[must_use]
pub fn chi_square_p_value(chi_square: f64, degrees_of_freedom: usize) -> f64 {
    if degrees_of_freedom == 0 {
        return 1.0;
    }

    let df = degrees_of_freedom as f64;
    let scale = (2.0 * df).sqrt();
    let cdf = 1.0 / (1.0 + (-(chi_square - df) / scale).exp());
    (1.0 - cdf).clamp(0.0, 1.0)
}
