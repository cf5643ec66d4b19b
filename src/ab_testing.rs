// ABOUTME: Two-variant experiment analysis via the pooled two-proportion z-test
// ABOUTME: Produces p-value, uplift estimate, and a rollout recommendation for the dashboard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics
#![allow(clippy::cast_precision_loss)] // Safe: user counts are well within f64 precision

//! A/B experiment analysis.
//!
//! The pooled two-proportion z-test compares two conversion rates; a winner
//! is only declared when the difference is significant at the requested
//! confidence level. Identical variants produce a p-value of 1.

use crate::distributions::p_value_from_z;
use crate::errors::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw variant numbers supplied by the experimentation store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantInput {
    /// Variant name ("control", "new-checkout", ...)
    pub name: String,
    /// Users exposed to the variant; must be positive
    pub users: u64,
    /// Converted users; must not exceed `users`
    pub conversions: u64,
    /// Optional revenue attributed to the variant
    pub revenue: Option<f64>,
}

/// A variant with its derived conversion rate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbVariant {
    /// Variant name
    pub name: String,
    /// Users exposed to the variant
    pub users: u64,
    /// Converted users
    pub conversions: u64,
    /// Conversion rate in percent
    pub conversion_rate: f64,
    /// Optional revenue attributed to the variant
    pub revenue: Option<f64>,
}

/// Direction of the measured effect (variant B relative to variant A)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSign {
    /// Variant B converts better
    Positive,
    /// Variant B converts worse
    Negative,
    /// No measured difference
    Neutral,
}

/// Measured effect of variant B over variant A
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EffectEstimate {
    /// Difference in conversion rate, percentage points
    pub absolute: f64,
    /// Relative uplift in percent of the baseline rate (0 when the baseline is 0)
    pub relative: f64,
    /// Direction of the effect
    pub sign: EffectSign,
}

/// Complete experiment verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbTestResult {
    /// Both variants with derived rates, in input order
    pub variants: [AbVariant; 2],
    /// Two-tailed p-value of the pooled two-proportion z-test
    pub p_value: f64,
    /// Whether the p-value beats `1 - confidence_level`
    pub is_significant: bool,
    /// Measured effect of variant B over variant A
    pub effect: EffectEstimate,
    /// Human-readable rollout recommendation
    pub recommendation: String,
}

/// Compare two experiment variants at the given confidence level.
///
/// # Errors
///
/// Returns [`EngineError::DegenerateSample`] when a variant has zero users or
/// more conversions than users.
pub fn ab_test_analysis(
    variant_a: &VariantInput,
    variant_b: &VariantInput,
    confidence_level: f64,
) -> EngineResult<AbTestResult> {
    validate_variant(variant_a)?;
    validate_variant(variant_b)?;

    debug!(
        a = %variant_a.name,
        b = %variant_b.name,
        confidence_level,
        "analyzing experiment"
    );

    let n_a = variant_a.users as f64;
    let n_b = variant_b.users as f64;
    let p_a = variant_a.conversions as f64 / n_a;
    let p_b = variant_b.conversions as f64 / n_b;

    let pooled = (variant_a.conversions + variant_b.conversions) as f64 / (n_a + n_b);
    let se = (pooled * (1.0 - pooled) * (1.0 / n_a + 1.0 / n_b)).sqrt();
    let z = if se == 0.0 { 0.0 } else { (p_a - p_b).abs() / se };
    let p_value = p_value_from_z(z);

    let alpha = 1.0 - confidence_level;
    let is_significant = p_value < alpha;

    let rate_a = p_a * 100.0;
    let rate_b = p_b * 100.0;
    let absolute = rate_b - rate_a;
    let relative = if rate_a == 0.0 {
        0.0
    } else {
        absolute / rate_a * 100.0
    };
    let sign = if absolute > 0.0 {
        EffectSign::Positive
    } else if absolute < 0.0 {
        EffectSign::Negative
    } else {
        EffectSign::Neutral
    };

    let recommendation = build_recommendation(
        &variant_a.name,
        &variant_b.name,
        is_significant,
        sign,
        relative,
    );

    Ok(AbTestResult {
        variants: [to_variant(variant_a, rate_a), to_variant(variant_b, rate_b)],
        p_value,
        is_significant,
        effect: EffectEstimate {
            absolute,
            relative,
            sign,
        },
        recommendation,
    })
}

fn validate_variant(variant: &VariantInput) -> EngineResult<()> {
    if variant.users == 0 {
        return Err(EngineError::DegenerateSample(format!(
            "variant '{}' has no users",
            variant.name
        )));
    }
    if variant.conversions > variant.users {
        return Err(EngineError::DegenerateSample(format!(
            "variant '{}' reports more conversions ({}) than users ({})",
            variant.name, variant.conversions, variant.users
        )));
    }
    Ok(())
}

fn to_variant(input: &VariantInput, conversion_rate: f64) -> AbVariant {
    AbVariant {
        name: input.name.clone(),
        users: input.users,
        conversions: input.conversions,
        conversion_rate,
        revenue: input.revenue,
    }
}

/// Verdict text; a winner is named only when the result is significant
fn build_recommendation(
    name_a: &str,
    name_b: &str,
    is_significant: bool,
    sign: EffectSign,
    relative: f64,
) -> String {
    if !is_significant {
        return format!(
            "No statistically significant difference between '{name_a}' and '{name_b}'. \
             Keep the experiment running or increase the sample size."
        );
    }
    match sign {
        EffectSign::Positive => format!(
            "Variant '{name_b}' outperforms '{name_a}' by {relative:.1}% relative uplift. \
             Roll out '{name_b}'."
        ),
        EffectSign::Negative => format!(
            "Variant '{name_b}' underperforms '{name_a}' by {:.1}% relative. \
             Keep '{name_a}'.",
            relative.abs()
        ),
        EffectSign::Neutral => format!(
            "Rates of '{name_a}' and '{name_b}' are indistinguishable. Keep '{name_a}'."
        ),
    }
}
