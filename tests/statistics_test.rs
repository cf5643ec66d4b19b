// ABOUTME: Integration tests for the numeric primitives
// ABOUTME: Validates moments, pooled deviation, smoothing windows, trend, and seasonal extraction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pulse_analytics::statistics::{
    detect_outliers, linear_trend, mean, median, moving_average, pooled_std_dev,
    seasonal_components, std_dev, variance,
};
use pulse_analytics::EngineError;

#[test]
fn moments_of_known_sample() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert!((mean(&values) - 5.0).abs() < 1e-12);
    assert!((variance(&values) - 4.0).abs() < 1e-12);
    assert!((std_dev(&values) - 2.0).abs() < 1e-12);
}

#[test]
fn empty_input_yields_zero_moments() {
    assert!((mean(&[]) - 0.0).abs() < f64::EPSILON);
    assert!((variance(&[]) - 0.0).abs() < f64::EPSILON);
    assert!((median(&[]) - 0.0).abs() < f64::EPSILON);
}

#[test]
fn pooled_std_dev_of_equal_variance_samples() {
    let a = [1.0, 2.0, 3.0];
    let b = [11.0, 12.0, 13.0];
    // Both population variances are 2/3; pooled = sqrt((2*2/3 + 2*2/3)/4)
    let pooled = pooled_std_dev(&a, &b).unwrap();
    assert!((pooled - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
}

#[test]
fn pooled_std_dev_requires_two_per_sample() {
    assert!(matches!(
        pooled_std_dev(&[1.0], &[1.0, 2.0]),
        Err(EngineError::InsufficientSampleSize(_))
    ));
    assert!(matches!(
        pooled_std_dev(&[1.0, 2.0], &[]),
        Err(EngineError::InsufficientSampleSize(_))
    ));
}

#[test]
fn moving_average_window_is_causal() {
    let values = [10.0, 20.0, 30.0, 40.0, 50.0];
    let smoothed = moving_average(&values, 2);
    assert_eq!(smoothed.len(), values.len());
    assert!((smoothed[0] - 10.0).abs() < 1e-12);
    assert!((smoothed[1] - 15.0).abs() < 1e-12);
    assert!((smoothed[4] - 45.0).abs() < 1e-12);
}

#[test]
fn oversized_window_averages_the_prefix() {
    let values = [3.0, 6.0, 9.0];
    let smoothed = moving_average(&values, 10);
    assert!((smoothed[2] - 6.0).abs() < 1e-12);
}

#[test]
fn linear_trend_drops_the_middle_of_odd_series() {
    // Halves [1, 2] and [4, 5]; the middle 3 belongs to neither
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert!((linear_trend(&values) - 1.5).abs() < 1e-12);
}

#[test]
fn linear_trend_of_short_series_is_zero() {
    assert!((linear_trend(&[7.0]) - 0.0).abs() < f64::EPSILON);
    assert!((linear_trend(&[]) - 0.0).abs() < f64::EPSILON);
}

#[test]
fn seasonal_components_average_each_phase() {
    // Weekly phases over two full weeks
    let values: Vec<f64> = (0..14).map(|i| f64::from(i % 7) + f64::from(i / 7)).collect();
    let components = seasonal_components(&values, 7);
    assert_eq!(components.len(), 7);
    for (phase, component) in components.iter().enumerate() {
        assert!((component - (phase as f64 + 0.5)).abs() < 1e-12);
    }
}

#[test]
fn seasonal_components_of_short_series_pad_with_zero() {
    let components = seasonal_components(&[4.0, 8.0], 4);
    assert_eq!(components, vec![4.0, 8.0, 0.0, 0.0]);
}

#[test]
fn outlier_detection_handles_uniform_series() {
    let values = [5.0, 5.0, 5.0, 5.0];
    assert!(detect_outliers(&values, 3.5).is_empty());
}
