// ABOUTME: KPI forecasting engine with four interchangeable projection methods
// ABOUTME: Produces point forecasts, confidence bands, and hold-out back-test accuracy summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics
#![allow(clippy::cast_precision_loss)] // Safe: horizon indices and sample counts stay small

//! KPI forecasting.
//!
//! Four projection methods share a single pipeline: validate the history,
//! project `periods` values ahead at the sampling cadence of the last two
//! historical points, wrap each value in a confidence band, and back-test the
//! method against a held-out tail of the history for the accuracy summary.
//!
//! The arima-like method's perturbation is an injectable [`NoiseSource`]
//! defaulting to a seeded ChaCha generator, so every forecast is reproducible
//! and the engine stays pure from the caller's point of view.

use crate::config::ForecastConfig;
use crate::errors::{EngineError, EngineResult};
use crate::statistics::{linear_trend, seasonal_components, std_dev};
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One observed KPI value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Observation timestamp; series must be chronologically ordered
    pub timestamp: DateTime<Utc>,
    /// Observed value
    pub value: f64,
}

/// One forecast value with its confidence band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Projected timestamp, continuing the historical cadence
    pub timestamp: DateTime<Utc>,
    /// Point forecast, clamped to be non-negative (KPI domain assumption)
    pub value: f64,
    /// Lower band edge, clamped to be non-negative
    pub lower: f64,
    /// Upper band edge
    pub upper: f64,
}

/// Forecasting method selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForecastMethod {
    /// Trend extrapolation with a bounded pseudo-random perturbation
    ArimaLike,
    /// Trend extrapolation plus additive weekly seasonal components
    Decomposition,
    /// Double (Holt) exponential smoothing with a level and a trend term
    ExponentialSmoothing,
    /// Ordinary-least-squares fit of value against index
    LinearRegression,
}

/// Back-test accuracy summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    /// Mean absolute percentage error over the hold-out tail
    pub mape: f64,
    /// Root-mean-square error over the hold-out tail
    pub rmse: f64,
    /// Mean absolute error over the hold-out tail
    pub mae: f64,
}

/// Complete forecast output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Method that produced this forecast
    pub method: ForecastMethod,
    /// The historical series the forecast was computed from
    pub historical: Vec<DataPoint>,
    /// Exactly the requested number of forecast points
    pub forecast: Vec<ForecastPoint>,
    /// Hold-out back-test accuracy of the selected method on this series
    pub accuracy: ForecastAccuracy,
}

/// Source of the bounded perturbation used by the arima-like method.
///
/// Implementations must return values in `[-1, 1]`. Injecting the source
/// keeps forecasts reproducible in tests and deterministic in production.
pub trait NoiseSource {
    /// Next perturbation in `[-1, 1]`
    fn next_noise(&mut self) -> f64;
}

/// Seeded ChaCha-backed noise source; the default for the engine
#[derive(Debug, Clone)]
pub struct SeededNoise {
    rng: ChaCha8Rng,
}

impl SeededNoise {
    /// Create a noise source from an explicit seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn next_noise(&mut self) -> f64 {
        self.rng.gen_range(-1.0..=1.0)
    }
}

/// Noise source that always returns zero; useful for exact-value tests
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn next_noise(&mut self) -> f64 {
        0.0
    }
}

/// KPI forecasting engine
pub struct ForecastEngine {
    config: ForecastConfig,
    noise: Box<dyn NoiseSource + Send>,
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastEngine {
    /// Engine with default configuration and the default seeded noise source
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ForecastConfig::default())
    }

    /// Engine with a custom configuration and the default seeded noise source
    #[must_use]
    pub fn with_config(config: ForecastConfig) -> Self {
        let noise = Box::new(SeededNoise::new(config.noise_seed));
        Self { config, noise }
    }

    /// Engine with an injected noise source
    #[must_use]
    pub fn with_noise(config: ForecastConfig, noise: impl NoiseSource + Send + 'static) -> Self {
        Self {
            config,
            noise: Box::new(noise),
        }
    }

    /// Forecast `periods` future points of `history` with the selected method.
    ///
    /// Forecast timestamps continue at the cadence of the last two historical
    /// points. Values and lower band edges are clamped to be non-negative; the
    /// upper edge is raised to the clamped value when the raw projection was
    /// negative, keeping `lower <= value <= upper`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::EmptyHistory`] when `history` is empty
    /// - [`EngineError::InvalidPeriods`] when `periods` is zero
    /// - [`EngineError::InsufficientHistory`] when fewer than 2 points are
    ///   supplied (no sampling step can be derived)
    pub fn forecast(
        &mut self,
        history: &[DataPoint],
        periods: usize,
        method: ForecastMethod,
    ) -> EngineResult<ForecastResult> {
        if history.is_empty() {
            return Err(EngineError::EmptyHistory);
        }
        if periods == 0 {
            return Err(EngineError::InvalidPeriods);
        }
        if history.len() < 2 {
            return Err(EngineError::InsufficientHistory {
                needed: 2,
                got: history.len(),
            });
        }

        debug!(
            points = history.len(),
            periods,
            ?method,
            "generating forecast"
        );

        let values: Vec<f64> = history.iter().map(|p| p.value).collect();
        let last_timestamp = history[history.len() - 1].timestamp;
        let step = last_timestamp - history[history.len() - 2].timestamp;

        let projected = self.project(&values, periods, method);
        let band = self.config.confidence_z * std_dev(&values);

        let forecast = projected
            .into_iter()
            .enumerate()
            .map(|(offset, raw)| {
                let i = (offset + 1) as i32;
                let value = raw.max(0.0);
                let lower = (raw - band).max(0.0);
                // Raise the upper edge when clamping pushed the value past it
                let upper = (raw + band).max(value);
                ForecastPoint {
                    timestamp: last_timestamp + step * i,
                    value,
                    lower,
                    upper,
                }
            })
            .collect();

        let accuracy = self.back_test(&values, method);

        Ok(ForecastResult {
            method,
            historical: history.to_vec(),
            forecast,
            accuracy,
        })
    }

    /// Raw projected values for horizon indices `1..=periods`, before any
    /// clamping or banding.
    fn project(&mut self, values: &[f64], periods: usize, method: ForecastMethod) -> Vec<f64> {
        match method {
            ForecastMethod::ArimaLike => self.project_arima_like(values, periods),
            ForecastMethod::Decomposition => self.project_decomposition(values, periods),
            ForecastMethod::ExponentialSmoothing => self.project_holt(values, periods),
            ForecastMethod::LinearRegression => project_least_squares(values, periods),
        }
    }

    /// Trend extrapolation with a bounded perturbation per step
    fn project_arima_like(&mut self, values: &[f64], periods: usize) -> Vec<f64> {
        let last = values[values.len() - 1];
        let trend = linear_trend(values);
        (1..=periods)
            .map(|i| trend.mul_add(i as f64, last) + self.noise.next_noise())
            .collect()
    }

    /// Trend extrapolation plus additive seasonal phase means.
    ///
    /// The phase means are uncentered (see
    /// [`seasonal_components`]), so the seasonal term carries the series level
    /// with it; a known limitation of this method inherited from the original
    /// dashboard.
    fn project_decomposition(&self, values: &[f64], periods: usize) -> Vec<f64> {
        let last = values[values.len() - 1];
        let trend = linear_trend(values);
        let period = self.config.seasonal_period.max(1);
        let seasonal = seasonal_components(values, period);
        (1..=periods)
            .map(|i| trend.mul_add(i as f64, last) + seasonal[i % period])
            .collect()
    }

    /// Double (Holt) exponential smoothing: level/trend recursion over the
    /// history, then linear extrapolation of the final state
    fn project_holt(&self, values: &[f64], periods: usize) -> Vec<f64> {
        let alpha = self.config.smoothing_alpha;
        let beta = self.config.smoothing_beta;

        let mut level = values[0];
        let mut trend = values[1] - values[0];
        for &x in &values[1..] {
            let next_level = alpha.mul_add(x, (1.0 - alpha) * (level + trend));
            trend = beta.mul_add(next_level - level, (1.0 - beta) * trend);
            level = next_level;
        }

        (1..=periods)
            .map(|i| trend.mul_add(i as f64, level))
            .collect()
    }

    /// Back-test the method by holding out the trailing points, re-projecting
    /// them from the truncated history, and scoring against the actuals.
    fn back_test(&mut self, values: &[f64], method: ForecastMethod) -> ForecastAccuracy {
        let holdout = self.config.backtest_holdout.min(values.len() - 2);
        if holdout == 0 {
            warn!(
                points = values.len(),
                "history too short for a back-test; accuracy reported as zero"
            );
            return ForecastAccuracy::default();
        }

        let split = values.len() - holdout;
        let train = &values[..split];
        let actuals = &values[split..];
        let predicted: Vec<f64> = self
            .project(train, holdout, method)
            .into_iter()
            .map(|v| v.max(0.0))
            .collect();

        let n = holdout as f64;
        let mut abs_err_sum = 0.0;
        let mut sq_err_sum = 0.0;
        let mut pct_err_sum = 0.0;
        let mut pct_count = 0_usize;
        for (&actual, &pred) in actuals.iter().zip(&predicted) {
            let err = actual - pred;
            abs_err_sum += err.abs();
            sq_err_sum += err * err;
            if actual != 0.0 {
                pct_err_sum += (err / actual).abs() * 100.0;
                pct_count += 1;
            }
        }

        ForecastAccuracy {
            mape: if pct_count == 0 {
                0.0
            } else {
                pct_err_sum / pct_count as f64
            },
            rmse: (sq_err_sum / n).sqrt(),
            mae: abs_err_sum / n,
        }
    }
}

/// Closed-form ordinary-least-squares fit of `values` against their indices.
/// Returns `(slope, intercept)`.
#[must_use]
pub fn fit_least_squares(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    if values.len() < 2 {
        return (0.0, values.first().copied().unwrap_or(0.0));
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xx = x.mul_add(x, sum_xx);
        sum_xy = x.mul_add(y, sum_xy);
    }

    let denominator = n.mul_add(sum_xx, -(sum_x * sum_x));
    if denominator.abs() < f64::EPSILON {
        return (0.0, sum_y / n);
    }

    let slope = n.mul_add(sum_xy, -(sum_x * sum_y)) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    (slope, intercept)
}

/// OLS extrapolation: the first forecast sits at x = n, continuing the fit
fn project_least_squares(values: &[f64], periods: usize) -> Vec<f64> {
    let (slope, intercept) = fit_least_squares(values);
    let n = values.len() as f64;
    (1..=periods)
        .map(|i| slope.mul_add(n + i as f64 - 1.0, intercept))
        .collect()
}
