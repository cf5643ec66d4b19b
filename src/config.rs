// ABOUTME: Engine configuration with validated defaults and environment overrides
// ABOUTME: Covers smoothing factors, seasonality, confidence bands, back-test hold-out, and funnel thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics

//! Engine configuration.
//!
//! Defaults match the production dashboard; deployments tune individual knobs
//! through `PULSE_*` environment variables. Configuration is read once at
//! engine construction, never mid-computation.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range (e.g., smoothing factor not in [0, 1])
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Environment variable access error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] env::VarError),

    /// Failed to parse configuration value
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Forecasting parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Level smoothing factor for double exponential smoothing (alpha)
    pub smoothing_alpha: f64,
    /// Trend smoothing factor for double exponential smoothing (beta)
    pub smoothing_beta: f64,
    /// Seasonality period used by the decomposition method (7 = weekly on daily data)
    pub seasonal_period: usize,
    /// Z multiplier for the confidence band (1.96 = 95%)
    pub confidence_z: f64,
    /// Maximum number of trailing points held out for the accuracy back-test
    pub backtest_holdout: usize,
    /// Seed for the default noise source of the arima-like method
    pub noise_seed: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.3,
            smoothing_beta: 0.1,
            seasonal_period: 7,
            confidence_z: 1.96,
            backtest_holdout: 5,
            noise_seed: 42,
        }
    }
}

impl ForecastConfig {
    /// Load configuration from `PULSE_FORECAST_*` environment variables,
    /// falling back to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when a set variable does not parse, or
    /// [`ConfigError::InvalidRange`] when the resulting configuration is
    /// invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(alpha) = read_env_f64("PULSE_FORECAST_ALPHA")? {
            config.smoothing_alpha = alpha;
        }
        if let Some(beta) = read_env_f64("PULSE_FORECAST_BETA")? {
            config.smoothing_beta = beta;
        }
        if let Some(period) = read_env_usize("PULSE_FORECAST_SEASONAL_PERIOD")? {
            config.seasonal_period = period;
        }
        if let Some(z) = read_env_f64("PULSE_FORECAST_CONFIDENCE_Z")? {
            config.confidence_z = z;
        }
        if let Some(holdout) = read_env_usize("PULSE_FORECAST_BACKTEST_HOLDOUT")? {
            config.backtest_holdout = holdout;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRange`] for any out-of-range parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.smoothing_alpha) {
            return Err(ConfigError::InvalidRange(
                "smoothing_alpha must be between 0 and 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.smoothing_beta) {
            return Err(ConfigError::InvalidRange(
                "smoothing_beta must be between 0 and 1",
            ));
        }
        if self.seasonal_period == 0 {
            return Err(ConfigError::InvalidRange(
                "seasonal_period must be at least 1",
            ));
        }
        if self.confidence_z <= 0.0 {
            return Err(ConfigError::InvalidRange("confidence_z must be positive"));
        }
        Ok(())
    }
}

/// Funnel drop-off severity thresholds, in percent of users lost between
/// consecutive stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelConfig {
    /// Drop-off above this is reported as a significant stage pair
    pub significant_drop_pct: f64,
    /// Drop-off above this produces a "significant" recommendation
    pub moderate_drop_pct: f64,
    /// Drop-off above this produces a "critical" recommendation
    pub critical_drop_pct: f64,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            significant_drop_pct: 20.0,
            moderate_drop_pct: 30.0,
            critical_drop_pct: 50.0,
        }
    }
}

impl FunnelConfig {
    /// Validate threshold ordering.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRange`] when thresholds are not ordered
    /// `significant <= moderate <= critical` or fall outside 0-100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.significant_drop_pct <= self.moderate_drop_pct
            && self.moderate_drop_pct <= self.critical_drop_pct;
        if !ordered {
            return Err(ConfigError::InvalidRange(
                "drop-off thresholds must be ordered significant <= moderate <= critical",
            ));
        }
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.significant_drop_pct) || !in_range(self.critical_drop_pct) {
            return Err(ConfigError::InvalidRange(
                "drop-off thresholds must be percentages between 0 and 100",
            ));
        }
        Ok(())
    }
}

fn read_env_f64(name: &str) -> Result<Option<f64>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<f64>()
            .map(Some)
            .map_err(|e| ConfigError::Parse(format!("{name}: {e}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar(e)),
    }
}

fn read_env_usize(name: &str) -> Result<Option<usize>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|e| ConfigError::Parse(format!("{name}: {e}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar(e)),
    }
}
