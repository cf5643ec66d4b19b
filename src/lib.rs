// ABOUTME: Statistical analytics engine for the Pulse business-intelligence dashboard
// ABOUTME: Pure, stateless numeric routines for forecasting, cohorts, funnels, and hypothesis tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics

#![deny(unsafe_code)]

//! # Pulse Analytics
//!
//! The statistical computation kernel behind the Pulse BI dashboard. The
//! dashboard reads KPI series and event streams from its stores, hands them
//! to this crate as plain in-memory arrays, and renders the returned result
//! records as charts. The engine itself performs no I/O, keeps no state
//! between calls, and returns structured errors for invalid input instead
//! of substituting fallback values. Diagnostics go through `tracing` and
//! carry no data beyond counts and identifiers.
//!
//! ## Components
//!
//! - [`statistics`] — numeric primitives (means, variances, smoothing, trend
//!   and seasonal extraction)
//! - [`distributions`] — normal CDF/quantile approximations and the p-value
//!   surrogates built on them
//! - [`forecasting`] — four interchangeable KPI forecasting methods with
//!   confidence bands and back-tested accuracy
//! - [`statistical_tests`] — two-sample t/z/chi-square testing with effect
//!   sizes and power
//! - [`cohort`] — retention-matrix construction over entity event streams
//! - [`funnel`] — staged conversion and drop-off analysis
//! - [`ab_testing`] — two-proportion experiment verdicts
//!
//! ## Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use pulse_analytics::forecasting::{DataPoint, ForecastEngine, ForecastMethod};
//!
//! let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
//! let history: Vec<DataPoint> = (0..30)
//!     .map(|i| DataPoint {
//!         timestamp: start + Duration::days(i),
//!         value: 100.0 + i as f64,
//!     })
//!     .collect();
//!
//! let mut engine = ForecastEngine::new();
//! let result = engine
//!     .forecast(&history, 7, ForecastMethod::LinearRegression)
//!     .unwrap();
//! assert_eq!(result.forecast.len(), 7);
//! ```
//!
//! ## Concurrency
//!
//! Every entry point is a pure function of its inputs (the arima-like
//! forecast's perturbation comes from an injected, seeded noise source), so
//! arbitrary numbers of calls may run concurrently without locking. Callers
//! that want to memoize repeated computations own that cache themselves.

/// Two-variant experiment analysis
pub mod ab_testing;
/// Cohort grouping and retention matrices
pub mod cohort;
/// Engine configuration with validated defaults and environment overrides
pub mod config;
/// Probability approximations (normal CDF, quantile, p-value surrogates)
pub mod distributions;
/// Unified error handling
pub mod errors;
/// KPI forecasting engine
pub mod forecasting;
/// Conversion funnel analysis
pub mod funnel;
/// Numeric primitives
pub mod statistics;
/// Two-sample hypothesis testing kit
pub mod statistical_tests;

pub use ab_testing::{ab_test_analysis, AbTestResult, AbVariant, EffectEstimate, EffectSign, VariantInput};
pub use cohort::{cohort_analysis, Cohort, CohortAnalysis, CohortEvent, PeriodType};
pub use config::{ConfigError, ForecastConfig, FunnelConfig};
pub use errors::{EngineError, EngineResult};
pub use forecasting::{
    DataPoint, ForecastAccuracy, ForecastEngine, ForecastMethod, ForecastPoint, ForecastResult,
    NoiseSource, SeededNoise, ZeroNoise,
};
pub use funnel::{funnel_analysis, FunnelAnalysis, FunnelDropOff, FunnelStage, FunnelStageInput};
pub use statistical_tests::{statistical_test, StatisticalTestResult, TestType};
