// ABOUTME: Unified error types for the analytics engine
// ABOUTME: Defines recoverable validation and numeric-domain error kinds returned to the dashboard layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics

//! Unified error handling for the analytics engine.
//!
//! Every engine entry point returns [`EngineResult`]. All errors are local,
//! synchronous, and recoverable: the dashboard layer decides how to present
//! them (fallback chart, empty state). The engine never logs-and-swallows an
//! error and never substitutes `NaN` or `0` for missing data.

use thiserror::Error;

/// Result alias used across the engine
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors produced by the analytics engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A forecasting or cohort entry point received no input data
    #[error("input history is empty")]
    EmptyHistory,

    /// A sampling step was required but fewer than two points were supplied
    #[error("insufficient history: need at least {needed} points, got {got}")]
    InsufficientHistory {
        /// Minimum number of points the operation requires
        needed: usize,
        /// Number of points actually supplied
        got: usize,
    },

    /// Requested forecast or retention horizon was zero
    #[error("invalid periods: horizon must be at least 1")]
    InvalidPeriods,

    /// A variance-based test received a sample with fewer than two observations
    #[error("degenerate sample: {0}")]
    DegenerateSample(String),

    /// Pooled variance is undefined for the supplied sample sizes
    #[error("insufficient sample size: {0}")]
    InsufficientSampleSize(String),

    /// Probability outside the open interval (0, 1) passed to the inverse CDF
    #[error("probability {0} is outside the open interval (0, 1)")]
    InvalidProbability(f64),

    /// Chi-square observed/expected vectors differ in length
    #[error("mismatched lengths: observed has {observed} entries, expected has {expected}")]
    MismatchedLengths {
        /// Length of the observed-frequency vector
        observed: usize,
        /// Length of the expected-frequency vector
        expected: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = EngineError::InsufficientHistory { needed: 2, got: 1 };
        assert_eq!(
            err.to_string(),
            "insufficient history: need at least 2 points, got 1"
        );

        let err = EngineError::MismatchedLengths {
            observed: 4,
            expected: 5,
        };
        assert!(err.to_string().contains("observed has 4"));
    }
}
