// ABOUTME: Staged conversion funnel analysis with drop-off detection
// ABOUTME: Computes per-stage conversion percentages and severity-bucketed recommendation text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics
#![allow(clippy::cast_precision_loss)] // Safe: stage counts are small integers

//! Conversion funnel analysis.
//!
//! Stage counts are taken as supplied; real product funnels show re-entry, so
//! a later stage may legitimately exceed an earlier one and the drop-off count
//! goes negative rather than crashing.

use crate::config::FunnelConfig;
use serde::{Deserialize, Serialize};

/// One funnel stage as supplied by the dashboard's event store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelStageInput {
    /// Stage name ("Visit", "Signup", "Purchase", ...)
    pub name: String,
    /// De-duplicated user ids that reached this stage
    pub user_ids: Vec<String>,
}

/// One analyzed funnel stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelStage {
    /// Stage name
    pub name: String,
    /// Users that reached this stage
    pub count: usize,
    /// Share of the first stage's users, in percent
    pub percentage_of_first: f64,
    /// Share of the previous stage's users, in percent (100 for the first stage)
    pub conversion_from_previous: f64,
    /// Users lost versus the previous stage; negative on re-entry
    pub dropoff_count: i64,
}

/// A stage transition losing a significant share of users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelDropOff {
    /// Stage users came from
    pub from_stage: String,
    /// Stage users failed to reach
    pub to_stage: String,
    /// Percentage of users lost in the transition
    pub drop_percentage: f64,
}

/// Complete funnel analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelAnalysis {
    /// Analyzed stages, in input order
    pub stages: Vec<FunnelStage>,
    /// Last stage's share of the first stage, in percent
    pub overall_conversion: f64,
    /// Transitions losing more than the significance threshold
    pub significant_drop_offs: Vec<FunnelDropOff>,
    /// Human-readable recommendations, one per flagged transition in stage order
    pub recommendations: Vec<String>,
}

/// Analyze a conversion funnel with default thresholds
#[must_use]
pub fn funnel_analysis(stages: &[FunnelStageInput]) -> FunnelAnalysis {
    funnel_analysis_with(&FunnelConfig::default(), stages)
}

/// Analyze a conversion funnel with explicit severity thresholds.
///
/// An empty input yields an empty, healthy funnel. The first stage always
/// reports a 100% conversion from "previous".
#[must_use]
pub fn funnel_analysis_with(config: &FunnelConfig, stages: &[FunnelStageInput]) -> FunnelAnalysis {
    let first_count = stages.first().map_or(0, |s| s.user_ids.len());

    let mut analyzed = Vec::with_capacity(stages.len());
    let mut significant_drop_offs = Vec::new();
    let mut recommendations = Vec::new();
    let mut previous_count = first_count;
    let mut previous_name = String::new();

    for (index, stage) in stages.iter().enumerate() {
        let count = stage.user_ids.len();

        let percentage_of_first = if first_count == 0 {
            0.0
        } else {
            count as f64 / first_count as f64 * 100.0
        };

        let (conversion_from_previous, dropoff_count) = if index == 0 {
            (100.0, 0)
        } else if previous_count == 0 {
            (0.0, 0)
        } else {
            (
                count as f64 / previous_count as f64 * 100.0,
                previous_count as i64 - count as i64,
            )
        };

        if index > 0 {
            let drop_percentage = 100.0 - conversion_from_previous;
            if drop_percentage > config.significant_drop_pct {
                significant_drop_offs.push(FunnelDropOff {
                    from_stage: previous_name.clone(),
                    to_stage: stage.name.clone(),
                    drop_percentage,
                });
            }
            if drop_percentage > config.critical_drop_pct {
                recommendations.push(format!(
                    "Critical drop-off between '{previous_name}' and '{}': {drop_percentage:.1}% \
                     of users abandon here. Prioritize this transition for investigation.",
                    stage.name
                ));
            } else if drop_percentage > config.moderate_drop_pct {
                recommendations.push(format!(
                    "Significant drop-off between '{previous_name}' and '{}': {drop_percentage:.1}% \
                     of users are lost. Consider simplifying this step.",
                    stage.name
                ));
            }
        }

        analyzed.push(FunnelStage {
            name: stage.name.clone(),
            count,
            percentage_of_first,
            conversion_from_previous,
            dropoff_count,
        });

        previous_count = count;
        previous_name = stage.name.clone();
    }

    if recommendations.is_empty() {
        recommendations.push(format!(
            "Funnel looks healthy: no stage loses more than {:.0}% of its users.",
            config.moderate_drop_pct
        ));
    }

    let overall_conversion = match (stages.first(), stages.last()) {
        (Some(first), Some(last)) if !first.user_ids.is_empty() => {
            last.user_ids.len() as f64 / first.user_ids.len() as f64 * 100.0
        }
        _ => 0.0,
    };

    FunnelAnalysis {
        stages: analyzed,
        overall_conversion,
        significant_drop_offs,
        recommendations,
    }
}
