// ABOUTME: Cohort grouping and retention-matrix construction over entity event streams
// ABOUTME: Buckets entities by truncated cohort date and tracks activity across day/week/month periods
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Pulse Analytics
#![allow(clippy::cast_precision_loss)] // Safe: cohort sizes are small integers

//! Cohort retention analysis.
//!
//! Entities are bucketed into cohorts by their cohort date truncated to the
//! requested period (weeks start on Monday, months use `YYYY-MM`). An entity
//! counts as active at period `i` when it has any event at period index `i`
//! or later, so retention curves are non-increasing and `retention[0]` is
//! always exactly 100.

use crate::errors::{EngineError, EngineResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One entity/event observation supplied by the dashboard's event store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortEvent {
    /// Opaque entity identifier (user id, account id, ...)
    pub entity_id: String,
    /// When the entity entered its cohort (signup, first purchase, ...)
    pub cohort_date: DateTime<Utc>,
    /// When this event happened
    pub event_date: DateTime<Utc>,
}

/// Granularity of cohort periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// Calendar days
    Day,
    /// Weeks starting on Monday
    Week,
    /// Calendar months
    Month,
}

impl PeriodType {
    /// Human-readable label prefix for period columns
    const fn label(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
        }
    }
}

/// One cohort row of the retention matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cohort {
    /// Cohort bucket name (truncated start date)
    pub name: String,
    /// The period the cohort starts in, same format as `name`
    pub start_period: String,
    /// Number of distinct entities in the cohort; always positive
    pub size: usize,
    /// Retention percentages per period; `retention[0]` is exactly 100
    pub retention: Vec<f64>,
}

/// Complete retention matrix with the cross-cohort average curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortAnalysis {
    /// Cohorts ordered by start period
    pub cohorts: Vec<Cohort>,
    /// Average retention per period over the cohorts that observed it
    pub average_retention: Vec<f64>,
    /// Labels for the period columns ("Month 0", "Month 1", ...)
    pub period_labels: Vec<String>,
}

/// Per-cohort accumulator while scanning the event stream
#[derive(Debug, Default)]
struct CohortAccumulator {
    /// Earliest cohort date seen in the bucket
    start: Option<NaiveDate>,
    /// Highest period index observed per entity
    entities: HashMap<String, usize>,
}

/// Build the retention matrix for an event stream.
///
/// A cohort's observed horizon is measured against the latest event date in
/// the input (the engine takes no wall clock); `average_retention[i]` averages
/// only the cohorts whose horizon reaches period `i`.
///
/// # Errors
///
/// - [`EngineError::InvalidPeriods`] when `periods` is zero
/// - [`EngineError::EmptyHistory`] when no events are supplied
pub fn cohort_analysis(
    events: &[CohortEvent],
    period_type: PeriodType,
    periods: usize,
) -> EngineResult<CohortAnalysis> {
    if periods == 0 {
        return Err(EngineError::InvalidPeriods);
    }
    if events.is_empty() {
        return Err(EngineError::EmptyHistory);
    }

    debug!(events = events.len(), ?period_type, periods, "building cohort matrix");

    let mut buckets: BTreeMap<String, CohortAccumulator> = BTreeMap::new();
    let mut latest_event: Option<NaiveDate> = None;

    for event in events {
        let cohort_day = event.cohort_date.date_naive();
        let event_day = event.event_date.date_naive();
        let Some(period_index) = period_index(cohort_day, event_day, period_type) else {
            warn!(
                entity = %event.entity_id,
                "skipping event dated before its cohort date"
            );
            continue;
        };

        latest_event = Some(latest_event.map_or(event_day, |d| d.max(event_day)));

        let key = bucket_key(cohort_day, period_type);
        let accumulator = buckets.entry(key).or_default();
        accumulator.start = Some(accumulator.start.map_or(cohort_day, |s| s.min(cohort_day)));
        let max_period = accumulator
            .entities
            .entry(event.entity_id.clone())
            .or_insert(0);
        *max_period = (*max_period).max(period_index);
    }

    // No bucket means every event was skipped as pre-cohort noise
    let Some(latest_event) = latest_event else {
        return Err(EngineError::EmptyHistory);
    };

    let mut cohorts = Vec::with_capacity(buckets.len());
    let mut retention_sums = vec![0.0_f64; periods];
    let mut retention_counts = vec![0_usize; periods];

    for (key, accumulator) in buckets {
        let Some(start) = accumulator.start else {
            continue;
        };
        let observed = period_index(start, latest_event, period_type)
            .map_or(1, |p| p + 1)
            .min(periods);

        let size = accumulator.entities.len();
        let retention: Vec<f64> = (0..observed)
            .map(|i| {
                let active = accumulator
                    .entities
                    .values()
                    .filter(|&&max_period| max_period >= i)
                    .count();
                active as f64 / size as f64 * 100.0
            })
            .collect();

        for (i, &rate) in retention.iter().enumerate() {
            retention_sums[i] += rate;
            retention_counts[i] += 1;
        }

        cohorts.push(Cohort {
            name: key.clone(),
            start_period: key,
            size,
            retention,
        });
    }

    let observed_periods = retention_counts
        .iter()
        .rposition(|&count| count > 0)
        .map_or(0, |i| i + 1);

    let average_retention: Vec<f64> = (0..observed_periods)
        .map(|i| retention_sums[i] / retention_counts[i] as f64)
        .collect();

    let period_labels = (0..observed_periods)
        .map(|i| format!("{} {i}", period_type.label()))
        .collect();

    Ok(CohortAnalysis {
        cohorts,
        average_retention,
        period_labels,
    })
}

/// Cohort bucket key for a cohort date: `YYYY-MM-DD` for days, the Monday of
/// the week for weeks, `YYYY-MM` for months.
fn bucket_key(cohort_day: NaiveDate, period_type: PeriodType) -> String {
    match period_type {
        PeriodType::Day => cohort_day.to_string(),
        PeriodType::Week => {
            let monday =
                cohort_day - Duration::days(i64::from(cohort_day.weekday().num_days_from_monday()));
            monday.to_string()
        }
        PeriodType::Month => format!("{:04}-{:02}", cohort_day.year(), cohort_day.month()),
    }
}

/// Period index of `event_day` relative to `cohort_day`; `None` when the
/// event precedes the cohort date. Day/week use integer division of elapsed
/// days, month uses the calendar difference.
fn period_index(cohort_day: NaiveDate, event_day: NaiveDate, period_type: PeriodType) -> Option<usize> {
    match period_type {
        PeriodType::Day | PeriodType::Week => {
            let days = (event_day - cohort_day).num_days();
            if days < 0 {
                return None;
            }
            let divisor = if period_type == PeriodType::Week { 7 } else { 1 };
            Some((days / divisor) as usize)
        }
        PeriodType::Month => {
            let months = (i64::from(event_day.year()) - i64::from(cohort_day.year())) * 12
                + (i64::from(event_day.month()) - i64::from(cohort_day.month()));
            if months < 0 {
                return None;
            }
            Some(months as usize)
        }
    }
}
