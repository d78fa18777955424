//! Supplementary covariate breakdowns
//!
//! Descriptive statistics for numeric covariates (page views, time spent)
//! and conversion rates per categorical segment (device, location), split by
//! experiment arm. These are reporting surfaces only: the decision rule
//! never consults them.

use aprender::stats::DescriptiveStats;
use serde::Serialize;
use std::collections::BTreeMap;
use trueno::Vector;

use crate::analysis::Group;
use crate::dataset::Observation;

/// Descriptive statistics for one numeric covariate within one arm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub mean: f32,
    pub stddev: f32,
    pub min: f32,
    pub max: f32,
    pub median: f32,
}

/// Per-arm descriptive statistics for one numeric covariate
#[derive(Debug, Clone, Serialize)]
pub struct CovariateBreakdown {
    /// Covariate name as reported (e.g. "Page Views")
    pub name: String,
    /// Absent when the arm has no values for this covariate
    pub group_a: Option<NumericSummary>,
    pub group_b: Option<NumericSummary>,
}

/// Conversion rates for one categorical segment value
#[derive(Debug, Clone, Serialize)]
pub struct SegmentRate {
    pub segment: String,
    pub total_a: u64,
    pub total_b: u64,
    /// Absent when the arm has no observations in this segment
    pub rate_a: Option<f64>,
    pub rate_b: Option<f64>,
    /// Relative lift in percent; absent when either rate is unavailable
    /// or the baseline rate is zero
    pub lift_pct: Option<f64>,
}

/// Conversion breakdown across one categorical covariate
#[derive(Debug, Clone, Serialize)]
pub struct SegmentBreakdown {
    /// Covariate name (e.g. "Device")
    pub name: String,
    /// One entry per distinct segment value, sorted by value
    pub segments: Vec<SegmentRate>,
}

/// All supplementary breakdowns for one dataset
#[derive(Debug, Clone, Serialize)]
pub struct Breakdowns {
    pub covariates: Vec<CovariateBreakdown>,
    pub segments: Vec<SegmentBreakdown>,
}

/// Compute every supplementary breakdown in one pass over the observations
pub fn compute_breakdowns(observations: &[Observation]) -> Breakdowns {
    Breakdowns {
        covariates: vec![
            numeric_breakdown(observations, "Page Views", |o| o.page_views),
            numeric_breakdown(observations, "Time Spent", |o| o.time_spent),
        ],
        segments: vec![
            segment_breakdown(observations, "Device", |o| o.device.as_deref()),
            segment_breakdown(observations, "Location", |o| o.location.as_deref()),
        ],
    }
}

/// Summarize one numeric covariate for both arms
pub fn numeric_breakdown(
    observations: &[Observation],
    name: &str,
    value: impl Fn(&Observation) -> Option<f32>,
) -> CovariateBreakdown {
    let collect = |group: Group| -> Vec<f32> {
        observations
            .iter()
            .filter(|o| o.group == group)
            .filter_map(&value)
            .collect()
    };

    CovariateBreakdown {
        name: name.to_string(),
        group_a: summarize_values(&collect(Group::A)),
        group_b: summarize_values(&collect(Group::B)),
    }
}

/// Descriptive statistics over one arm's covariate values
fn summarize_values(values: &[f32]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }

    let v = Vector::from_slice(values);

    Some(NumericSummary {
        mean: v.mean().unwrap_or(0.0),
        stddev: v.stddev().unwrap_or(0.0),
        min: v.min().unwrap_or(0.0),
        max: v.max().unwrap_or(0.0),
        median: DescriptiveStats::new(&v).quantile(0.5).unwrap_or(0.0),
    })
}

/// Conversion rate per (segment, arm) pair for one categorical covariate
pub fn segment_breakdown(
    observations: &[Observation],
    name: &str,
    value: impl Fn(&Observation) -> Option<&str>,
) -> SegmentBreakdown {
    #[derive(Default)]
    struct Counts {
        total_a: u64,
        successes_a: u64,
        total_b: u64,
        successes_b: u64,
    }

    // BTreeMap keeps segment ordering deterministic across runs
    let mut by_segment: BTreeMap<String, Counts> = BTreeMap::new();

    for obs in observations {
        let Some(segment) = value(obs) else { continue };
        let counts = by_segment.entry(segment.to_string()).or_default();
        match obs.group {
            Group::A => {
                counts.total_a += 1;
                if obs.converted {
                    counts.successes_a += 1;
                }
            }
            Group::B => {
                counts.total_b += 1;
                if obs.converted {
                    counts.successes_b += 1;
                }
            }
        }
    }

    let segments = by_segment
        .into_iter()
        .map(|(segment, counts)| {
            let rate = |successes: u64, total: u64| {
                (total > 0).then(|| successes as f64 / total as f64)
            };
            let rate_a = rate(counts.successes_a, counts.total_a);
            let rate_b = rate(counts.successes_b, counts.total_b);

            let lift_pct = match (rate_a, rate_b) {
                (Some(a), Some(b)) if a > 0.0 => Some((b - a) / a * 100.0),
                _ => None,
            };

            SegmentRate {
                segment,
                total_a: counts.total_a,
                total_b: counts.total_b,
                rate_a,
                rate_b,
                lift_pct,
            }
        })
        .collect();

    SegmentBreakdown {
        name: name.to_string(),
        segments,
    }
}
