// Two-proportion conversion analysis with statistical hypothesis testing
//
// This module implements the statistical core of the analyzer:
// - Per-group conversion metrics (counts, totals, rates)
// - Two-proportion z-test with pooled variance under the null hypothesis
// - Per-group confidence intervals (normal approximation)
// - Cohen's h effect size (arcsine transform)
// - A fixed, total decision rule mapping test outcomes to recommendations
//
// Every stage is a pure function over immutable value types; the pipeline
// flows metrics -> z-test -> decision with no shared mutable state.

use thiserror::Error;

mod config;
mod decision;
mod metrics;
mod ztest;

pub use config::AnalysisConfig;
pub use decision::{assess, recommend, Assessment, Recommendation};
pub use metrics::{absolute_lift, relative_lift, summarize_groups, Group, GroupSummary};
pub use ztest::{cohens_h, two_proportion_ztest, ConfidenceInterval, TestResult};

/// Errors for the statistical analysis pipeline
///
/// All variants are fatal: each one is a structural property of the input
/// data, not a transient condition, so there is nothing to retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("group {group} has no observations; cannot compute a conversion rate")]
    EmptyGroup { group: Group },

    #[error(
        "pooled standard error is zero (pooled proportion = {pooled}); \
         the z-test is undefined when both groups have identical degenerate outcomes"
    )]
    DegenerateVariance { pooled: f64 },

    #[error("group {group} has conversion rate {rate} outside [0, 1]")]
    InvalidRate { group: Group, rate: f64 },

    #[error("invalid analysis configuration: {details}")]
    InvalidConfig { details: String },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
