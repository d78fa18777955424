// Recommendation mapping and experiment assessment
//
// The decision rule is total and exhaustive over (p_value, rate_a, rate_b):
// non-significant results continue testing; significant results implement or
// reject based solely on the sign of the rate difference. Covariates never
// reach this function - they are reported as supplementary breakdowns only.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::AnalysisConfig;
use super::metrics::{absolute_lift, relative_lift, summarize_groups, GroupSummary};
use super::ztest::{two_proportion_ztest, TestResult};
use super::{AnalysisError, Result};
use crate::dataset::Observation;

/// Business recommendation derived from the hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    /// Significant improvement - ship the change
    Implement,

    /// Significant regression - keep the baseline
    DoNotImplement,

    /// No significant difference - gather more data
    ContinueTesting,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implement => write!(f, "IMPLEMENT"),
            Self::DoNotImplement => write!(f, "DO NOT IMPLEMENT"),
            Self::ContinueTesting => write!(f, "CONTINUE TESTING"),
        }
    }
}

/// Map a test outcome to a recommendation
///
/// Exact rule, no default fallthrough:
/// - `p_value >= alpha` -> `ContinueTesting`
/// - else `rate(B) > rate(A)` -> `Implement`
/// - else -> `DoNotImplement`
pub fn recommend(
    test: &TestResult,
    a: &GroupSummary,
    b: &GroupSummary,
    alpha: f64,
) -> Recommendation {
    if test.p_value >= alpha {
        Recommendation::ContinueTesting
    } else if b.rate > a.rate {
        Recommendation::Implement
    } else {
        Recommendation::DoNotImplement
    }
}

/// Flat summary of one complete analysis run
///
/// Carries every field a reporting surface needs: both group summaries, the
/// full test result, the recommendation, lift, and the significance level
/// the decision was made at. Computed once; never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Control arm summary
    pub group_a: GroupSummary,

    /// Treatment arm summary
    pub group_b: GroupSummary,

    /// z-test outcome (statistic, p-value, intervals, effect size)
    pub test: TestResult,

    /// Recommendation under the configured significance level
    pub recommendation: Recommendation,

    /// Significance level the decision used
    pub alpha: f64,

    /// rate(B) - rate(A)
    pub absolute_lift: f64,

    /// Relative lift in percent; absent when the baseline rate is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_lift: Option<f64>,

    /// Non-fatal caveats (small samples, wide intervals)
    pub warnings: Vec<String>,
}

impl Assessment {
    /// Whether the test cleared the significance threshold
    pub fn is_significant(&self) -> bool {
        self.test.p_value < self.alpha
    }
}

/// Run the full pipeline: metrics -> z-test -> decision
///
/// # Example
/// ```
/// use cotejar::analysis::{assess, AnalysisConfig, Group, Recommendation};
/// use cotejar::dataset::Observation;
///
/// let mut observations = Vec::new();
/// for i in 0..200 {
///     observations.push(Observation {
///         group: Group::A,
///         converted: i % 10 == 0,
///         page_views: None,
///         time_spent: None,
///         device: None,
///         location: None,
///     });
///     observations.push(Observation {
///         group: Group::B,
///         converted: i % 10 < 2,
///         page_views: None,
///         time_spent: None,
///         device: None,
///         location: None,
///     });
/// }
///
/// let assessment = assess(&observations, &AnalysisConfig::default()).unwrap();
/// assert_eq!(assessment.recommendation, Recommendation::Implement);
/// ```
pub fn assess(observations: &[Observation], config: &AnalysisConfig) -> Result<Assessment> {
    config
        .validate()
        .map_err(|details| AnalysisError::InvalidConfig { details })?;

    let (group_a, group_b) = summarize_groups(observations)?;
    let test = two_proportion_ztest(&group_a, &group_b, config.alpha, config.clip_intervals)?;
    let recommendation = recommend(&test, &group_a, &group_b, config.alpha);

    let mut warnings = Vec::new();
    for summary in [&group_a, &group_b] {
        if (summary.total as usize) < config.min_sample_size {
            tracing::warn!(
                group = %summary.group,
                total = summary.total,
                min = config.min_sample_size,
                "sample below configured minimum; normal approximation may be unreliable"
            );
            warnings.push(format!(
                "group {} has {} observations (below the configured minimum of {}); \
                 the normal approximation may be unreliable",
                summary.group, summary.total, config.min_sample_size
            ));
        }
    }
    for (summary, ci) in [(&group_a, &test.ci_a), (&group_b, &test.ci_b)] {
        // Half-width over one percentage point signals an underpowered arm
        if ci.half_width() > 0.01 {
            warnings.push(format!(
                "group {} interval is +/-{:.2} percentage points wide; \
                 a larger sample would tighten the estimate",
                summary.group,
                ci.half_width() * 100.0
            ));
        }
    }

    Ok(Assessment {
        group_a,
        group_b,
        test,
        recommendation,
        alpha: config.alpha,
        absolute_lift: absolute_lift(&group_a, &group_b),
        relative_lift: relative_lift(&group_a, &group_b),
        warnings,
    })
}
