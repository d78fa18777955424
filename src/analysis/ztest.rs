// Two-proportion z-test with confidence intervals and effect size
//
// Scientific Foundation:
// - Normal approximation to the sampling distribution of a difference of
//   binomial proportions, pooled variance under the null (equal proportions)
// - Two-sided p-value from the standard normal CDF (never a t-distribution)
// - Per-group Wald intervals use the per-group (unpooled) standard error
// - Cohen's h uses the arcsine-square-root transform to stabilize variance
//
// The CDF and quantile are the Abramowitz & Stegun rational approximations
// (7.1.26 for erf, 26.2.23 for the quantile), evaluated in f64. Both are
// deterministic pure arithmetic, so identical inputs give bit-identical
// results across runs.

use serde::{Deserialize, Serialize};

use super::metrics::{Group, GroupSummary};
use super::{AnalysisError, Result};

/// Interval bounds for a population proportion, in probability space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Full width of the interval
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Half-width (margin of error)
    pub fn half_width(&self) -> f64 {
        self.width() / 2.0
    }
}

/// Result of comparing two conversion rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// z-statistic for rate(B) - rate(A) under the pooled null
    pub z_statistic: f64,

    /// Two-sided p-value - probability the observed difference is chance
    /// - p < alpha: statistically significant
    /// - p >= alpha: not significant (noise/random variation)
    pub p_value: f64,

    /// Confidence interval for group A's rate at level 1 - alpha
    pub ci_a: ConfidenceInterval,

    /// Confidence interval for group B's rate at level 1 - alpha
    pub ci_b: ConfidenceInterval,

    /// Cohen's h effect size for the rate difference
    pub effect_size: f64,
}

/// Compare two independent conversion summaries with a pooled z-test
///
/// # Arguments
/// * `a` - Control arm summary
/// * `b` - Treatment arm summary
/// * `alpha` - Significance level; also sets interval coverage (1 - alpha)
/// * `clip_intervals` - Clip interval bounds to [0, 1] after construction
///
/// # Errors
/// `DegenerateVariance` when the pooled standard error is zero (all
/// observations share one outcome across both arms); `InvalidRate` if either
/// summary carries a rate outside [0, 1].
///
/// # Example
/// ```
/// use cotejar::analysis::{two_proportion_ztest, Group, GroupSummary};
///
/// let a = GroupSummary::from_counts(Group::A, 100, 1000).unwrap();
/// let b = GroupSummary::from_counts(Group::B, 130, 1000).unwrap();
///
/// let result = two_proportion_ztest(&a, &b, 0.05, true).unwrap();
/// assert!(result.p_value < 0.05); // significant difference
/// ```
pub fn two_proportion_ztest(
    a: &GroupSummary,
    b: &GroupSummary,
    alpha: f64,
    clip_intervals: bool,
) -> Result<TestResult> {
    let pooled = (a.successes + b.successes) as f64 / (a.total + b.total) as f64;
    let se_null =
        (pooled * (1.0 - pooled) * (1.0 / a.total as f64 + 1.0 / b.total as f64)).sqrt();

    if se_null == 0.0 {
        return Err(AnalysisError::DegenerateVariance { pooled });
    }

    let z_statistic = (b.rate - a.rate) / se_null;
    let p_value = 2.0 * (1.0 - normal_cdf(z_statistic.abs()));

    let z_crit = normal_quantile(1.0 - alpha / 2.0);
    let ci_a = confidence_interval(a, z_crit, clip_intervals);
    let ci_b = confidence_interval(b, z_crit, clip_intervals);

    let effect_size = cohens_h(a.rate, b.rate)?;

    Ok(TestResult {
        z_statistic,
        p_value,
        ci_a,
        ci_b,
        effect_size,
    })
}

/// Wald interval for one arm's rate, using the per-group standard error
fn confidence_interval(
    summary: &GroupSummary,
    z_crit: f64,
    clip: bool,
) -> ConfidenceInterval {
    let se = (summary.rate * (1.0 - summary.rate) / summary.total as f64).sqrt();
    let margin = z_crit * se;

    let mut lower = summary.rate - margin;
    let mut upper = summary.rate + margin;

    if clip {
        lower = lower.max(0.0);
        upper = upper.min(1.0);
    }

    ConfidenceInterval { lower, upper }
}

/// Cohen's h: 2 * (arcsin(sqrt(rate_b)) - arcsin(sqrt(rate_a)))
///
/// Zero iff the rates are equal; sign follows the rate difference. Both
/// rates must lie in [0, 1] - structurally guaranteed by `GroupSummary`,
/// but checked here so a direct caller cannot feed the arcsine a value
/// outside its domain.
pub fn cohens_h(rate_a: f64, rate_b: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&rate_a) {
        return Err(AnalysisError::InvalidRate {
            group: Group::A,
            rate: rate_a,
        });
    }
    if !(0.0..=1.0).contains(&rate_b) {
        return Err(AnalysisError::InvalidRate {
            group: Group::B,
            rate: rate_b,
        });
    }

    Ok(2.0 * (rate_b.sqrt().asin() - rate_a.sqrt().asin()))
}

/// Standard normal CDF
fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Error function approximation (Abramowitz & Stegun 7.1.26)
fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

/// Normal quantile (inverse CDF) approximation (Abramowitz & Stegun 26.2.23)
fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    if p == 0.5 {
        return 0.0;
    }

    let q = if p > 0.5 { 1.0 - p } else { p };
    let t = (-2.0 * q.ln()).sqrt();

    let c0 = 2.515517;
    let c1 = 0.802853;
    let c2 = 0.010328;
    let d1 = 1.432788;
    let d2 = 0.189269;
    let d3 = 0.001308;

    let result = t - (c0 + c1 * t + c2 * t * t) / (1.0 + d1 * t + d2 * t * t + d3 * t * t * t);

    if p > 0.5 {
        result
    } else {
        -result
    }
}
