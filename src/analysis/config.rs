// Configuration for conversion analysis
//
// Thresholds are explicit and validated; nothing in the decision rule is
// hard-coded at a call site.

use serde::{Deserialize, Serialize};

/// Configuration for the hypothesis test and its reporting caveats
///
/// # Example
/// ```
/// use cotejar::analysis::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.alpha, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Statistical significance level (alpha) for the two-sided z-test
    ///
    /// - 0.05 (default): 95% confidence level
    /// - 0.01: 99% confidence level, stricter
    /// - 0.10: 90% confidence level, looser
    ///
    /// Also sets the coverage of the per-group confidence intervals (1 - alpha).
    pub alpha: f64,

    /// Minimum per-group sample size before the report carries a
    /// small-sample warning
    ///
    /// The normal approximation behind the z-test degrades for small groups.
    /// This never gates the test itself; it only annotates the result.
    ///
    /// Default: 30 observations per group
    pub min_sample_size: usize,

    /// Clip confidence interval bounds to [0, 1]
    ///
    /// The normal-approximation interval can extend past the probability
    /// range for rates near 0 or 1. When enabled (default), bounds are
    /// clipped after construction; when disabled, the raw bounds are kept
    /// so the approximation artifact stays visible.
    pub clip_intervals: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,         // 95% confidence (standard in practice)
            min_sample_size: 30, // rule-of-thumb floor for the normal approximation
            clip_intervals: true,
        }
    }
}

impl AnalysisConfig {
    /// Strict configuration (fewer false positives, more false negatives)
    pub fn strict() -> Self {
        Self {
            alpha: 0.01, // 99% confidence
            min_sample_size: 100,
            clip_intervals: true,
        }
    }

    /// Permissive configuration (more false positives, fewer false negatives)
    pub fn permissive() -> Self {
        Self {
            alpha: 0.10, // 90% confidence
            min_sample_size: 10,
            clip_intervals: true,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(format!("alpha must be in (0, 1), got {}", self.alpha));
        }

        if self.min_sample_size < 2 {
            return Err(format!(
                "min_sample_size must be >= 2, got {}",
                self.min_sample_size
            ));
        }

        Ok(())
    }
}
