// Per-group conversion metrics
//
// Reduces raw observations into one GroupSummary per experiment arm. This is
// the only place counts are produced; every downstream stage consumes the
// summaries, never the raw rows.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AnalysisError, Result};
use crate::dataset::Observation;

/// Experiment arm label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    /// Control group
    A,
    /// Treatment group
    B,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Conversion summary for one experiment arm
///
/// Invariants: `successes <= total`, `total > 0`, `rate` in [0, 1]. The
/// constructor rejects inputs that would break them; there is no way to build
/// a summary with an undefined rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Experiment arm this summary describes
    pub group: Group,
    /// Count of observations in the arm
    pub total: u64,
    /// Count of converted observations
    pub successes: u64,
    /// Conversion rate: successes / total
    pub rate: f64,
}

impl GroupSummary {
    /// Build a summary from raw counts
    ///
    /// Fails with `EmptyGroup` when `total` is zero (the rate would be
    /// undefined) and with `InvalidRate` when `successes` exceeds `total`.
    pub fn from_counts(group: Group, successes: u64, total: u64) -> Result<Self> {
        if total == 0 {
            return Err(AnalysisError::EmptyGroup { group });
        }
        if successes > total {
            return Err(AnalysisError::InvalidRate {
                group,
                rate: successes as f64 / total as f64,
            });
        }

        Ok(Self {
            group,
            total,
            successes,
            rate: successes as f64 / total as f64,
        })
    }

    /// Count of non-converted observations
    pub fn failures(&self) -> u64 {
        self.total - self.successes
    }
}

/// Partition observations by arm and summarize each
///
/// Fails with `EmptyGroup` if either required arm has zero observations.
/// Pure function of its input.
pub fn summarize_groups(observations: &[Observation]) -> Result<(GroupSummary, GroupSummary)> {
    let mut total_a = 0u64;
    let mut successes_a = 0u64;
    let mut total_b = 0u64;
    let mut successes_b = 0u64;

    for obs in observations {
        match obs.group {
            Group::A => {
                total_a += 1;
                if obs.converted {
                    successes_a += 1;
                }
            }
            Group::B => {
                total_b += 1;
                if obs.converted {
                    successes_b += 1;
                }
            }
        }
    }

    let summary_a = GroupSummary::from_counts(Group::A, successes_a, total_a)?;
    let summary_b = GroupSummary::from_counts(Group::B, successes_b, total_b)?;

    Ok((summary_a, summary_b))
}

/// Absolute lift in conversion rate: rate(B) - rate(A)
pub fn absolute_lift(a: &GroupSummary, b: &GroupSummary) -> f64 {
    b.rate - a.rate
}

/// Relative lift as a percentage of the baseline rate
///
/// Returns `None` when the baseline rate is zero (relative change undefined).
pub fn relative_lift(a: &GroupSummary, b: &GroupSummary) -> Option<f64> {
    if a.rate == 0.0 {
        None
    } else {
        Some((b.rate - a.rate) / a.rate * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(group: Group, converted: bool) -> Observation {
        Observation {
            group,
            converted,
            page_views: None,
            time_spent: None,
            device: None,
            location: None,
        }
    }

    #[test]
    fn test_from_counts_basic() {
        let summary = GroupSummary::from_counts(Group::A, 25, 100).unwrap();
        assert_eq!(summary.total, 100);
        assert_eq!(summary.successes, 25);
        assert_eq!(summary.failures(), 75);
        assert!((summary.rate - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_from_counts_empty_group() {
        let err = GroupSummary::from_counts(Group::B, 0, 0).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyGroup { group: Group::B });
    }

    #[test]
    fn test_from_counts_successes_exceed_total() {
        let err = GroupSummary::from_counts(Group::A, 11, 10).unwrap_err();
        match err {
            AnalysisError::InvalidRate { group, rate } => {
                assert_eq!(group, Group::A);
                assert!(rate > 1.0);
            }
            other => panic!("expected InvalidRate, got {other:?}"),
        }
    }

    #[test]
    fn test_from_counts_rate_bounds() {
        let zero = GroupSummary::from_counts(Group::A, 0, 50).unwrap();
        assert_eq!(zero.rate, 0.0);

        let full = GroupSummary::from_counts(Group::B, 50, 50).unwrap();
        assert_eq!(full.rate, 1.0);
    }

    #[test]
    fn test_summarize_groups_counts() {
        let observations = vec![
            obs(Group::A, true),
            obs(Group::A, false),
            obs(Group::A, false),
            obs(Group::B, true),
            obs(Group::B, true),
            obs(Group::B, false),
        ];

        let (a, b) = summarize_groups(&observations).unwrap();
        assert_eq!(a.total, 3);
        assert_eq!(a.successes, 1);
        assert_eq!(b.total, 3);
        assert_eq!(b.successes, 2);
    }

    #[test]
    fn test_summarize_groups_missing_arm() {
        let observations = vec![obs(Group::A, true), obs(Group::A, false)];

        let err = summarize_groups(&observations).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyGroup { group: Group::B });
    }

    #[test]
    fn test_summarize_groups_empty_input() {
        let err = summarize_groups(&[]).unwrap_err();
        assert_eq!(err, AnalysisError::EmptyGroup { group: Group::A });
    }

    #[test]
    fn test_lift_values() {
        let a = GroupSummary::from_counts(Group::A, 10, 100).unwrap();
        let b = GroupSummary::from_counts(Group::B, 13, 100).unwrap();

        assert!((absolute_lift(&a, &b) - 0.03).abs() < 1e-12);
        let rel = relative_lift(&a, &b).unwrap();
        assert!((rel - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_lift_zero_baseline() {
        let a = GroupSummary::from_counts(Group::A, 0, 100).unwrap();
        let b = GroupSummary::from_counts(Group::B, 5, 100).unwrap();
        assert!(relative_lift(&a, &b).is_none());
    }

    #[test]
    fn test_group_display() {
        assert_eq!(Group::A.to_string(), "A");
        assert_eq!(Group::B.to_string(), "B");
    }
}
