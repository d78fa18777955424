//! Console report rendering
//!
//! Renders an [`Assessment`] (plus optional exploration and breakdown
//! sections) into the human-readable report. Pure presentation: every number
//! shown here is read from the value objects, never recomputed.

use crate::analysis::{Assessment, Recommendation};
use crate::covariates::Breakdowns;
use crate::dataset::Exploration;

const RULE: &str = "============================================================";

/// Render the full console report
pub fn render(
    assessment: &Assessment,
    exploration: Option<&Exploration>,
    breakdowns: Option<&Breakdowns>,
) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("\nA/B TEST ANALYSIS\n");
    report.push_str(RULE);
    report.push('\n');

    if let Some(exploration) = exploration {
        render_exploration(&mut report, exploration);
    }

    render_metrics(&mut report, assessment);
    render_test(&mut report, assessment);
    render_recommendation(&mut report, assessment);

    if !assessment.warnings.is_empty() {
        report.push_str("\n⚠️  CAVEATS\n");
        for warning in &assessment.warnings {
            report.push_str(&format!("  - {warning}\n"));
        }
    }

    if let Some(breakdowns) = breakdowns {
        render_breakdowns(&mut report, breakdowns);
    }

    report
}

fn render_exploration(report: &mut String, exploration: &Exploration) {
    report.push_str("\n📋 DATA EXPLORATION\n");
    report.push_str(&format!(
        "  Rows: {} (group A: {}, group B: {})\n",
        exploration.rows, exploration.group_a_rows, exploration.group_b_rows
    ));
    report.push_str(&format!(
        "  Outcomes: {} converted, {} not converted\n",
        exploration.converted, exploration.not_converted
    ));
    report.push_str(&format!(
        "  Missing values: page views {}, time spent {}, device {}, location {}\n",
        exploration.missing_page_views,
        exploration.missing_time_spent,
        exploration.missing_device,
        exploration.missing_location
    ));
}

fn render_metrics(report: &mut String, assessment: &Assessment) {
    let a = &assessment.group_a;
    let b = &assessment.group_b;

    report.push_str("\n📊 CONVERSION METRICS\n");
    report.push_str(&format!(
        "  Group A (control):   {}/{} converted ({:.2}%)\n",
        a.successes,
        a.total,
        a.rate * 100.0
    ));
    report.push_str(&format!(
        "  Group B (treatment): {}/{} converted ({:.2}%)\n",
        b.successes,
        b.total,
        b.rate * 100.0
    ));
    report.push_str(&format!(
        "  Absolute lift: {:+.2} percentage points\n",
        assessment.absolute_lift * 100.0
    ));
    match assessment.relative_lift {
        Some(lift) => report.push_str(&format!("  Relative lift: {lift:+.2}%\n")),
        None => report.push_str("  Relative lift: undefined (baseline rate is zero)\n"),
    }
}

fn render_test(report: &mut String, assessment: &Assessment) {
    let test = &assessment.test;
    let coverage = (1.0 - assessment.alpha) * 100.0;

    report.push_str(&format!(
        "\n🔬 STATISTICAL TEST (alpha = {})\n",
        assessment.alpha
    ));
    report.push_str(&format!("  Z-statistic: {:.4}\n", test.z_statistic));
    report.push_str(&format!("  P-value: {:.6}\n", test.p_value));
    report.push_str(&format!(
        "  Cohen's h (effect size): {:.4} ({})\n",
        test.effect_size,
        effect_magnitude(test.effect_size)
    ));
    report.push_str(&format!(
        "  Group A {coverage:.0}% CI: [{:.4}, {:.4}]\n",
        test.ci_a.lower, test.ci_a.upper
    ));
    report.push_str(&format!(
        "  Group B {coverage:.0}% CI: [{:.4}, {:.4}]\n",
        test.ci_b.lower, test.ci_b.upper
    ));
    report.push_str(&format!(
        "  Statistically significant: {}\n",
        if assessment.is_significant() { "YES" } else { "NO" }
    ));
}

fn render_recommendation(report: &mut String, assessment: &Assessment) {
    let glyph = match assessment.recommendation {
        Recommendation::Implement => "✅",
        Recommendation::DoNotImplement => "❌",
        Recommendation::ContinueTesting => "⚠️ ",
    };
    report.push_str(&format!(
        "\n{glyph} RECOMMENDATION: {}\n",
        assessment.recommendation
    ));

    match assessment.recommendation {
        Recommendation::Implement => {
            if let Some(lift) = assessment.relative_lift {
                report.push_str(&format!(
                    "  - Statistically significant improvement of {lift:.2}%\n"
                ));
            }
            report.push_str(&format!(
                "  - P-value ({:.6}) is below the significance threshold ({})\n",
                assessment.test.p_value, assessment.alpha
            ));
        }
        Recommendation::DoNotImplement => {
            if let Some(lift) = assessment.relative_lift {
                report.push_str(&format!(
                    "  - Statistically significant decrease of {:.2}%\n",
                    lift.abs()
                ));
            }
            report.push_str("  - The change is harming the conversion rate; keep the baseline\n");
        }
        Recommendation::ContinueTesting => {
            report.push_str(&format!(
                "  - Results are not statistically significant (p-value = {:.6})\n",
                assessment.test.p_value
            ));
            report.push_str("  - A larger sample or longer test duration is needed\n");
        }
    }
}

fn render_breakdowns(report: &mut String, breakdowns: &Breakdowns) {
    for segment_breakdown in &breakdowns.segments {
        if segment_breakdown.segments.is_empty() {
            continue;
        }
        report.push_str(&format!("\n🔍 {} PERFORMANCE\n", segment_breakdown.name.to_uppercase()));
        for segment in &segment_breakdown.segments {
            let fmt_rate = |rate: Option<f64>| match rate {
                Some(rate) => format!("{:.1}%", rate * 100.0),
                None => "n/a".to_string(),
            };
            let lift = match segment.lift_pct {
                Some(lift) => format!("{lift:+.1}%"),
                None => "n/a".to_string(),
            };
            report.push_str(&format!(
                "  - {}: A={}, B={} (lift: {lift})\n",
                segment.segment,
                fmt_rate(segment.rate_a),
                fmt_rate(segment.rate_b)
            ));
        }
    }

    for covariate in &breakdowns.covariates {
        if covariate.group_a.is_none() && covariate.group_b.is_none() {
            continue;
        }
        report.push_str(&format!("\n📈 {} BY GROUP\n", covariate.name.to_uppercase()));
        for (label, summary) in [("A", &covariate.group_a), ("B", &covariate.group_b)] {
            match summary {
                Some(s) => report.push_str(&format!(
                    "  Group {label}: mean={:.2}, median={:.2}, std={:.2}, min={:.2}, max={:.2}\n",
                    s.mean, s.median, s.stddev, s.min, s.max
                )),
                None => report.push_str(&format!("  Group {label}: no values\n")),
            }
        }
    }
}

/// Conventional interpretation bands for Cohen's h
fn effect_magnitude(h: f64) -> &'static str {
    let h = h.abs();
    if h < 0.2 {
        "negligible"
    } else if h < 0.5 {
        "small"
    } else if h < 0.8 {
        "medium"
    } else {
        "large"
    }
}
