//! CSV output format for the analysis summary
//!
//! One metric per row, covering every field of the assessment, suitable for
//! spreadsheet import and machine parsing.

use crate::analysis::Assessment;

/// Render the assessment as a Metric,Value table
pub fn render(assessment: &Assessment) -> String {
    let mut rows: Vec<(String, String)> = vec![
        (
            "Group A Sample Size".into(),
            assessment.group_a.total.to_string(),
        ),
        (
            "Group B Sample Size".into(),
            assessment.group_b.total.to_string(),
        ),
        (
            "Group A Conversions".into(),
            assessment.group_a.successes.to_string(),
        ),
        (
            "Group B Conversions".into(),
            assessment.group_b.successes.to_string(),
        ),
        (
            "Group A Conversion Rate".into(),
            format!("{:.4}", assessment.group_a.rate),
        ),
        (
            "Group B Conversion Rate".into(),
            format!("{:.4}", assessment.group_b.rate),
        ),
        (
            "Absolute Lift".into(),
            format!("{:.4}", assessment.absolute_lift),
        ),
        (
            "Relative Lift (%)".into(),
            match assessment.relative_lift {
                Some(lift) => format!("{lift:.2}"),
                None => String::new(),
            },
        ),
        (
            "Z-Statistic".into(),
            format!("{:.4}", assessment.test.z_statistic),
        ),
        ("P-Value".into(), format!("{:.6}", assessment.test.p_value)),
        (
            "Cohens h".into(),
            format!("{:.4}", assessment.test.effect_size),
        ),
        (
            "Group A CI Lower".into(),
            format!("{:.4}", assessment.test.ci_a.lower),
        ),
        (
            "Group A CI Upper".into(),
            format!("{:.4}", assessment.test.ci_a.upper),
        ),
        (
            "Group B CI Lower".into(),
            format!("{:.4}", assessment.test.ci_b.lower),
        ),
        (
            "Group B CI Upper".into(),
            format!("{:.4}", assessment.test.ci_b.upper),
        ),
        ("Alpha".into(), assessment.alpha.to_string()),
        (
            "Statistical Significance".into(),
            if assessment.is_significant() {
                "Yes".into()
            } else {
                "No".into()
            },
        ),
        (
            "Recommendation".into(),
            assessment.recommendation.to_string(),
        ),
    ];

    for warning in &assessment.warnings {
        rows.push(("Warning".into(), warning.clone()));
    }

    let mut output = String::from("Metric,Value\n");
    for (metric, value) in rows {
        output.push_str(&escape_field(&metric));
        output.push(',');
        output.push_str(&escape_field(&value));
        output.push('\n');
    }

    output
}

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
