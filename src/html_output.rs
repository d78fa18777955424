//! HTML output format for analysis reports
//!
//! Standalone document with embedded CSS: summary tables, horizontal bar
//! charts for conversion rates, and a recommendation banner. Replaces
//! image-based chart artifacts with a single self-contained file.

use crate::analysis::{Assessment, Recommendation};
use crate::covariates::Breakdowns;
use crate::dataset::Exploration;

/// HTML report builder
#[derive(Debug)]
pub struct HtmlReport<'a> {
    assessment: &'a Assessment,
    exploration: Option<&'a Exploration>,
    breakdowns: Option<&'a Breakdowns>,
}

impl<'a> HtmlReport<'a> {
    /// Create a report over one assessment and its optional sections
    pub fn new(
        assessment: &'a Assessment,
        exploration: Option<&'a Exploration>,
        breakdowns: Option<&'a Breakdowns>,
    ) -> Self {
        Self {
            assessment,
            exploration,
            breakdowns,
        }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        .metric {
            font-family: monospace;
        }
        .bar-track {
            background-color: #e8e8e8;
            border-radius: 3px;
            width: 100%;
        }
        .bar {
            background-color: #4a90d9;
            border-radius: 3px;
            color: white;
            font-size: 0.85em;
            padding: 3px 6px;
            white-space: nowrap;
        }
        .bar-b {
            background-color: #5cb85c;
        }
        .banner {
            border-radius: 4px;
            color: white;
            font-size: 1.1em;
            font-weight: bold;
            margin-bottom: 20px;
            padding: 14px;
        }
        .banner-implement {
            background-color: #5cb85c;
        }
        .banner-do-not-implement {
            background-color: #d9534f;
        }
        .banner-continue-testing {
            background-color: #f0ad4e;
        }
        .caveat {
            color: #8a6d3b;
            font-size: 0.9em;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>A/B Test Report</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <h1>A/B Test Report</h1>\n");

        html.push_str(&self.render_banner());
        html.push_str(&self.render_rate_chart());
        html.push_str(&self.render_test_table());

        if let Some(exploration) = self.exploration {
            html.push_str(&Self::render_exploration(exploration));
        }
        if let Some(breakdowns) = self.breakdowns {
            html.push_str(&Self::render_breakdowns(breakdowns));
        }

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by Cotejar - A/B Test Analyzer\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }

    fn render_banner(&self) -> String {
        let class = match self.assessment.recommendation {
            Recommendation::Implement => "banner-implement",
            Recommendation::DoNotImplement => "banner-do-not-implement",
            Recommendation::ContinueTesting => "banner-continue-testing",
        };

        format!(
            "    <div class=\"banner {class}\">Recommendation: {} (p = {:.6}, alpha = {})</div>\n",
            self.assessment.recommendation, self.assessment.test.p_value, self.assessment.alpha
        )
    }

    /// Conversion rates as a horizontal bar chart
    fn render_rate_chart(&self) -> String {
        let a = &self.assessment.group_a;
        let b = &self.assessment.group_b;
        let scale = a.rate.max(b.rate).max(1e-9);

        let mut html = String::new();
        html.push_str("    <h2>Conversion Rates</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>Group</th><th>Converted</th><th style=\"width: 60%\">Rate</th></tr>\n");

        for (summary, class) in [(a, "bar"), (b, "bar bar-b")] {
            let width = (summary.rate / scale * 100.0).round();
            html.push_str(&format!(
                "        <tr><td>Group {}</td><td class=\"metric\">{}/{}</td>\
                 <td><div class=\"bar-track\"><div class=\"{class}\" style=\"width: {width}%\">{:.2}%</div></div></td></tr>\n",
                summary.group,
                summary.successes,
                summary.total,
                summary.rate * 100.0
            ));
        }

        html.push_str("    </table>\n");
        html
    }

    fn render_test_table(&self) -> String {
        let assessment = self.assessment;
        let test = &assessment.test;
        let coverage = (1.0 - assessment.alpha) * 100.0;

        let mut html = String::new();
        html.push_str("    <h2>Statistical Test</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>Metric</th><th>Value</th></tr>\n");

        let mut row = |metric: &str, value: String| {
            html.push_str(&format!(
                "        <tr><td>{}</td><td class=\"metric\">{}</td></tr>\n",
                Self::escape_html(metric),
                Self::escape_html(&value)
            ));
        };

        row("Z-statistic", format!("{:.4}", test.z_statistic));
        row("P-value", format!("{:.6}", test.p_value));
        row("Cohen's h", format!("{:.4}", test.effect_size));
        row(
            &format!("Group A {coverage:.0}% CI"),
            format!("[{:.4}, {:.4}]", test.ci_a.lower, test.ci_a.upper),
        );
        row(
            &format!("Group B {coverage:.0}% CI"),
            format!("[{:.4}, {:.4}]", test.ci_b.lower, test.ci_b.upper),
        );
        row(
            "Absolute lift",
            format!("{:+.2} pp", assessment.absolute_lift * 100.0),
        );
        row(
            "Relative lift",
            match assessment.relative_lift {
                Some(lift) => format!("{lift:+.2}%"),
                None => "undefined".to_string(),
            },
        );

        html.push_str("    </table>\n");

        for warning in &assessment.warnings {
            html.push_str(&format!(
                "    <p class=\"caveat\">&#9888; {}</p>\n",
                Self::escape_html(warning)
            ));
        }

        html
    }

    fn render_exploration(exploration: &Exploration) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Dataset</h2>\n");
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>Metric</th><th>Value</th></tr>\n");
        for (metric, value) in [
            ("Rows", exploration.rows),
            ("Group A rows", exploration.group_a_rows),
            ("Group B rows", exploration.group_b_rows),
            ("Converted", exploration.converted),
            ("Not converted", exploration.not_converted),
            ("Missing page views", exploration.missing_page_views),
            ("Missing time spent", exploration.missing_time_spent),
            ("Missing device", exploration.missing_device),
            ("Missing location", exploration.missing_location),
        ] {
            html.push_str(&format!(
                "        <tr><td>{metric}</td><td class=\"metric\">{value}</td></tr>\n"
            ));
        }
        html.push_str("    </table>\n");
        html
    }

    fn render_breakdowns(breakdowns: &Breakdowns) -> String {
        let mut html = String::new();

        for segment_breakdown in &breakdowns.segments {
            if segment_breakdown.segments.is_empty() {
                continue;
            }
            html.push_str(&format!(
                "    <h2>Conversion by {}</h2>\n",
                Self::escape_html(&segment_breakdown.name)
            ));
            html.push_str("    <table>\n");
            html.push_str(
                "        <tr><th>Segment</th><th>Group A</th><th>Group B</th><th>Lift</th></tr>\n",
            );
            for segment in &segment_breakdown.segments {
                let fmt_rate = |rate: Option<f64>| match rate {
                    Some(rate) => format!("{:.1}%", rate * 100.0),
                    None => "n/a".to_string(),
                };
                let lift = match segment.lift_pct {
                    Some(lift) => format!("{lift:+.1}%"),
                    None => "n/a".to_string(),
                };
                html.push_str(&format!(
                    "        <tr><td>{}</td><td class=\"metric\">{}</td><td class=\"metric\">{}</td><td class=\"metric\">{lift}</td></tr>\n",
                    Self::escape_html(&segment.segment),
                    fmt_rate(segment.rate_a),
                    fmt_rate(segment.rate_b)
                ));
            }
            html.push_str("    </table>\n");
        }

        for covariate in &breakdowns.covariates {
            if covariate.group_a.is_none() && covariate.group_b.is_none() {
                continue;
            }
            html.push_str(&format!(
                "    <h2>{} by Group</h2>\n",
                Self::escape_html(&covariate.name)
            ));
            html.push_str("    <table>\n");
            html.push_str(
                "        <tr><th>Group</th><th>Mean</th><th>Median</th><th>Std Dev</th><th>Min</th><th>Max</th></tr>\n",
            );
            for (label, summary) in [("A", &covariate.group_a), ("B", &covariate.group_b)] {
                match summary {
                    Some(s) => html.push_str(&format!(
                        "        <tr><td>Group {label}</td><td class=\"metric\">{:.2}</td><td class=\"metric\">{:.2}</td><td class=\"metric\">{:.2}</td><td class=\"metric\">{:.2}</td><td class=\"metric\">{:.2}</td></tr>\n",
                        s.mean, s.median, s.stddev, s.min, s.max
                    )),
                    None => html.push_str(&format!(
                        "        <tr><td>Group {label}</td><td colspan=\"5\">no values</td></tr>\n"
                    )),
                }
            }
            html.push_str("    </table>\n");
        }

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{assess, AnalysisConfig, Group};
    use crate::covariates::compute_breakdowns;
    use crate::dataset::{Dataset, Observation};

    fn observations(successes_b: u64) -> Vec<Observation> {
        let mut observations = Vec::new();
        for group in [Group::A, Group::B] {
            let successes = match group {
                Group::A => 100,
                Group::B => successes_b,
            };
            for i in 0..1000 {
                observations.push(Observation {
                    group,
                    converted: i < successes,
                    page_views: Some(4.0),
                    time_spent: None,
                    device: Some("<script>".to_string()),
                    location: None,
                });
            }
        }
        observations
    }

    #[test]
    fn test_html_basic_structure() {
        let observations = observations(130);
        let assessment = assess(&observations, &AnalysisConfig::default()).unwrap();
        let html = HtmlReport::new(&assessment, None, None).to_html();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("A/B Test Report"));
    }

    #[test]
    fn test_html_banner_class_tracks_recommendation() {
        let implement = assess(&observations(130), &AnalysisConfig::default()).unwrap();
        let html = HtmlReport::new(&implement, None, None).to_html();
        assert!(html.contains("banner-implement"));

        let inconclusive = assess(&observations(104), &AnalysisConfig::default()).unwrap();
        let html = HtmlReport::new(&inconclusive, None, None).to_html();
        assert!(html.contains("banner-continue-testing"));
    }

    #[test]
    fn test_html_rate_bars_present() {
        let assessment = assess(&observations(130), &AnalysisConfig::default()).unwrap();
        let html = HtmlReport::new(&assessment, None, None).to_html();

        assert!(html.contains("bar-track"));
        assert!(html.contains("width: 100%")); // the larger rate fills the track
        assert!(html.contains("13.00%"));
    }

    #[test]
    fn test_html_escapes_segment_values() {
        let observations = observations(130);
        let assessment = assess(&observations, &AnalysisConfig::default()).unwrap();
        let breakdowns = compute_breakdowns(&observations);
        let html = HtmlReport::new(&assessment, None, Some(&breakdowns)).to_html();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_html_exploration_section() {
        let observations = observations(130);
        let assessment = assess(&observations, &AnalysisConfig::default()).unwrap();
        let dataset = Dataset {
            observations: observations.clone(),
        };
        let exploration = dataset.explore();
        let html = HtmlReport::new(&assessment, Some(&exploration), None).to_html();

        assert!(html.contains("<h2>Dataset</h2>"));
        assert!(html.contains("2000"));
    }
}
