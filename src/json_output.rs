//! JSON output format for machine parsing
//!
//! Serializes the assessment (and optional exploration/breakdown sections)
//! through serde; downstream dashboards consume this instead of scraping the
//! console report.

use serde::Serialize;

use crate::analysis::Assessment;
use crate::covariates::Breakdowns;
use crate::dataset::Exploration;

/// Top-level JSON document for one analysis run
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    #[serde(flatten)]
    pub assessment: &'a Assessment,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploration: Option<&'a Exploration>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdowns: Option<&'a Breakdowns>,
}

/// Render the report as pretty-printed JSON
pub fn render(
    assessment: &Assessment,
    exploration: Option<&Exploration>,
    breakdowns: Option<&Breakdowns>,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        assessment,
        exploration,
        breakdowns,
    })
}
