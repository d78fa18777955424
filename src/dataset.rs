//! CSV dataset loading for conversion experiments
//!
//! Parses a header-addressed CSV file into immutable [`Observation`] values.
//! Column names and label values are configuration ([`DatasetSchema`]), not
//! part of the core contract; extra columns are ignored. Unknown group or
//! outcome labels are row-level errors carrying the offending line number.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::Group;

/// Errors for dataset loading
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset has a header but no data rows")]
    Empty,

    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("line {line}: {details}")]
    BadValue { line: usize, details: String },
}

pub type Result<T> = std::result::Result<T, DatasetError>;

/// Column names and label values expected in the input file
///
/// Defaults match the conventional experiment export: `Group`/`Conversion`
/// columns with `A`/`B` and `Yes`/`No` labels, plus the four auxiliary
/// covariate columns. Override any subset via the TOML config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetSchema {
    pub group_column: String,
    pub outcome_column: String,
    pub page_views_column: String,
    pub time_spent_column: String,
    pub device_column: String,
    pub location_column: String,
    pub group_a_label: String,
    pub group_b_label: String,
    pub success_label: String,
    pub failure_label: String,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            group_column: "Group".to_string(),
            outcome_column: "Conversion".to_string(),
            page_views_column: "Page Views".to_string(),
            time_spent_column: "Time Spent".to_string(),
            device_column: "Device".to_string(),
            location_column: "Location".to_string(),
            group_a_label: "A".to_string(),
            group_b_label: "B".to_string(),
            success_label: "Yes".to_string(),
            failure_label: "No".to_string(),
        }
    }
}

/// One experiment row, immutable once loaded
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub group: Group,
    pub converted: bool,
    pub page_views: Option<f32>,
    pub time_spent: Option<f32>,
    pub device: Option<String>,
    pub location: Option<String>,
}

/// A loaded experiment dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    pub observations: Vec<Observation>,
}

/// Dataset shape summary for the exploration report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exploration {
    pub rows: usize,
    pub group_a_rows: usize,
    pub group_b_rows: usize,
    pub converted: usize,
    pub not_converted: usize,
    pub missing_page_views: usize,
    pub missing_time_spent: usize,
    pub missing_device: usize,
    pub missing_location: usize,
}

impl Dataset {
    /// Load and parse a CSV dataset file
    pub fn from_file<P: AsRef<Path>>(path: P, schema: &DatasetSchema) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|source| DatasetError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;

        Self::from_csv(&contents, schema)
    }

    /// Parse CSV text into observations
    pub fn from_csv(contents: &str, schema: &DatasetSchema) -> Result<Self> {
        let mut lines = contents.lines().enumerate();

        let header = loop {
            match lines.next() {
                Some((_, line)) if line.trim().is_empty() => continue,
                Some((_, line)) => break split_csv_line(line),
                None => return Err(DatasetError::Empty),
            }
        };

        let columns = ColumnIndex::locate(&header, schema)?;

        let mut observations = Vec::new();
        for (index, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            // enumerate() is zero-based; humans and editors count from one
            observations.push(parse_row(line, index + 1, &columns, schema)?);
        }

        if observations.is_empty() {
            return Err(DatasetError::Empty);
        }

        Ok(Self { observations })
    }

    /// Summarize dataset shape, distributions, and missing values
    pub fn explore(&self) -> Exploration {
        let mut report = Exploration {
            rows: self.observations.len(),
            group_a_rows: 0,
            group_b_rows: 0,
            converted: 0,
            not_converted: 0,
            missing_page_views: 0,
            missing_time_spent: 0,
            missing_device: 0,
            missing_location: 0,
        };

        for obs in &self.observations {
            match obs.group {
                Group::A => report.group_a_rows += 1,
                Group::B => report.group_b_rows += 1,
            }
            if obs.converted {
                report.converted += 1;
            } else {
                report.not_converted += 1;
            }
            if obs.page_views.is_none() {
                report.missing_page_views += 1;
            }
            if obs.time_spent.is_none() {
                report.missing_time_spent += 1;
            }
            if obs.device.is_none() {
                report.missing_device += 1;
            }
            if obs.location.is_none() {
                report.missing_location += 1;
            }
        }

        report
    }
}

/// Resolved positions of schema columns within the header row
struct ColumnIndex {
    group: usize,
    outcome: usize,
    page_views: Option<usize>,
    time_spent: Option<usize>,
    device: Option<usize>,
    location: Option<usize>,
}

impl ColumnIndex {
    fn locate(header: &[String], schema: &DatasetSchema) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);

        let require = |name: &str| {
            find(name).ok_or_else(|| DatasetError::MissingColumn {
                column: name.to_string(),
            })
        };

        Ok(Self {
            group: require(&schema.group_column)?,
            outcome: require(&schema.outcome_column)?,
            page_views: find(&schema.page_views_column),
            time_spent: find(&schema.time_spent_column),
            device: find(&schema.device_column),
            location: find(&schema.location_column),
        })
    }
}

fn parse_row(
    line: &str,
    line_number: usize,
    columns: &ColumnIndex,
    schema: &DatasetSchema,
) -> Result<Observation> {
    let fields = split_csv_line(line);

    let field = |index: usize| {
        fields
            .get(index)
            .map(|f| f.trim())
            .ok_or_else(|| DatasetError::BadValue {
                line: line_number,
                details: format!("expected at least {} columns, got {}", index + 1, fields.len()),
            })
    };

    let group_value = field(columns.group)?;
    let group = if group_value == schema.group_a_label {
        Group::A
    } else if group_value == schema.group_b_label {
        Group::B
    } else {
        return Err(DatasetError::BadValue {
            line: line_number,
            details: format!(
                "unknown group label '{group_value}' (expected '{}' or '{}')",
                schema.group_a_label, schema.group_b_label
            ),
        });
    };

    let outcome_value = field(columns.outcome)?;
    let converted = if outcome_value == schema.success_label {
        true
    } else if outcome_value == schema.failure_label {
        false
    } else {
        return Err(DatasetError::BadValue {
            line: line_number,
            details: format!(
                "unknown outcome label '{outcome_value}' (expected '{}' or '{}')",
                schema.success_label, schema.failure_label
            ),
        });
    };

    let numeric = |index: Option<usize>, name: &str| -> Result<Option<f32>> {
        let Some(index) = index else { return Ok(None) };
        let Some(raw) = fields.get(index).map(|f| f.trim()) else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<f32>()
            .map(Some)
            .map_err(|_| DatasetError::BadValue {
                line: line_number,
                details: format!("column '{name}' has non-numeric value '{raw}'"),
            })
    };

    let text = |index: Option<usize>| -> Option<String> {
        index
            .and_then(|i| fields.get(i))
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(str::to_string)
    };

    Ok(Observation {
        group,
        converted,
        page_views: numeric(columns.page_views, &schema.page_views_column)?,
        time_spent: numeric(columns.time_spent, &schema.time_spent_column)?,
        device: text(columns.device),
        location: text(columns.location),
    })
}

/// Split one CSV line, honoring double-quoted fields and escaped quotes
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
User ID,Group,Page Views,Time Spent,Conversion,Device,Location
1,A,5,120.5,No,Desktop,England
2,B,8,300.0,Yes,Mobile,Scotland
3,A,3,80.25,Yes,Mobile,Wales
4,B,6,210.0,No,Desktop,England
";

    #[test]
    fn test_parse_basic_dataset() {
        let dataset = Dataset::from_csv(SAMPLE, &DatasetSchema::default()).unwrap();
        assert_eq!(dataset.observations.len(), 4);

        let first = &dataset.observations[0];
        assert_eq!(first.group, Group::A);
        assert!(!first.converted);
        assert_eq!(first.page_views, Some(5.0));
        assert_eq!(first.time_spent, Some(120.5));
        assert_eq!(first.device.as_deref(), Some("Desktop"));
        assert_eq!(first.location.as_deref(), Some("England"));
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = "Group,Conversion,Unrelated\nA,Yes,junk\nB,No,junk\n";
        let dataset = Dataset::from_csv(csv, &DatasetSchema::default()).unwrap();
        assert_eq!(dataset.observations.len(), 2);
    }

    #[test]
    fn test_quoted_field_with_comma() {
        let csv = "Group,Conversion,Location\nA,Yes,\"York, North\"\nB,No,Leeds\n";
        let dataset = Dataset::from_csv(csv, &DatasetSchema::default()).unwrap();
        assert_eq!(
            dataset.observations[0].location.as_deref(),
            Some("York, North")
        );
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Group,Outcome\nA,Yes\n";
        let err = Dataset::from_csv(csv, &DatasetSchema::default()).unwrap_err();
        match err {
            DatasetError::MissingColumn { column } => assert_eq!(column, "Conversion"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_group_label_reports_line() {
        let csv = "Group,Conversion\nA,Yes\nC,No\n";
        let err = Dataset::from_csv(csv, &DatasetSchema::default()).unwrap_err();
        match err {
            DatasetError::BadValue { line, details } => {
                assert_eq!(line, 3);
                assert!(details.contains("unknown group label 'C'"));
            }
            other => panic!("expected BadValue, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_outcome_label_reports_line() {
        let csv = "Group,Conversion\nA,Maybe\n";
        let err = Dataset::from_csv(csv, &DatasetSchema::default()).unwrap_err();
        match err {
            DatasetError::BadValue { line, details } => {
                assert_eq!(line, 2);
                assert!(details.contains("unknown outcome label 'Maybe'"));
            }
            other => panic!("expected BadValue, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_covariate() {
        let csv = "Group,Conversion,Page Views\nA,Yes,lots\n";
        let err = Dataset::from_csv(csv, &DatasetSchema::default()).unwrap_err();
        match err {
            DatasetError::BadValue { line, details } => {
                assert_eq!(line, 2);
                assert!(details.contains("non-numeric"));
            }
            other => panic!("expected BadValue, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_covariate_cell_loads_as_none() {
        let csv = "Group,Conversion,Page Views,Device\nA,Yes,,\nB,No,4,Mobile\n";
        let dataset = Dataset::from_csv(csv, &DatasetSchema::default()).unwrap();
        assert_eq!(dataset.observations[0].page_views, None);
        assert_eq!(dataset.observations[0].device, None);
        assert_eq!(dataset.observations[1].page_views, Some(4.0));
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(
            Dataset::from_csv("", &DatasetSchema::default()).unwrap_err(),
            DatasetError::Empty
        ));
    }

    #[test]
    fn test_header_only() {
        assert!(matches!(
            Dataset::from_csv("Group,Conversion\n", &DatasetSchema::default()).unwrap_err(),
            DatasetError::Empty
        ));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = "Group,Conversion\n\nA,Yes\n\nB,No\n";
        let dataset = Dataset::from_csv(csv, &DatasetSchema::default()).unwrap();
        assert_eq!(dataset.observations.len(), 2);
    }

    #[test]
    fn test_custom_schema_labels() {
        let schema = DatasetSchema {
            group_column: "variant".to_string(),
            outcome_column: "purchased".to_string(),
            group_a_label: "control".to_string(),
            group_b_label: "treatment".to_string(),
            success_label: "1".to_string(),
            failure_label: "0".to_string(),
            ..DatasetSchema::default()
        };

        let csv = "variant,purchased\ncontrol,1\ntreatment,0\n";
        let dataset = Dataset::from_csv(csv, &schema).unwrap();
        assert_eq!(dataset.observations[0].group, Group::A);
        assert!(dataset.observations[0].converted);
        assert_eq!(dataset.observations[1].group, Group::B);
        assert!(!dataset.observations[1].converted);
    }

    #[test]
    fn test_explore_counts() {
        let dataset = Dataset::from_csv(SAMPLE, &DatasetSchema::default()).unwrap();
        let report = dataset.explore();

        assert_eq!(report.rows, 4);
        assert_eq!(report.group_a_rows, 2);
        assert_eq!(report.group_b_rows, 2);
        assert_eq!(report.converted, 2);
        assert_eq!(report.not_converted, 2);
        assert_eq!(report.missing_page_views, 0);
    }

    #[test]
    fn test_explore_missing_values() {
        let csv = "Group,Conversion,Page Views\nA,Yes,\nB,No,7\n";
        let dataset = Dataset::from_csv(csv, &DatasetSchema::default()).unwrap();
        let report = dataset.explore();

        assert_eq!(report.missing_page_views, 1);
        assert_eq!(report.missing_device, 2); // column absent entirely
    }

    #[test]
    fn test_split_csv_line_escaped_quote() {
        let fields = split_csv_line("a,\"say \"\"hi\"\"\",c");
        assert_eq!(fields, vec!["a", "say \"hi\"", "c"]);
    }
}
