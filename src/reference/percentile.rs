use serde::Serialize;

use super::matcher::{default_matchers, ColumnMatcher};
use super::table::ReferenceTable;
use crate::scoring::Grade;
use crate::submission::SubjectResult;

/// Outcome of looking up one subject in the reference table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "percentage", rename_all = "snake_case")]
pub enum PercentileStatus {
    Estimated(f64),
    /// The subject has a row, but no cell parsed as a percentage
    Unparseable,
    /// The subject is not in the table
    NoData,
    /// No grade was entered for the subject
    NotGraded,
}

impl PercentileStatus {
    pub fn value(&self) -> Option<f64> {
        match self {
            PercentileStatus::Estimated(v) => Some(*v),
            _ => None,
        }
    }
}

/// Percentage of candidates at or above `grade` in `subject`, using the
/// default matcher chain. `None` when the table has nothing usable.
pub fn estimate_percentile(subject: &str, grade: Grade, table: &ReferenceTable) -> Option<f64> {
    estimate_percentile_with(subject, grade, table, &default_matchers())
}

pub fn estimate_percentile_with(
    subject: &str,
    grade: Grade,
    table: &ReferenceTable,
    matchers: &[&dyn ColumnMatcher],
) -> Option<f64> {
    let row = table.get(subject)?;
    matchers.iter().find_map(|m| {
        let found = m.find(row, grade);
        if let Some(v) = found {
            tracing::trace!(subject, grade = %grade, matcher = m.name(), value = v, "percentage found");
        }
        found
    })
}

pub fn subject_status(subject: &str, grade: Option<Grade>, table: &ReferenceTable) -> PercentileStatus {
    let Some(grade) = grade else {
        return PercentileStatus::NotGraded;
    };
    if !table.contains(subject) {
        return PercentileStatus::NoData;
    }
    match estimate_percentile(subject, grade, table) {
        Some(v) => PercentileStatus::Estimated(v),
        None => PercentileStatus::Unparseable,
    }
}

/// Mean of the per-subject estimates that exist, rounded to one decimal.
pub fn estimate_average_percentile(results: &[SubjectResult], table: &ReferenceTable) -> Option<f64> {
    let values: Vec<f64> = results
        .iter()
        .filter_map(|r| subject_status(&r.subject, r.grade, table).value())
        .collect();
    average(&values)
}

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}
