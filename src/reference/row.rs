use serde::Serialize;

const SUBJECT_HEADERS: [&str; 3] = ["科目", "科目_2", "subject"];
const SEX_HEADERS: [&str; 2] = ["性別", "sex"];
const CATEGORY_HEADERS: [&str; 2] = ["類別", "category"];

const TOTAL_MARKERS: [&str; 2] = ["總", "total"];
const PERCENT_MARKERS: [&str; 2] = ["百分", "percent"];

/// One row of a historical-performance table, keyed by subject.
///
/// Every column is kept in header order so that column discovery can walk
/// the row the same way the table lays it out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectReferenceRow {
    pub subject: String,
    pub sex: String,
    pub category: String,
    pub cells: Vec<(String, String)>,
}

/// How good a row is as the canonical row for its subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowPriority {
    /// Raw headcounts or anything else
    Fallback,
    /// A percentage row for one sex or sub-group
    Percentage,
    /// The all-candidates percentage row
    TotalPercentage,
}

fn strip_bom(s: &str) -> &str {
    s.trim_start_matches('\u{feff}').trim()
}

fn contains_any(haystack: &str, markers: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    markers.iter().any(|m| haystack.contains(m))
}

impl SubjectReferenceRow {
    /// Build a row from header/value pairs. Rows without a subject name are
    /// not usable and yield `None`.
    pub fn from_cells(cells: Vec<(String, String)>) -> Option<Self> {
        let lookup = |candidates: &[&str]| -> String {
            candidates
                .iter()
                .find_map(|c| {
                    cells
                        .iter()
                        .find(|(h, v)| strip_bom(h).eq_ignore_ascii_case(c) && !v.trim().is_empty())
                        .map(|(_, v)| v.trim().to_string())
                })
                .unwrap_or_default()
        };

        let subject = lookup(&SUBJECT_HEADERS);
        if subject.is_empty() {
            return None;
        }
        let sex = lookup(&SEX_HEADERS);
        let category = lookup(&CATEGORY_HEADERS);

        Some(Self {
            subject,
            sex,
            category,
            cells,
        })
    }

    pub fn priority(&self) -> RowPriority {
        let percentage = contains_any(&self.category, &PERCENT_MARKERS);
        if percentage && contains_any(&self.sex, &TOTAL_MARKERS) {
            RowPriority::TotalPercentage
        } else if percentage {
            RowPriority::Percentage
        } else {
            RowPriority::Fallback
        }
    }

    /// Raw cell value for a header, matched exactly after BOM stripping.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| strip_bom(h) == header)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_cells_finds_key_columns() {
        let row = SubjectReferenceRow::from_cells(cells(&[
            ("\u{feff}科目", "物理"),
            ("性別", "總數"),
            ("類別", "百分比"),
            ("5**", "3.1"),
        ]))
        .unwrap();
        assert_eq!(row.subject, "物理");
        assert_eq!(row.sex, "總數");
        assert_eq!(row.category, "百分比");
        assert_eq!(row.get("5**"), Some("3.1"));
    }

    #[test]
    fn test_subject_fallback_headers() {
        let row = SubjectReferenceRow::from_cells(cells(&[("科目", ""), ("科目_2", "化學")])).unwrap();
        assert_eq!(row.subject, "化學");

        let row = SubjectReferenceRow::from_cells(cells(&[("Subject", "Biology")])).unwrap();
        assert_eq!(row.subject, "Biology");
    }

    #[test]
    fn test_row_without_subject() {
        assert!(SubjectReferenceRow::from_cells(cells(&[("性別", "男"), ("5**", "1")])).is_none());
    }

    #[test]
    fn test_priority_levels() {
        let row = |sex: &str, cat: &str| {
            SubjectReferenceRow::from_cells(cells(&[("科目", "物理"), ("性別", sex), ("類別", cat)]))
                .unwrap()
        };
        assert_eq!(row("總數", "百分比").priority(), RowPriority::TotalPercentage);
        assert_eq!(row("男", "百分比").priority(), RowPriority::Percentage);
        assert_eq!(row("總數", "人數").priority(), RowPriority::Fallback);
        assert_eq!(row("Total", "Percentage").priority(), RowPriority::TotalPercentage);
        assert!(RowPriority::TotalPercentage > RowPriority::Percentage);
    }
}
