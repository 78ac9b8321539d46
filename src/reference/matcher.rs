use regex::Regex;
use std::sync::OnceLock;

use super::row::SubjectReferenceRow;
use crate::scoring::Grade;

static PERCENT_CELL: OnceLock<Regex> = OnceLock::new();
static MARKER_HEADER: OnceLock<Regex> = OnceLock::new();

fn percent_cell_re() -> &'static Regex {
    PERCENT_CELL.get_or_init(|| {
        Regex::new(r"^([0-9]+(?:\.[0-9]+)?)\s*%?$").expect("Invalid percent cell regex pattern")
    })
}

fn marker_header_re() -> &'static Regex {
    MARKER_HEADER.get_or_init(|| {
        Regex::new(r"(?i)表現|percent|%").expect("Invalid percent header regex pattern")
    })
}

/// Normalise a header for fragment matching: drop whitespace and BOMs,
/// lowercase the rest.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{feff}')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parse a cell as a percentage such as `62.3`, `62.3%` or `62.3 %`.
/// Values outside 0-100 are not percentages.
pub fn parse_percent(raw: &str) -> Option<f64> {
    let s = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let caps = percent_cell_re().captures(s)?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    (0.0..=100.0).contains(&value).then_some(value)
}

/// One strategy for locating a grade's percentage within a reference row.
pub trait ColumnMatcher {
    fn name(&self) -> &'static str;

    fn find(&self, row: &SubjectReferenceRow, grade: Grade) -> Option<f64>;
}

fn first_parseable<'a, I>(cells: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a (String, String)>,
{
    cells.into_iter().find_map(|(_, v)| parse_percent(v))
}

/// Headers containing the grade's fragments, cumulative fragments first.
pub struct GradeHeaderMatcher;

impl ColumnMatcher for GradeHeaderMatcher {
    fn name(&self) -> &'static str {
        "grade-header"
    }

    fn find(&self, row: &SubjectReferenceRow, grade: Grade) -> Option<f64> {
        grade.header_fragments().iter().find_map(|fragment| {
            let fragment = normalize_header(fragment);
            first_parseable(
                row.cells
                    .iter()
                    .filter(|(h, _)| normalize_header(h).contains(&fragment)),
            )
        })
    }
}

/// Headers that look like a performance or percentage column.
pub struct MarkerHeaderMatcher;

impl ColumnMatcher for MarkerHeaderMatcher {
    fn name(&self) -> &'static str {
        "percent-marker"
    }

    fn find(&self, row: &SubjectReferenceRow, _grade: Grade) -> Option<f64> {
        let re = marker_header_re();
        first_parseable(row.cells.iter().filter(|(h, _)| re.is_match(h)))
    }
}

/// Any cell that parses as a percentage.
pub struct AnyCellMatcher;

impl ColumnMatcher for AnyCellMatcher {
    fn name(&self) -> &'static str {
        "any-cell"
    }

    fn find(&self, row: &SubjectReferenceRow, _grade: Grade) -> Option<f64> {
        first_parseable(&row.cells)
    }
}

/// Matchers in the order they are tried.
pub fn default_matchers() -> [&'static dyn ColumnMatcher; 3] {
    [&GradeHeaderMatcher, &MarkerHeaderMatcher, &AnyCellMatcher]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> SubjectReferenceRow {
        let mut cells = vec![("科目".to_string(), "物理".to_string())];
        cells.extend(pairs.iter().map(|(h, v)| (h.to_string(), v.to_string())));
        SubjectReferenceRow::from_cells(cells).unwrap()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff} 5*+ (%) "), "5*+(%)");
        assert_eq!(normalize_header("Percent Attained"), "percentattained");
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("62.3%"), Some(62.3));
        assert_eq!(parse_percent(" 40 "), Some(40.0));
        assert_eq!(parse_percent("7.5 %"), Some(7.5));
        assert_eq!(parse_percent("\u{feff}100"), Some(100.0));
        assert_eq!(parse_percent("0"), Some(0.0));
    }

    #[test]
    fn test_parse_percent_rejects_non_percentages() {
        assert_eq!(parse_percent("100.1"), None);
        assert_eq!(parse_percent("2024"), None);
        assert_eq!(parse_percent("-5"), None);
        assert_eq!(parse_percent("N/A"), None);
        assert_eq!(parse_percent(""), None);
        assert_eq!(parse_percent("M1"), None);
    }

    #[test]
    fn test_grade_header_prefers_cumulative() {
        let row = row(&[("5*", "10.0"), ("5*+(%)", "62.3%")]);
        assert_eq!(GradeHeaderMatcher.find(&row, Grade::FiveStar), Some(62.3));
    }

    #[test]
    fn test_grade_header_falls_back_to_exact() {
        let row = row(&[("5**", "3.2"), ("5*", "10.0")]);
        assert_eq!(GradeHeaderMatcher.find(&row, Grade::FiveStar), Some(10.0));
    }

    #[test]
    fn test_grade_header_case_and_space_insensitive() {
        let row = row(&[("Level  U", "99.0")]);
        assert_eq!(GradeHeaderMatcher.find(&row, Grade::Unclassified), Some(99.0));
    }

    #[test]
    fn test_grade_header_skips_unparseable_match() {
        let row = row(&[("4+ 人數", "5123"), ("4+ (%)", "45.5")]);
        assert_eq!(GradeHeaderMatcher.find(&row, Grade::Four), Some(45.5));
    }

    #[test]
    fn test_attained_has_no_grade_header() {
        let row = row(&[("A", "90")]);
        assert_eq!(GradeHeaderMatcher.find(&row, Grade::Attained), None);
    }

    #[test]
    fn test_marker_header() {
        let row = row(&[("考生人數", "8000"), ("整體表現", "abc"), ("Percent", "33.3")]);
        assert_eq!(MarkerHeaderMatcher.find(&row, Grade::Two), Some(33.3));
    }

    #[test]
    fn test_any_cell() {
        let row = row(&[("考生人數", "8000"), ("備註", "12.5")]);
        assert_eq!(AnyCellMatcher.find(&row, Grade::Two), Some(12.5));
        assert_eq!(MarkerHeaderMatcher.find(&row, Grade::Two), None);
    }

    #[test]
    fn test_matcher_order() {
        let names: Vec<_> = default_matchers().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["grade-header", "percent-marker", "any-cell"]);
    }
}
