pub mod catalog;
pub mod prompt;
mod types;

pub use catalog::{is_known_elective, resolve_elective, ELECTIVE_CATALOG};
pub use prompt::prompt_for_submission;
pub use types::{CoreSubjectNames, RawElective, RawSubmission, SubjectResult, Submission};

use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::scoring::Grade;

/// Reasons a submission is rejected as invalid input.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("invalid grade '{value}' for {field}")]
    InvalidGrade { field: String, value: String },

    #[error("civic education must be A or U, got '{0}'")]
    InvalidCivic(String),

    #[error("elective #{0} has no subject name")]
    MissingSubject(usize),

    #[error("too many electives: {count} given, at most {cap} allowed")]
    TooManyElectives { count: usize, cap: usize },

    #[error("invalid elective '{0}' (expected NAME=GRADE)")]
    InvalidElectiveArg(String),

    #[error("malformed submission: {0}")]
    Malformed(String),

    #[error("failed to read submission: {0}")]
    Io(#[from] std::io::Error),
}

fn parse_optional_grade(field: &str, value: Option<&str>) -> Result<Option<Grade>, SubmissionError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => Grade::parse(v).map(Some).map_err(|_| SubmissionError::InvalidGrade {
            field: field.to_string(),
            value: v.to_string(),
        }),
    }
}

/// Turn a raw submission into a validated one.
///
/// Electives with a blank grade are dropped before the cap is checked, the
/// same way an unfinished form row is ignored.
pub fn validate_submission(
    raw: &RawSubmission,
    elective_cap: usize,
    names: &CoreSubjectNames,
) -> Result<Submission, SubmissionError> {
    let first = parse_optional_grade(&names.first_language, raw.chi.as_deref())?;
    let second = parse_optional_grade(&names.second_language, raw.eng.as_deref())?;
    let math = parse_optional_grade(&names.mathematics, raw.math.as_deref())?;

    let civic_attained = match raw.csd.as_deref().map(str::trim) {
        None | Some("") => false,
        Some(v) => match Grade::parse(v) {
            Ok(Grade::Attained) => true,
            Ok(Grade::Unclassified) => false,
            _ => return Err(SubmissionError::InvalidCivic(v.to_string())),
        },
    };

    let mut electives = Vec::new();
    for (i, elective) in raw.electives.iter().enumerate() {
        let subject = elective.subject.trim();
        if subject.is_empty() {
            return Err(SubmissionError::MissingSubject(i + 1));
        }
        let Some(grade) = parse_optional_grade(subject, elective.grade.as_deref())? else {
            tracing::debug!(subject, "dropping elective without a grade");
            continue;
        };
        if !is_known_elective(subject) {
            tracing::warn!(subject, "elective is not in the catalog");
        }
        electives.push(SubjectResult {
            subject: subject.to_string(),
            grade: Some(grade),
        });
    }

    if electives.len() > elective_cap {
        return Err(SubmissionError::TooManyElectives {
            count: electives.len(),
            cap: elective_cap,
        });
    }

    Ok(Submission {
        first_language: SubjectResult {
            subject: names.first_language.clone(),
            grade: first,
        },
        second_language: SubjectResult {
            subject: names.second_language.clone(),
            grade: second,
        },
        mathematics: SubjectResult {
            subject: names.mathematics.clone(),
            grade: math,
        },
        civic_attained,
        electives,
    })
}

/// Parse a raw submission from JSON or YAML text.
pub fn parse_submission(text: &str) -> Result<RawSubmission, SubmissionError> {
    if text.trim_start().starts_with('{') {
        serde_json::from_str(text).map_err(|e| SubmissionError::Malformed(e.to_string()))
    } else {
        serde_saphyr::from_str(text).map_err(|e| SubmissionError::Malformed(e.to_string()))
    }
}

/// Read a raw submission from a file, or from stdin when `path` is `-`.
pub fn load_submission(path: &Path) -> Result<RawSubmission, SubmissionError> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    parse_submission(&text)
}

/// Parse a `NAME=GRADE` command-line elective. The name may also be a
/// 1-based catalog index.
pub fn parse_elective_arg(arg: &str) -> Result<RawElective, SubmissionError> {
    let Some((name, grade)) = arg.rsplit_once('=') else {
        return Err(SubmissionError::InvalidElectiveArg(arg.to_string()));
    };
    if name.trim().is_empty() {
        return Err(SubmissionError::InvalidElectiveArg(arg.to_string()));
    }
    Ok(RawElective {
        subject: resolve_elective(name),
        grade: Some(grade.trim().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(chi: &str, eng: &str, math: &str, electives: &[(&str, &str)]) -> RawSubmission {
        RawSubmission {
            chi: Some(chi.to_string()),
            eng: Some(eng.to_string()),
            math: Some(math.to_string()),
            csd: Some("A".to_string()),
            electives: electives
                .iter()
                .map(|(s, g)| RawElective {
                    subject: s.to_string(),
                    grade: Some(g.to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_worked_example() {
        let raw = raw("5", "4", "5*", &[("物理", "5**"), ("化學", "3")]);
        let submission = validate_submission(&raw, 4, &CoreSubjectNames::default()).unwrap();

        assert_eq!(submission.first_language.subject, "中國文學");
        assert_eq!(submission.mathematics.grade, Some(Grade::FiveStar));
        assert!(submission.civic_attained);
        assert_eq!(submission.electives.len(), 2);
    }

    #[test]
    fn test_blank_core_grade_is_none() {
        let mut raw = raw("", "4", "3", &[]);
        raw.math = None;
        let submission = validate_submission(&raw, 4, &CoreSubjectNames::default()).unwrap();
        assert_eq!(submission.first_language.grade, None);
        assert_eq!(submission.mathematics.grade, None);
    }

    #[test]
    fn test_invalid_grade_rejected() {
        let raw = raw("5", "9", "4", &[]);
        let err = validate_submission(&raw, 4, &CoreSubjectNames::default()).unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidGrade { ref value, .. } if value == "9"));
        assert!(err.to_string().contains("英國文學"));
    }

    #[test]
    fn test_invalid_civic_rejected() {
        let mut raw = raw("5", "4", "4", &[]);
        raw.csd = Some("3".to_string());
        let err = validate_submission(&raw, 4, &CoreSubjectNames::default()).unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidCivic(_)));
    }

    #[test]
    fn test_civic_unattained() {
        let mut raw = raw("5", "4", "4", &[]);
        raw.csd = Some("U".to_string());
        let submission = validate_submission(&raw, 4, &CoreSubjectNames::default()).unwrap();
        assert!(!submission.civic_attained);
    }

    #[test]
    fn test_elective_cap_enforced() {
        let electives = [("物理", "3"), ("化學", "3"), ("生物", "3"), ("經濟", "3"), ("歷史", "3")];
        let raw = raw("5", "4", "4", &electives);
        let err = validate_submission(&raw, 4, &CoreSubjectNames::default()).unwrap_err();
        assert!(matches!(err, SubmissionError::TooManyElectives { count: 5, cap: 4 }));
        assert!(validate_submission(&raw, 6, &CoreSubjectNames::default()).is_ok());
    }

    #[test]
    fn test_elective_without_grade_dropped() {
        let mut raw = raw("5", "4", "4", &[("物理", "3")]);
        raw.electives.push(RawElective {
            subject: "化學".to_string(),
            grade: None,
        });
        let submission = validate_submission(&raw, 1, &CoreSubjectNames::default()).unwrap();
        assert_eq!(submission.electives.len(), 1);
    }

    #[test]
    fn test_elective_without_subject_rejected() {
        let raw = raw("5", "4", "4", &[("  ", "3")]);
        let err = validate_submission(&raw, 4, &CoreSubjectNames::default()).unwrap_err();
        assert!(matches!(err, SubmissionError::MissingSubject(1)));
    }

    #[test]
    fn test_unknown_elective_accepted() {
        let raw = raw("5", "4", "4", &[("天文", "5")]);
        let submission = validate_submission(&raw, 4, &CoreSubjectNames::default()).unwrap();
        assert_eq!(submission.electives[0].subject, "天文");
    }

    #[test]
    fn test_parse_json_submission() {
        let json = r#"{"chi":"2","eng":"1","electives":[{"subj":"物理","grade":"5**"}]}"#;
        let raw = parse_submission(json).unwrap();
        assert_eq!(raw.eng.as_deref(), Some("1"));
        assert_eq!(raw.electives[0].subject, "物理");
    }

    #[test]
    fn test_parse_malformed_submission() {
        let err = parse_submission(r#"{"chi": 5, "#).unwrap_err();
        assert!(matches!(err, SubmissionError::Malformed(_)));
        let err = parse_submission("unknown_field: 1").unwrap_err();
        assert!(matches!(err, SubmissionError::Malformed(_)));
    }

    #[test]
    fn test_parse_elective_arg() {
        let e = parse_elective_arg("物理=5**").unwrap();
        assert_eq!(e.subject, "物理");
        assert_eq!(e.grade.as_deref(), Some("5**"));

        let e = parse_elective_arg("7=4").unwrap();
        assert_eq!(e.subject, "化學");

        assert!(parse_elective_arg("物理").is_err());
        assert!(parse_elective_arg("=5").is_err());
    }

    #[test]
    fn test_load_submission_file() {
        let temp_path = std::env::temp_dir().join("dse_analysis_test_submission.yaml");
        std::fs::write(&temp_path, "chi: \"3\"\neng: \"3\"\nmath: \"3\"\n").unwrap();

        let raw = load_submission(&temp_path).unwrap();
        assert_eq!(raw.math.as_deref(), Some("3"));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_missing_submission_file() {
        let temp_path = std::env::temp_dir().join("dse_analysis_test_missing_submission.yaml");
        let _ = std::fs::remove_file(&temp_path);
        assert!(matches!(load_submission(&temp_path), Err(SubmissionError::Io(_))));
    }
}
