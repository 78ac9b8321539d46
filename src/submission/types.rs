use serde::{Deserialize, Serialize};

use crate::scoring::Grade;

/// One subject and the grade obtained. `grade` is `None` when the subject
/// was left blank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectResult {
    pub subject: String,
    pub grade: Option<Grade>,
}

/// A validated set of results: three core subjects, the civic-education
/// pass/fail flag and the electives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub first_language: SubjectResult,
    pub second_language: SubjectResult,
    pub mathematics: SubjectResult,
    pub civic_attained: bool,
    pub electives: Vec<SubjectResult>,
}

impl Submission {
    /// Core subjects first, then electives in submission order.
    pub fn subjects(&self) -> Vec<SubjectResult> {
        let mut all = vec![
            self.first_language.clone(),
            self.second_language.clone(),
            self.mathematics.clone(),
        ];
        all.extend(self.electives.iter().cloned());
        all
    }
}

/// Names the three core subjects are reported and looked up under.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CoreSubjectNames {
    #[serde(default = "default_first_language")]
    pub first_language: String,
    #[serde(default = "default_second_language")]
    pub second_language: String,
    #[serde(default = "default_mathematics")]
    pub mathematics: String,
}

fn default_first_language() -> String {
    "中國文學".to_string()
}

fn default_second_language() -> String {
    "英國文學".to_string()
}

fn default_mathematics() -> String {
    "數學".to_string()
}

impl Default for CoreSubjectNames {
    fn default() -> Self {
        Self {
            first_language: default_first_language(),
            second_language: default_second_language(),
            mathematics: default_mathematics(),
        }
    }
}

/// Submission as it arrives from a file, before validation. Grades are
/// plain strings so that a bad symbol can be reported precisely.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawSubmission {
    #[serde(default)]
    pub chi: Option<String>,
    #[serde(default)]
    pub eng: Option<String>,
    #[serde(default)]
    pub math: Option<String>,
    #[serde(default)]
    pub csd: Option<String>,
    #[serde(default)]
    pub electives: Vec<RawElective>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawElective {
    #[serde(alias = "subj")]
    pub subject: String,
    #[serde(default)]
    pub grade: Option<String>,
}
