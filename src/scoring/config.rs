use serde::{Deserialize, Serialize};

pub const DEFAULT_ELECTIVE_CAP: usize = 4;

/// Main scoring configuration.
///
/// Every field is optional; anything left out falls back to the built-in
/// HKDSE defaults.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   elective_cap: 6
///   qualification:
///     min_anchor_weight: 2
///     min_subjects: 5
///     basis: all-subjects
///   brackets:
///     - { score: 28, percentile: 90, rank: "約 Top 10%", description: "..." }
///     - { score: 14, percentile: 45, rank: "約 Top 55%", description: "..." }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Maximum number of electives a submission may carry (default: 4)
    #[serde(default)]
    pub elective_cap: Option<usize>,

    /// Minimum-qualification rule
    #[serde(default)]
    pub qualification: Option<QualificationRule>,

    /// Percentile brackets, highest threshold first
    #[serde(default)]
    pub brackets: Option<Vec<PercentileBracket>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            elective_cap: Some(DEFAULT_ELECTIVE_CAP),
            qualification: Some(QualificationRule::default()),
            brackets: Some(default_brackets()),
        }
    }
}

impl ScoringConfig {
    pub fn elective_cap(&self) -> usize {
        self.elective_cap.unwrap_or(DEFAULT_ELECTIVE_CAP)
    }

    pub fn qualification(&self) -> QualificationRule {
        self.qualification.clone().unwrap_or_default()
    }

    pub fn brackets(&self) -> Vec<PercentileBracket> {
        self.brackets.clone().unwrap_or_else(default_brackets)
    }
}

/// Which subjects count towards the "N subjects at level 2" breadth rule.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QualificationBasis {
    /// Every submitted subject, core and electives
    #[default]
    AllSubjects,
    /// Only the five highest-weighted subjects
    BestFive,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct QualificationRule {
    /// Minimum weight for both language subjects and for each counted subject
    #[serde(default = "default_min_anchor_weight")]
    pub min_anchor_weight: u32,

    /// How many subjects must reach `min_anchor_weight`
    #[serde(default = "default_min_subjects")]
    pub min_subjects: usize,

    #[serde(default)]
    pub basis: QualificationBasis,
}

fn default_min_anchor_weight() -> u32 {
    2
}

fn default_min_subjects() -> usize {
    5
}

impl Default for QualificationRule {
    fn default() -> Self {
        Self {
            min_anchor_weight: default_min_anchor_weight(),
            min_subjects: default_min_subjects(),
            basis: QualificationBasis::AllSubjects,
        }
    }
}

/// One row of the static best-five to percentile table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PercentileBracket {
    /// Lowest best-five total that falls in this bracket
    #[serde(rename = "score")]
    pub threshold_score: u32,

    /// Approximate population percentile
    pub percentile: f64,

    #[serde(rename = "rank")]
    pub rank_label: String,

    pub description: String,
}

impl PercentileBracket {
    fn new(threshold_score: u32, percentile: f64, rank_label: &str, description: &str) -> Self {
        Self {
            threshold_score,
            percentile,
            rank_label: rank_label.to_string(),
            description: description.to_string(),
        }
    }
}

pub fn default_brackets() -> Vec<PercentileBracket> {
    vec![
        PercentileBracket::new(35, 99.5, "頂尖 0.5%", "極頂尖成績"),
        PercentileBracket::new(28, 90.0, "約 Top 10%", "穩入港大/中大高競爭力學科"),
        PercentileBracket::new(23, 75.0, "約 Top 25%", "有望入讀熱門學士課程"),
        PercentileBracket::new(20, 60.0, "約 Top 40%", "穩入八大資助學士課程"),
        PercentileBracket::new(14, 45.0, "約 Top 55%", "達到學士最低要求"),
        PercentileBracket::new(10, 30.0, "約 Top 70%", "達到高級文憑/副學士基礎要求"),
        PercentileBracket::new(5, 10.0, "約 Top 90% 以下", "建議考慮其他進修途徑"),
    ]
}
