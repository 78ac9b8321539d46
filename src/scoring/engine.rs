use serde::Serialize;

use super::config::{PercentileBracket, QualificationBasis, QualificationRule, ScoringConfig};
use super::grade::{weight_of, Grade};
use crate::submission::{SubjectResult, Submission};

/// Number of subjects that make up the headline total.
pub const BEST_OF: usize = 5;

const BELOW_TABLE_RANK: &str = "未達標";
const BELOW_TABLE_PERCENTILE: &str = "低於 10 百分位";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SubjectContribution {
    pub subject: String,
    pub grade: Option<Grade>,
    pub weight: u32,
    /// Whether this subject is one of the best five
    pub counted: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Classification {
    pub rank_label: String,
    pub percentile_text: String,
    /// Bracket percentile, `None` below the lowest threshold
    pub percentile: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub best_five_total: u32,
    pub qualified: bool,
    pub civic_attained: bool,
    pub classification: Classification,
    pub contributions: Vec<SubjectContribution>,
}

/// Sum the five highest weights. Missing slots contribute nothing.
pub fn compute_best_five_total(subjects: &[SubjectResult]) -> u32 {
    let weights: Vec<u32> = subjects.iter().map(|s| weight_of(s.grade)).collect();
    best_five_sum(&weights)
}

fn best_five_sum(weights: &[u32]) -> u32 {
    let mut sorted = weights.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.iter().take(BEST_OF).sum()
}

/// Map a best-five total onto the bracket table. The highest bracket whose
/// threshold does not exceed `total` wins.
pub fn classify(total: u32, brackets: &[PercentileBracket]) -> Classification {
    let matched = brackets
        .iter()
        .filter(|b| b.threshold_score <= total)
        .max_by_key(|b| b.threshold_score);

    match matched {
        Some(b) => Classification {
            rank_label: b.rank_label.clone(),
            percentile_text: format!("約 {} 百分位 ({})", b.percentile, b.description),
            percentile: Some(b.percentile),
        },
        None => Classification {
            rank_label: BELOW_TABLE_RANK.to_string(),
            percentile_text: BELOW_TABLE_PERCENTILE.to_string(),
            percentile: None,
        },
    }
}

/// Both language anchors must reach the minimum weight, and enough subjects
/// overall must reach it too.
pub fn check_minimum_qualification(
    first_language: u32,
    second_language: u32,
    all_weights: &[u32],
    rule: &QualificationRule,
) -> bool {
    let min = rule.min_anchor_weight;
    if first_language < min || second_language < min {
        return false;
    }

    let mut counted = all_weights.to_vec();
    if rule.basis == QualificationBasis::BestFive {
        counted.sort_unstable_by(|a, b| b.cmp(a));
        counted.truncate(BEST_OF);
    }

    counted.iter().filter(|&&w| w >= min).count() >= rule.min_subjects
}

pub fn calculate_score(submission: &Submission, config: &ScoringConfig) -> ScoreResult {
    let subjects = submission.subjects();
    let weights: Vec<u32> = subjects.iter().map(|s| weight_of(s.grade)).collect();

    // Stable sort keeps submission order among equal weights
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| weights[b].cmp(&weights[a]));
    let mut counted = vec![false; weights.len()];
    for &i in order.iter().take(BEST_OF) {
        counted[i] = true;
    }

    let contributions = subjects
        .iter()
        .zip(&weights)
        .zip(counted)
        .map(|((s, &weight), counted)| SubjectContribution {
            subject: s.subject.clone(),
            grade: s.grade,
            weight,
            counted,
        })
        .collect();

    let best_five_total = best_five_sum(&weights);
    let qualified = check_minimum_qualification(
        weight_of(submission.first_language.grade),
        weight_of(submission.second_language.grade),
        &weights,
        &config.qualification(),
    );

    ScoreResult {
        best_five_total,
        qualified,
        civic_attained: submission.civic_attained,
        classification: classify(best_five_total, &config.brackets()),
        contributions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::default_brackets;

    fn subject(name: &str, grade: &str) -> SubjectResult {
        SubjectResult {
            subject: name.to_string(),
            grade: Some(Grade::parse(grade).unwrap()),
        }
    }

    fn sample_submission() -> Submission {
        Submission {
            first_language: subject("中國文學", "5"),
            second_language: subject("英國文學", "4"),
            mathematics: subject("數學", "5*"),
            civic_attained: true,
            electives: vec![subject("物理", "5**"), subject("化學", "3")],
        }
    }

    #[test]
    fn test_best_five_worked_example() {
        let submission = sample_submission();
        let result = calculate_score(&submission, &ScoringConfig::default());

        assert_eq!(result.best_five_total, 25);
        assert!(result.qualified);
        assert!(result.civic_attained);
        assert_eq!(result.classification.rank_label, "約 Top 25%");
        assert_eq!(result.classification.percentile, Some(75.0));
    }

    #[test]
    fn test_two_subjects_zero_padded() {
        let subjects = vec![subject("中國文學", "2"), subject("英國文學", "1")];
        assert_eq!(compute_best_five_total(&subjects), 3);
        assert!(!check_minimum_qualification(2, 1, &[2, 1], &QualificationRule::default()));
    }

    #[test]
    fn test_two_anchors_pass_but_too_few_subjects() {
        assert!(!check_minimum_qualification(
            2,
            2,
            &[2, 2],
            &QualificationRule::default()
        ));
    }

    #[test]
    fn test_best_five_ignores_order() {
        let mut subjects = vec![
            subject("a", "1"),
            subject("b", "5**"),
            subject("c", "3"),
            subject("d", "5"),
            subject("e", "U"),
            subject("f", "4"),
            subject("g", "2"),
        ];
        let total = compute_best_five_total(&subjects);
        subjects.reverse();
        assert_eq!(compute_best_five_total(&subjects), total);
        subjects.swap(0, 4);
        assert_eq!(compute_best_five_total(&subjects), total);
        assert_eq!(total, 7 + 5 + 4 + 3 + 2);
    }

    #[test]
    fn test_best_five_bounds() {
        let top: Vec<_> = (0..9).map(|i| subject(&i.to_string(), "5**")).collect();
        assert_eq!(compute_best_five_total(&top), 35);
        assert_eq!(compute_best_five_total(&[]), 0);
    }

    #[test]
    fn test_missing_grade_weighs_zero() {
        let subjects = vec![
            SubjectResult {
                subject: "中國文學".to_string(),
                grade: None,
            },
            subject("數學", "4"),
        ];
        assert_eq!(compute_best_five_total(&subjects), 4);
    }

    #[test]
    fn test_classify_thresholds_inclusive() {
        let brackets = default_brackets();
        assert_eq!(classify(35, &brackets).rank_label, "頂尖 0.5%");
        assert_eq!(classify(28, &brackets).rank_label, "約 Top 10%");
        assert_eq!(classify(27, &brackets).rank_label, "約 Top 25%");
        assert_eq!(classify(5, &brackets).rank_label, "約 Top 90% 以下");
    }

    #[test]
    fn test_classify_below_table() {
        let result = classify(4, &default_brackets());
        assert_eq!(result.rank_label, "未達標");
        assert_eq!(result.percentile_text, "低於 10 百分位");
        assert!(result.percentile.is_none());
    }

    #[test]
    fn test_classify_percentile_text() {
        let result = classify(23, &default_brackets());
        assert_eq!(result.percentile_text, "約 75 百分位 (有望入讀熱門學士課程)");
        let top = classify(40, &default_brackets());
        assert_eq!(top.percentile_text, "約 99.5 百分位 (極頂尖成績)");
    }

    #[test]
    fn test_classify_monotonic() {
        let brackets = default_brackets();
        let mut last = -1.0;
        for total in 0..=40 {
            let pct = classify(total, &brackets).percentile.unwrap_or(0.0);
            assert!(pct >= last);
            last = pct;
        }
    }

    #[test]
    fn test_classify_tolerates_unsorted_table() {
        let mut brackets = default_brackets();
        brackets.reverse();
        assert_eq!(classify(24, &brackets).rank_label, "約 Top 25%");
    }

    #[test]
    fn test_qualification_requires_both_anchors() {
        let rule = QualificationRule::default();
        let strong = [7, 7, 7, 7, 7, 7];
        assert!(!check_minimum_qualification(1, 7, &strong, &rule));
        assert!(!check_minimum_qualification(7, 0, &strong, &rule));
        assert!(check_minimum_qualification(2, 2, &[2, 2, 2, 2, 2], &rule));
    }

    #[test]
    fn test_qualification_counts_all_subjects() {
        // Seven subjects; five of them at level 2 or above
        let weights = [2, 2, 7, 1, 1, 3, 2];
        assert!(check_minimum_qualification(2, 2, &weights, &QualificationRule::default()));
    }

    #[test]
    fn test_qualification_best_five_basis() {
        let rule = QualificationRule {
            basis: QualificationBasis::BestFive,
            min_subjects: 6,
            ..QualificationRule::default()
        };
        // Six qualifying subjects, but only five are ever considered
        assert!(!check_minimum_qualification(2, 2, &[2, 2, 2, 2, 2, 2], &rule));

        let all = QualificationRule {
            min_subjects: 6,
            ..QualificationRule::default()
        };
        assert!(check_minimum_qualification(2, 2, &[2, 2, 2, 2, 2, 2], &all));
    }

    #[test]
    fn test_contributions_mark_best_five() {
        let mut submission = sample_submission();
        submission.electives.push(subject("生物", "1"));
        let result = calculate_score(&submission, &ScoringConfig::default());

        assert_eq!(result.contributions.len(), 6);
        let counted: Vec<&str> = result
            .contributions
            .iter()
            .filter(|c| c.counted)
            .map(|c| c.subject.as_str())
            .collect();
        assert_eq!(counted.len(), 5);
        assert!(!counted.contains(&"生物"));
    }

    #[test]
    fn test_custom_qualification_rule_applied() {
        let config = ScoringConfig {
            qualification: Some(QualificationRule {
                min_anchor_weight: 3,
                ..QualificationRule::default()
            }),
            ..ScoringConfig::default()
        };
        // Every subject in the sample is at level 3 or above
        let result = calculate_score(&sample_submission(), &config);
        assert!(result.qualified);

        let mut weak = sample_submission();
        weak.electives[1] = subject("化學", "2");
        let result = calculate_score(&weak, &config);
        assert!(!result.qualified);
    }
}
