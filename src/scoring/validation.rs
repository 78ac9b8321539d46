use super::config::ScoringConfig;
use super::engine::BEST_OF;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(cap) = config.elective_cap {
        if cap == 0 {
            errors.push("scoring.elective_cap: must be at least 1".to_string());
        }
    }

    if let Some(ref rule) = config.qualification {
        if rule.min_anchor_weight > 7 {
            errors.push(format!(
                "scoring.qualification.min_anchor_weight: {} exceeds the 5** weight of 7",
                rule.min_anchor_weight
            ));
        }
        if rule.min_subjects == 0 {
            errors.push("scoring.qualification.min_subjects: must be at least 1".to_string());
        }
        if rule.basis == super::QualificationBasis::BestFive && rule.min_subjects > BEST_OF {
            errors.push(format!(
                "scoring.qualification.min_subjects: {} can never be met when only the best {} count",
                rule.min_subjects, BEST_OF
            ));
        }
    }

    if let Some(ref brackets) = config.brackets {
        if brackets.is_empty() {
            errors.push("scoring.brackets: must contain at least one bracket".to_string());
        }
        for (i, bracket) in brackets.iter().enumerate() {
            if !(0.0..=100.0).contains(&bracket.percentile) {
                errors.push(format!(
                    "scoring.brackets[{}].percentile: {} is outside 0-100",
                    i, bracket.percentile
                ));
            }
            if bracket.rank_label.trim().is_empty() {
                errors.push(format!("scoring.brackets[{}].rank: must not be empty", i));
            }
        }
        for (i, pair) in brackets.windows(2).enumerate() {
            if pair[1].threshold_score >= pair[0].threshold_score {
                errors.push(format!(
                    "scoring.brackets[{}].score: {} must be lower than the previous bracket's {}",
                    i + 1,
                    pair[1].threshold_score,
                    pair[0].threshold_score
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
