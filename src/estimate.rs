use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::reference::{estimate_average_percentile, subject_status, PercentileStatus};
use crate::scoring::{calculate_score, Classification, Grade, ScoreResult};
use crate::source::{load_reference_table, CacheConfig, LoadedReference, SourceSpec};
use crate::submission::{SubjectResult, Submission};

#[derive(Debug, Clone, Serialize)]
pub struct SubjectEstimate {
    pub subject: String,
    pub grade: Option<Grade>,
    pub weight: u32,
    pub counted: bool,
    pub percentile: PercentileStatus,
}

/// Everything the estimator reports for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub best_five_total: u32,
    pub qualified: bool,
    pub civic_attained: bool,
    pub classification: Classification,
    pub subjects: Vec<SubjectEstimate>,
    /// Mean of the per-subject estimates, `None` when there is not enough data
    pub average_percentile: Option<f64>,
    /// Number of subjects the average is based on
    pub estimated_subjects: usize,
    pub reference_available: bool,
}

/// Combine a score with reference data. Pure: no I/O.
pub fn build_report(score: ScoreResult, reference: &LoadedReference) -> Report {
    let results: Vec<SubjectResult> = score
        .contributions
        .iter()
        .map(|c| SubjectResult {
            subject: c.subject.clone(),
            grade: c.grade,
        })
        .collect();
    let average_percentile = estimate_average_percentile(&results, &reference.table);

    let subjects: Vec<SubjectEstimate> = score
        .contributions
        .into_iter()
        .map(|c| {
            let percentile = subject_status(&c.subject, c.grade, &reference.table);
            SubjectEstimate {
                subject: c.subject,
                grade: c.grade,
                weight: c.weight,
                counted: c.counted,
                percentile,
            }
        })
        .collect();

    Report {
        best_five_total: score.best_five_total,
        qualified: score.qualified,
        civic_attained: score.civic_attained,
        classification: score.classification,
        estimated_subjects: subjects.iter().filter(|s| s.percentile.value().is_some()).count(),
        average_percentile,
        subjects,
        reference_available: reference.is_available(),
    }
}

/// Resolve the reference sources from config, with CLI overrides taking
/// precedence. Invalid specs were already rejected by validation.
pub fn resolve_sources(
    config: &Config,
    general_override: Option<&str>,
    csd_override: Option<&str>,
) -> Result<(Option<SourceSpec>, Option<SourceSpec>)> {
    let reference = config.reference();
    let general = general_override
        .map(str::to_string)
        .or(reference.general)
        .map(|s| SourceSpec::parse(&s))
        .transpose()?;
    let csd = csd_override
        .map(str::to_string)
        .or(reference.csd)
        .map(|s| SourceSpec::parse(&s))
        .transpose()?;
    Ok((general, csd))
}

/// Score a submission and refine it with whatever reference data loads.
///
/// Scoring never depends on the reference tables, so a missing or broken
/// source only affects the percentile fields.
pub async fn run_estimate(
    submission: &Submission,
    config: &Config,
    general: Option<&SourceSpec>,
    csd: Option<&SourceSpec>,
    cache: &CacheConfig,
) -> Report {
    let score = calculate_score(submission, &config.scoring());
    tracing::debug!(
        total = score.best_five_total,
        qualified = score.qualified,
        "scored submission"
    );

    let reference = load_reference_table(general, csd, cache).await;
    if reference.configured > 0 && !reference.is_available() {
        tracing::warn!("no reference data could be loaded; percentile estimate skipped");
    }

    build_report(score, &reference)
}
