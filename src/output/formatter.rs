use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::estimate::{Report, SubjectEstimate};
use crate::reference::PercentileStatus;
use crate::submission::ELECTIVE_CATALOG;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

fn grade_label(subject: &SubjectEstimate) -> &'static str {
    subject.grade.map(|g| g.symbol()).unwrap_or("-")
}

/// Qualification line, with the civic-education result appended
pub fn format_qualification(qualified: bool, civic_attained: bool) -> String {
    let mut text = if qualified {
        "✓ 達到基礎要求 (五科 2 級)".to_string()
    } else {
        "X 未達到基礎要求 (需五科 2 級)".to_string()
    };
    text.push_str(if civic_attained {
        " | 公民科：達標"
    } else {
        " | 公民科：不達標"
    });
    text
}

/// One breakdown line per subject
pub fn format_subject_line(subject: &SubjectEstimate) -> String {
    let head = format!("{} ({})", subject.subject, grade_label(subject));
    match subject.percentile {
        PercentileStatus::Estimated(pct) => format!("{}：估計百分比 {}%", head, pct),
        PercentileStatus::Unparseable => format!("{}：CSV 有資料，但無法解析出百分比", head),
        PercentileStatus::NoData => format!("{}：無 CSV 資料", head),
        PercentileStatus::NotGraded => format!("{}：未填寫成績", head),
    }
}

pub fn format_average(report: &Report) -> String {
    match report.average_percentile {
        Some(avg) => format!("基於 {} 科的估計百分位：{}%", report.estimated_subjects, avg),
        None => "無足夠 CSV 百分比資料進行估計".to_string(),
    }
}

/// Full human-readable report
pub fn format_report(report: &Report, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let total = report.best_five_total.to_string();
    let qualification = format_qualification(report.qualified, report.civic_attained);
    if use_colors {
        lines.push(format!("Best five:      {}", total.bold()));
        lines.push(format!("Rank:           {}", report.classification.rank_label.cyan()));
        lines.push(format!("Percentile:     {}", report.classification.percentile_text));
        if report.qualified {
            lines.push(format!("Qualification:  {}", qualification.green()));
        } else {
            lines.push(format!("Qualification:  {}", qualification.red()));
        }
    } else {
        lines.push(format!("Best five:      {}", total));
        lines.push(format!("Rank:           {}", report.classification.rank_label));
        lines.push(format!("Percentile:     {}", report.classification.percentile_text));
        lines.push(format!("Qualification:  {}", qualification));
    }

    lines.push(String::new());
    lines.push("Subjects:".to_string());
    for subject in &report.subjects {
        let marker = if subject.counted { "*" } else { " " };
        let weight = format!("{:>2}", subject.weight);
        let detail = format_subject_line(subject);
        if use_colors && !subject.counted {
            lines.push(format!("  {} {}  {}", marker, weight.dimmed(), detail.dimmed()));
        } else if use_colors {
            lines.push(format!("  {} {}  {}", marker.yellow(), weight.bold(), detail));
        } else {
            lines.push(format!("  {} {}  {}", marker, weight, detail));
        }
    }

    lines.push(String::new());
    let average = format_average(report);
    if use_colors && report.average_percentile.is_none() {
        lines.push(average.dimmed().to_string());
    } else {
        lines.push(average);
    }

    lines.join("\n")
}

/// Format the per-subject breakdown as tab-separated values for scripting
/// Columns: subject, grade, weight, counted, percentage (no headers, no colors)
pub fn format_tsv(report: &Report) -> String {
    report
        .subjects
        .iter()
        .map(|s| {
            let pct = s
                .percentile
                .value()
                .map(|v| v.to_string())
                .unwrap_or_default();
            format!(
                "{}\t{}\t{}\t{}\t{}",
                s.subject,
                grade_label(s),
                s.weight,
                if s.counted { 1 } else { 0 },
                pct
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_json(report: &Report) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Numbered elective catalog, one subject per line
pub fn format_catalog(use_colors: bool) -> String {
    ELECTIVE_CATALOG
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let index = format!("{:>2}.", i + 1);
            if use_colors {
                format!("{} {}", index.dimmed(), name)
            } else {
                format!("{} {}", index, name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
