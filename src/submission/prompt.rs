use anyhow::Result;
use std::io::BufRead;

use super::catalog::{resolve_elective, ELECTIVE_CATALOG};
use super::types::{CoreSubjectNames, RawElective, RawSubmission};
use crate::prompt::{prompt_from, prompt_yes_no_from};
use crate::scoring::Grade;

fn grade_choices() -> String {
    Grade::SCORED
        .iter()
        .map(|g| g.symbol())
        .collect::<Vec<_>>()
        .join("/")
}

/// Ask for a grade until the input is blank or a valid symbol.
fn prompt_grade(reader: &mut impl BufRead, label: &str, allow_attained: bool) -> Result<Option<String>> {
    let choices = if allow_attained {
        "A/U".to_string()
    } else {
        grade_choices()
    };
    loop {
        let input = prompt_from(reader, &format!("{} ({}, blank to skip): ", label, choices))?;
        if input.is_empty() {
            return Ok(None);
        }
        match Grade::parse(&input) {
            Ok(Grade::Attained) if !allow_attained => {
                println!("  A is only used for Citizenship and Social Development. Try again.")
            }
            Ok(g) if allow_attained && g != Grade::Attained && g != Grade::Unclassified => {
                println!("  Enter A (attained) or U. Try again.")
            }
            Ok(_) => return Ok(Some(input)),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

/// Interactive grade entry on stdin. Produces a raw submission that still
/// goes through the normal validation.
pub fn prompt_for_submission(names: &CoreSubjectNames, elective_cap: usize) -> Result<RawSubmission> {
    prompt_submission_from(&mut std::io::stdin().lock(), names, elective_cap)
}

/// Grade entry reading answers from `reader`. Running out of input is an
/// error.
pub fn prompt_submission_from(
    reader: &mut impl BufRead,
    names: &CoreSubjectNames,
    elective_cap: usize,
) -> Result<RawSubmission> {
    println!();
    println!("HKDSE Score Estimator");
    println!("=====================");
    println!();

    let chi = prompt_grade(reader, &names.first_language, false)?;
    let eng = prompt_grade(reader, &names.second_language, false)?;
    let math = prompt_grade(reader, &names.mathematics, false)?;
    let csd = prompt_grade(reader, "公民與社會發展", true)?;

    println!();
    println!("Electives (up to {}):", elective_cap);
    for (i, name) in ELECTIVE_CATALOG.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, name);
    }

    let mut electives = Vec::new();
    let mut add_more = elective_cap > 0 && prompt_yes_no_from(reader, "Add an elective?", true)?;
    while add_more {
        let subject = loop {
            let s = prompt_from(reader, &format!("  Elective {} (number or name): ", electives.len() + 1))?;
            if !s.is_empty() {
                break resolve_elective(&s);
            }
            println!("  Subject is required.");
        };

        // Only graded electives take up a slot
        match prompt_grade(reader, &format!("  Grade for {}", subject), false)? {
            Some(grade) => electives.push(RawElective {
                subject,
                grade: Some(grade),
            }),
            None => println!("  Skipped {} (no grade).", subject),
        }

        if electives.len() >= elective_cap {
            println!("  Reached the limit of {} electives.", elective_cap);
            break;
        }
        add_more = prompt_yes_no_from(reader, "  Add another elective?", false)?;
    }

    Ok(RawSubmission {
        chi,
        eng,
        math,
        csd,
        electives,
    })
}
