pub mod config;
pub mod engine;
pub mod grade;
pub mod validation;

pub use config::*;
pub use engine::{
    calculate_score, check_minimum_qualification, classify, compute_best_five_total,
    Classification, ScoreResult, SubjectContribution,
};
pub use grade::{weight_of, Grade};
pub use validation::validate_scoring;
