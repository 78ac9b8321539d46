pub mod config;
pub mod estimate;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod reference;
pub mod scoring;
pub mod source;
pub mod submission;
