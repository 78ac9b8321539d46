use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;
use crate::source::ReferenceConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
    #[serde(default)]
    pub reference: Option<ReferenceConfig>,
}

impl Config {
    /// Scoring config with built-in defaults filled in.
    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn reference(&self) -> ReferenceConfig {
        self.reference.clone().unwrap_or_default()
    }
}
