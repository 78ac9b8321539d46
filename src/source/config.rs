use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::submission::CoreSubjectNames;

pub const DEFAULT_CACHE_TTL: &str = "24h";

/// Where the historical-performance tables come from.
///
/// Example YAML:
/// ```yaml
/// reference:
///   general: https://example.org/2024DSE(A).csv
///   csd: ./data/2024DSE(CSD).csv
///   cache_ttl: 12h
///   core_subjects:
///     first_language: 中國語文
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    /// General-subjects table: a file path or http(s) URL
    #[serde(default)]
    pub general: Option<String>,

    /// Second-anchor-subject table: a file path or http(s) URL
    #[serde(default)]
    pub csd: Option<String>,

    /// How long a downloaded table stays fresh, e.g. "24h" or "30m"
    #[serde(default)]
    pub cache_ttl: Option<String>,

    /// Names the core subjects are looked up under
    #[serde(default)]
    pub core_subjects: Option<CoreSubjectNames>,
}

impl ReferenceConfig {
    pub fn core_subjects(&self) -> CoreSubjectNames {
        self.core_subjects.clone().unwrap_or_default()
    }

    /// Cache TTL, falling back to the default when unset or unparseable.
    /// Validation reports bad values before this is used.
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
            .as_deref()
            .and_then(|s| humantime::parse_duration(s.trim()).ok())
            .unwrap_or(Duration::from_secs(24 * 3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_config_parse() {
        let yaml = r#"
general: https://example.org/a.csv
csd: /tmp/csd.csv
cache_ttl: 30m
"#;
        let config: ReferenceConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.general.as_deref(), Some("https://example.org/a.csv"));
        assert_eq!(config.cache_ttl(), Duration::from_secs(1800));
        assert_eq!(config.core_subjects(), CoreSubjectNames::default());
    }

    #[test]
    fn test_default_ttl() {
        let config = ReferenceConfig::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(86400));
        assert_eq!(
            humantime::parse_duration(DEFAULT_CACHE_TTL).unwrap(),
            config.cache_ttl()
        );
    }
}
