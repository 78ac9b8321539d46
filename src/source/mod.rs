pub mod cache;
pub mod config;

pub use cache::{clear_cache, get_cache_path, CacheConfig};
pub use config::{ReferenceConfig, DEFAULT_CACHE_TTL};

use anyhow::{bail, Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::reference::{build_reference_table, parse_reference_csv, ReferenceTable, SubjectReferenceRow};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// A reference table location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Remote(String),
    Local(PathBuf),
}

impl SourceSpec {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            bail!("Source must not be empty");
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(SourceSpec::Remote(s.to_string()))
        } else if lower.contains("://") {
            bail!("Unsupported source scheme: {}", s)
        } else {
            Ok(SourceSpec::Local(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::Remote(url) => f.write_str(url),
            SourceSpec::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Validate reference configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_reference(config: &ReferenceConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (field, value) in [("general", &config.general), ("csd", &config.csd)] {
        if let Some(value) = value {
            if let Err(e) = SourceSpec::parse(value) {
                errors.push(format!("reference.{}: invalid '{}' - {}", field, value, e));
            }
        }
    }

    if let Some(ref ttl) = config.cache_ttl {
        if let Err(e) = humantime::parse_duration(ttl.trim()) {
            errors.push(format!("reference.cache_ttl: invalid '{}' - {}", ttl, e));
        }
    }

    if let Some(ref names) = config.core_subjects {
        for (field, name) in [
            ("first_language", &names.first_language),
            ("second_language", &names.second_language),
            ("mathematics", &names.mathematics),
        ] {
            if name.trim().is_empty() {
                errors.push(format!("reference.core_subjects.{}: must not be empty", field));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Reference data for one estimate, with how many sources contributed to it.
#[derive(Debug, Clone, Default)]
pub struct LoadedReference {
    pub table: ReferenceTable,
    pub configured: usize,
    pub loaded: usize,
}

impl LoadedReference {
    pub fn is_available(&self) -> bool {
        self.loaded > 0 && !self.table.is_empty()
    }
}

async fn fetch_remote(client: &reqwest::Client, url: &str, cache: &CacheConfig) -> Result<String> {
    let cached = if cache.enabled {
        cache::read_cached_table(&cache.path, url)
    } else {
        None
    };

    if let Some(ref entry) = cached {
        if cache::is_cache_fresh(entry, cache.ttl) {
            tracing::debug!(url, fetched_at = %entry.fetched_at, "using cached reference table");
            return Ok(entry.body.clone());
        }
    }

    let fetched = async {
        let response = client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Server rejected request for {}", url))?;
        response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {}", url))
    }
    .await;

    match fetched {
        Ok(body) => {
            if cache.enabled {
                // Cache write failures only cost a refetch next time
                if let Err(e) = cache::write_cached_table(&cache.path, url, &body) {
                    tracing::debug!(url, error = %e, "failed to cache reference table");
                }
            }
            Ok(body)
        }
        Err(e) => match cached {
            Some(entry) => {
                tracing::warn!(url, error = %e, "fetch failed, using stale cached table");
                Ok(entry.body)
            }
            None => Err(e),
        },
    }
}

/// Read a source's raw CSV text.
pub async fn load_source(spec: &SourceSpec, client: &reqwest::Client, cache: &CacheConfig) -> Result<String> {
    match spec {
        SourceSpec::Local(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read reference table at {}", path.display())),
        SourceSpec::Remote(url) => fetch_remote(client, url, cache).await,
    }
}

async fn load_rows(
    spec: Option<&SourceSpec>,
    client: &reqwest::Client,
    cache: &CacheConfig,
) -> Option<Result<Vec<SubjectReferenceRow>>> {
    let spec = spec?;
    let result = async {
        let text = load_source(spec, client, cache).await?;
        parse_reference_csv(&text).with_context(|| format!("Failed to parse reference table {}", spec))
    }
    .await;
    Some(result)
}

/// Install the ring rustls provider unless one is already in place
/// (required for rustls 0.23+).
pub fn ensure_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none()
        && rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
    {
        tracing::debug!("rustls crypto provider installed concurrently");
    }
}

/// Load both reference tables concurrently and fold them into one table,
/// general rows first. A source that fails is logged and skipped.
pub async fn load_reference_table(
    general: Option<&SourceSpec>,
    csd: Option<&SourceSpec>,
    cache: &CacheConfig,
) -> LoadedReference {
    let configured = general.iter().chain(csd.iter()).count();
    if configured == 0 {
        return LoadedReference::default();
    }

    ensure_crypto_provider();
    let client = match reqwest::Client::builder()
        .user_agent(concat!("dse-analysis/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to create HTTP client");
            return LoadedReference {
                configured,
                ..LoadedReference::default()
            };
        }
    };

    let (general_rows, csd_rows) = futures::join!(
        load_rows(general, &client, cache),
        load_rows(csd, &client, cache)
    );

    let mut loaded = 0;
    let mut rows = Vec::new();
    for (name, result) in [("general", general_rows), ("csd", csd_rows)] {
        match result {
            Some(Ok(r)) => {
                tracing::debug!(source = name, rows = r.len(), "loaded reference table");
                loaded += 1;
                rows.extend(r);
            }
            Some(Err(e)) => tracing::warn!(source = name, "reference table unavailable: {:#}", e),
            None => {}
        }
    }

    let table = build_reference_table(rows);
    tracing::debug!(subjects = table.len(), "built reference table");

    LoadedReference {
        table,
        configured,
        loaded,
    }
}
