use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for caching remote reference tables
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
    pub ttl: Duration,
    pub path: PathBuf,
}

impl CacheConfig {
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self {
            enabled,
            ttl,
            path: get_cache_path(),
        }
    }
}

/// Get the platform-appropriate cache directory for dse-analysis
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("dse-analysis/reference-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/dse-analysis/reference-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the reference cache directory
pub fn clear_cache(cache_path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// A cached response body with the time it was fetched
#[derive(Debug, Serialize, Deserialize)]
pub struct CachedTable {
    pub url: String,
    pub fetched_at: DateTime<Utc>,
    pub body: String,
}

fn cache_key(url: &str) -> String {
    format!("reference-table:{}", url)
}

/// Read a cached table for `url`, fresh or not
pub fn read_cached_table(cache_path: &Path, url: &str) -> Option<CachedTable> {
    let bytes = cacache::read_sync(cache_path, cache_key(url)).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Write a fetched table to the cache
pub fn write_cached_table(cache_path: &Path, url: &str, body: &str) -> Result<()> {
    let entry = CachedTable {
        url: url.to_string(),
        fetched_at: Utc::now(),
        body: body.to_string(),
    };
    let json = serde_json::to_vec(&entry)?;
    cacache::write_sync(cache_path, cache_key(url), &json)?;
    Ok(())
}

/// Check if a cached table is still within its TTL
pub fn is_cache_fresh(entry: &CachedTable, ttl: Duration) -> bool {
    let age = Utc::now() - entry.fetched_at;
    match age.to_std() {
        Ok(age) => age < ttl,
        // Fetched "in the future": clock moved backwards, treat as fresh
        Err(_) => true,
    }
}
