use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, Config};
use crate::prompt::{prompt, prompt_with_default, prompt_yes_no};
use crate::scoring::{QualificationBasis, QualificationRule, ScoringConfig, DEFAULT_ELECTIVE_CAP};
use crate::source::{ReferenceConfig, SourceSpec, DEFAULT_CACHE_TTL};

/// Serialize `config` as YAML and write it atomically, creating parent
/// directories as needed.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

fn prompt_source(label: &str) -> Result<Option<String>> {
    loop {
        let input = prompt(&format!("{} (path or URL, blank for none): ", label))?;
        if input.is_empty() {
            return Ok(None);
        }
        match SourceSpec::parse(&input) {
            Ok(_) => return Ok(Some(input)),
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
/// With `accept_defaults`, nothing is asked and the built-in defaults
/// are written.
pub fn run_init_wizard(default_path: Option<PathBuf>, accept_defaults: bool) -> Result<()> {
    let default_config_path = default_path.unwrap_or_else(get_config_path);

    if accept_defaults {
        let config = Config {
            scoring: Some(ScoringConfig::default()),
            reference: Some(ReferenceConfig {
                cache_ttl: Some(DEFAULT_CACHE_TTL.to_string()),
                ..ReferenceConfig::default()
            }),
        };
        write_config(&default_config_path, &config)?;
        println!("Config written to {}", default_config_path.display());
        return Ok(());
    }

    println!();
    println!("DSE Analysis Configuration Wizard");
    println!("=================================");
    println!();

    // 1. Scoring
    let elective_cap: usize = loop {
        let s = prompt_with_default("Maximum number of electives", &DEFAULT_ELECTIVE_CAP.to_string())?;
        match s.parse::<usize>() {
            Ok(v) if v >= 1 => break v,
            _ => println!("  Invalid: must be a whole number of at least 1. Try again."),
        }
    };

    println!();
    println!("The qualification check needs five subjects at level 2 or above.");
    println!("By default every submitted subject counts; you can restrict it to the best five.");
    let best_five_only = prompt_yes_no("Count only the best five subjects?", false)?;
    let basis = if best_five_only {
        QualificationBasis::BestFive
    } else {
        QualificationBasis::AllSubjects
    };

    // 2. Reference tables
    println!();
    println!("Historical performance tables refine the estimate per subject.");
    let general = prompt_source("General subjects table")?;
    let csd = prompt_source("Second table (e.g. CSD)")?;
    let cache_ttl = loop {
        let s = prompt_with_default("Keep downloaded tables for", DEFAULT_CACHE_TTL)?;
        match humantime::parse_duration(&s) {
            Ok(_) => break s,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 3. Config path
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    let config = Config {
        scoring: Some(ScoringConfig {
            elective_cap: Some(elective_cap),
            qualification: Some(QualificationRule {
                basis,
                ..QualificationRule::default()
            }),
            brackets: None,
        }),
        reference: Some(ReferenceConfig {
            general,
            csd,
            cache_ttl: Some(cache_ttl),
            core_subjects: None,
        }),
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `dse-analysis estimate --help` to get started.");

    Ok(())
}
