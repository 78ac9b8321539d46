use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use dse_analysis::config::Config;
use dse_analysis::estimate::Report;
use dse_analysis::source::{CacheConfig, SourceSpec};
use dse_analysis::submission::{RawSubmission, SubmissionError};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_INPUT: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Human,
    Json,
    Tsv,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// General-subjects table (path or URL), overrides config
    #[arg(long)]
    general_table: Option<String>,

    /// Second table (path or URL), overrides config
    #[arg(long)]
    csd_table: Option<String>,

    /// Bypass the downloaded-table cache
    #[arg(long)]
    no_cache: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate a result from a file or command-line grades
    Estimate {
        /// Submission file (YAML or JSON), `-` for stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// First-language grade
        #[arg(long)]
        chi: Option<String>,

        /// Second-language grade
        #[arg(long)]
        eng: Option<String>,

        /// Mathematics grade
        #[arg(long)]
        math: Option<String>,

        /// Civic education: A (attained) or U
        #[arg(long)]
        csd: Option<String>,

        /// Elective as NAME=GRADE (NAME may be a catalog number), repeatable
        #[arg(short, long = "elective")]
        electives: Vec<String>,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Enter grades interactively
    Interactive {
        #[command(flatten)]
        report: ReportArgs,
    },
    /// List the elective catalog
    Catalog,
    /// Create a config file
    Init {
        /// Write the built-in defaults without prompting
        #[arg(long)]
        defaults: bool,
    },
    /// Remove downloaded reference tables
    ClearCache,
}

#[derive(Parser, Debug)]
#[command(name = "dse-analysis")]
#[command(about = "DSE result estimator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/dse-analysis/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Load the config and validate it, exiting with the config code on failure.
fn load_config_or_exit(path: Option<PathBuf>) -> Config {
    let config = match dse_analysis::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let mut errors = Vec::new();
    if let Err(e) = dse_analysis::scoring::validate_scoring(&config.scoring()) {
        errors.extend(e);
    }
    if let Err(e) = dse_analysis::source::validate_reference(&config.reference()) {
        errors.extend(e);
    }
    if !errors.is_empty() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    config
}

/// Start from the input file, if any, and apply command-line grades over it.
fn raw_from_args(
    input: Option<PathBuf>,
    chi: Option<String>,
    eng: Option<String>,
    math: Option<String>,
    csd: Option<String>,
    electives: &[String],
) -> Result<RawSubmission, SubmissionError> {
    let mut raw = match input {
        Some(path) => dse_analysis::submission::load_submission(&path)?,
        None => RawSubmission::default(),
    };
    raw.chi = chi.or(raw.chi);
    raw.eng = eng.or(raw.eng);
    raw.math = math.or(raw.math);
    raw.csd = csd.or(raw.csd);
    for arg in electives {
        raw.electives
            .push(dse_analysis::submission::parse_elective_arg(arg)?);
    }
    Ok(raw)
}

fn print_report(report: &Report, format: OutputFormat) {
    match format {
        OutputFormat::Human => {
            let use_colors = dse_analysis::output::should_use_colors();
            println!("{}", dse_analysis::output::format_report(report, use_colors));
        }
        OutputFormat::Tsv => println!("{}", dse_analysis::output::format_tsv(report)),
        OutputFormat::Json => match dse_analysis::output::format_json(report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(EXIT_FAILURE);
            }
        },
    }
}

async fn estimate_and_print(raw: RawSubmission, config: &Config, report_args: ReportArgs) {
    let scoring = config.scoring();
    let reference = config.reference();

    let submission = match dse_analysis::submission::validate_submission(
        &raw,
        scoring.elective_cap(),
        &reference.core_subjects(),
    ) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    let (general, csd): (Option<SourceSpec>, Option<SourceSpec>) =
        match dse_analysis::estimate::resolve_sources(
            config,
            report_args.general_table.as_deref(),
            report_args.csd_table.as_deref(),
        ) {
            Ok(sources) => sources,
            Err(e) => {
                eprintln!("Invalid table source: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };

    let cache = CacheConfig::new(!report_args.no_cache, reference.cache_ttl());
    let report = dse_analysis::estimate::run_estimate(
        &submission,
        config,
        general.as_ref(),
        csd.as_ref(),
        &cache,
    )
    .await;

    print_report(&report, report_args.format);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = dse_analysis::logging::init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    dse_analysis::source::ensure_crypto_provider();

    let config_path = cli.config.map(PathBuf::from);

    match cli.command {
        Commands::Estimate {
            input,
            chi,
            eng,
            math,
            csd,
            electives,
            report,
        } => {
            let config = load_config_or_exit(config_path);
            let raw = match raw_from_args(input, chi, eng, math, csd, &electives) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Invalid input: {}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            estimate_and_print(raw, &config, report).await;
        }
        Commands::Interactive { report } => {
            let config = load_config_or_exit(config_path);
            let raw = match dse_analysis::submission::prompt_for_submission(
                &config.reference().core_subjects(),
                config.scoring().elective_cap(),
            ) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Invalid input: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            println!();
            estimate_and_print(raw, &config, report).await;
        }
        Commands::Catalog => {
            let use_colors = dse_analysis::output::should_use_colors();
            println!("{}", dse_analysis::output::format_catalog(use_colors));
        }
        Commands::Init { defaults } => {
            if let Err(e) = dse_analysis::config::run_init_wizard(config_path, defaults) {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        Commands::ClearCache => {
            let path = dse_analysis::source::get_cache_path();
            match dse_analysis::source::clear_cache(&path) {
                Ok(()) => println!("Cache cleared: {}", path.display()),
                Err(e) => {
                    eprintln!("Failed to clear cache: {:#}", e);
                    std::process::exit(EXIT_FAILURE);
                }
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
