#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the congestion statistics engine.
//!
//! Loads every `processos_*.csv` export from the upload directory into
//! memory, then answers one query per invocation as a text table or JSON.
//!
//! Uses `indicatif-log-bridge` (via [`congestion_cli_utils::init_logger`])
//! so that loading progress and log lines share the terminal cleanly.

mod render;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use congestion_case_models::SecondaryDimension;
use congestion_cli_utils::{IndicatifProgress, MultiProgress};
use congestion_source::csv_load::load_cases;
use congestion_source::schema::SchemaMapping;
use congestion_statistics::{RecordStore, StatisticsEngine};
use congestion_statistics_models::{SeriesParams, SnapshotParams, parse_year, series_jurisdiction};
use serde::Serialize;

/// Upload directory used when neither `--data-dir` nor the environment
/// names one.
const DEFAULT_DATA_DIR: &str = "uploads";

#[derive(Parser)]
#[command(name = "congestion", about = "Judicial case congestion statistics")]
struct Cli {
    /// Directory holding the `processos_*.csv` exports (overrides `CONGESTION_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Schema mapping TOML to use instead of the built-in one (overrides `CONGESTION_SCHEMA`)
    #[arg(long, global = true)]
    schema: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the jurisdictions present in the data
    Jurisdictions,
    /// List the years in which cases were closed
    Years,
    /// Per-group counts and congestion rates for one jurisdiction and year
    Snapshot {
        /// Jurisdiction, matched exactly (default: ABADIÂNIA)
        #[arg(long)]
        jurisdiction: Option<String>,
        /// Reference year; non-numeric values fall back to 2022
        #[arg(long)]
        year: Option<String>,
    },
    /// Congestion rate per year, one series per action area or unit
    Series {
        /// Jurisdiction, matched ignoring case and surrounding whitespace
        #[arg(long)]
        jurisdiction: Option<String>,
        /// Dimension each series is keyed by
        #[arg(long, value_enum, default_value_t = Dimension::ActionArea)]
        by: Dimension,
        /// Last year to include (default: 2024)
        #[arg(long)]
        max_year: Option<i32>,
    },
    /// Congestion rate of every action area in every jurisdiction for one year
    Compare {
        /// Reference year; non-numeric values fall back to 2022
        #[arg(long)]
        year: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Dimension {
    ActionArea,
    Unit,
}

impl From<Dimension> for SecondaryDimension {
    fn from(value: Dimension) -> Self {
        match value {
            Dimension::ActionArea => Self::ActionArea,
            Dimension::Unit => Self::Unit,
        }
    }
}

fn data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var("CONGESTION_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn schema(flag: Option<PathBuf>) -> Result<SchemaMapping, congestion_source::SourceError> {
    let path = flag.or_else(|| {
        std::env::var("CONGESTION_SCHEMA")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    });

    match path {
        Some(path) => {
            log::info!("Using schema mapping {}", path.display());
            SchemaMapping::from_path(&path)
        }
        None => SchemaMapping::embedded(),
    }
}

fn load_engine(
    multi: &MultiProgress,
    dir: &Path,
    schema: &SchemaMapping,
) -> Result<StatisticsEngine, congestion_source::SourceError> {
    let progress = IndicatifProgress::files_bar(multi, "Scanning case files...");
    let records = load_cases(dir, schema, &progress)?;
    Ok(StatisticsEngine::new(RecordStore::new(records)))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = congestion_cli_utils::init_logger();
    let cli = Cli::parse();

    let dir = data_dir(cli.data_dir);
    let schema = schema(cli.schema)?;
    let engine = load_engine(&multi, &dir, &schema)?;

    match cli.command {
        Commands::Jurisdictions => {
            let jurisdictions = engine.distinct_jurisdictions();
            if cli.json {
                print_json(&jurisdictions)?;
            } else {
                for jurisdiction in &jurisdictions {
                    println!("{jurisdiction}");
                }
            }
        }
        Commands::Years => {
            let years = engine.distinct_years();
            if cli.json {
                print_json(&years)?;
            } else {
                for year in &years {
                    println!("{year}");
                }
            }
        }
        Commands::Snapshot { jurisdiction, year } => {
            let params = SnapshotParams::from_request(jurisdiction.as_deref(), year.as_deref());
            let table = engine.snapshot(&params);
            if cli.json {
                print_json(&table)?;
            } else {
                print!("{}", render::snapshot(&table));
            }
        }
        Commands::Series {
            jurisdiction,
            by,
            max_year,
        } => {
            let available = engine.distinct_jurisdictions();
            let params = SeriesParams {
                jurisdiction: series_jurisdiction(jurisdiction.as_deref(), &available),
                dimension: by.into(),
                max_year,
            };
            let series = engine.time_series(&params);
            if cli.json {
                print_json(&series)?;
            } else {
                print!("{}", render::time_series(&series));
            }
        }
        Commands::Compare { year } => {
            let comparison = engine.year_comparison(parse_year(year.as_deref()));
            if cli.json {
                print_json(&comparison)?;
            } else {
                print!("{}", render::comparison(&comparison));
            }
        }
    }

    Ok(())
}
