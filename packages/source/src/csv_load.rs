//! CSV case-file loader.
//!
//! Reads every `processos_*.csv` export in an upload directory, maps columns
//! through a [`SchemaMapping`] and concatenates the rows into one batch of
//! [`CaseRecord`]s.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use congestion_case_models::CaseRecord;

use crate::SourceError;
use crate::parsing::parse_case_date;
use crate::progress::ProgressCallback;
use crate::schema::{CanonicalField, SchemaMapping};

/// File name prefix of case exports.
pub const CASE_FILE_PREFIX: &str = "processos_";

/// File extension of case exports.
pub const CASE_FILE_EXTENSION: &str = "csv";

/// Data-quality counters for one parsed CSV stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    /// Rows converted into records.
    pub records: u64,
    /// Non-blank filing dates that could not be parsed.
    pub invalid_filed_dates: u64,
    /// Non-blank closing dates that could not be parsed.
    pub invalid_closed_dates: u64,
}

/// Parses one CSV stream into case records.
///
/// `label` identifies the stream in log messages and errors.
///
/// # Errors
///
/// Returns [`SourceError`] if the CSV is malformed or a required column
/// cannot be mapped.
pub fn read_cases<R: Read>(
    reader: R,
    schema: &SchemaMapping,
    label: &str,
) -> Result<(Vec<CaseRecord>, ReadStats), SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_owned())
        .collect();

    let index = schema.resolve(&headers, label)?;
    let mut stats = ReadStats::default();
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;
        let cell = |field: CanonicalField| row.get(index.get(field)).unwrap_or("").trim();

        let filed_raw = cell(CanonicalField::FiledDate);
        let closed_raw = cell(CanonicalField::ClosedDate);
        let filed_date = parse_case_date(filed_raw);
        let closed_date = parse_case_date(closed_raw);

        if filed_date.is_none() && !filed_raw.is_empty() {
            stats.invalid_filed_dates += 1;
        }
        if closed_date.is_none() && !closed_raw.is_empty() {
            stats.invalid_closed_dates += 1;
        }

        records.push(CaseRecord {
            case_id: cell(CanonicalField::CaseId).to_owned(),
            action_area: cell(CanonicalField::ActionArea).to_owned(),
            jurisdiction: cell(CanonicalField::Jurisdiction).to_owned(),
            unit: cell(CanonicalField::Unit).to_owned(),
            filed_date,
            closed_date,
        });
    }

    stats.records = records.len() as u64;

    if stats.invalid_filed_dates > 0 || stats.invalid_closed_dates > 0 {
        log::info!(
            "[{label}] {} unparseable filing date(s), {} unparseable closing date(s) treated as missing",
            stats.invalid_filed_dates,
            stats.invalid_closed_dates
        );
    }
    log::debug!("[{label}] parsed {} records", stats.records);

    Ok((records, stats))
}

/// Lists the case exports in `dir`, sorted by file name.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the directory cannot be read.
pub fn discover_case_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_case_file = path.file_name().and_then(|n| n.to_str()).is_some_and(|name| {
            name.starts_with(CASE_FILE_PREFIX)
                && Path::new(name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(CASE_FILE_EXTENSION))
        });
        if is_case_file {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Loads and concatenates every case export in `dir`.
///
/// # Errors
///
/// * [`SourceError::NoInput`] if the directory has no case exports.
/// * [`SourceError::Empty`] if the exports contain no rows at all.
/// * Any I/O, CSV or mapping error from an individual file.
pub fn load_cases(
    dir: &Path,
    schema: &SchemaMapping,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Vec<CaseRecord>, SourceError> {
    let files = discover_case_files(dir)?;
    if files.is_empty() {
        return Err(SourceError::NoInput {
            dir: dir.to_path_buf(),
        });
    }

    log::info!("Loading {} case file(s) from {}", files.len(), dir.display());
    progress.set_total(files.len() as u64);

    let mut all = Vec::new();
    let mut totals = ReadStats::default();

    for (i, path) in files.iter().enumerate() {
        let label = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("case file")
            .to_owned();
        progress.set_message(format!("Reading {label}"));

        let (records, stats) = read_cases(File::open(path)?, schema, &label)?;
        log::info!(
            "[{label}] file {}/{}: {} records",
            i + 1,
            files.len(),
            stats.records
        );

        totals.records += stats.records;
        totals.invalid_filed_dates += stats.invalid_filed_dates;
        totals.invalid_closed_dates += stats.invalid_closed_dates;
        all.extend(records);
        progress.inc(1);
    }

    if all.is_empty() {
        return Err(SourceError::Empty {
            dir: dir.to_path_buf(),
        });
    }

    log::info!(
        "Loaded {} case records ({} unparseable filing dates, {} unparseable closing dates)",
        totals.records,
        totals.invalid_filed_dates,
        totals.invalid_closed_dates
    );
    progress.finish(format!("Loaded {} case records", totals.records));

    Ok(all)
}
