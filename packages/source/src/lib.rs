#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case record ingestion.
//!
//! Court exports arrive as `processos_*.csv` files whose column names drift
//! between releases. A versioned [`schema::SchemaMapping`] pins which source
//! headers feed each canonical [`CaseRecord`] field, and
//! [`csv_load::load_cases`] turns a directory of exports into the in-memory
//! batch the statistics engine works on.
//!
//! Malformed dates are a data-quality condition and become `None`. A missing
//! column or an empty batch is fatal and surfaces as a [`SourceError`].

pub mod csv_load;
pub mod parsing;
pub mod progress;
pub mod schema;

use std::path::PathBuf;

pub use congestion_case_models::CaseRecord;

use crate::schema::CanonicalField;

/// Errors that can occur while ingesting case records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read, directory listing).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The schema mapping file is not valid TOML or has the wrong shape.
    #[error("Schema parse error: {0}")]
    SchemaParse(#[from] toml::de::Error),

    /// The schema mapping declares a version this build does not understand.
    #[error("Unsupported schema version {found} (expected {expected})")]
    UnsupportedSchemaVersion {
        /// Version declared by the mapping file.
        found: u32,
        /// Version this build supports.
        expected: u32,
    },

    /// A required field has no matching column in the input.
    #[error("{source_label}: no column for required field '{field}' (headers: {headers:?})")]
    UnmappedField {
        /// File or stream the headers came from.
        source_label: String,
        /// Canonical field that could not be mapped.
        field: CanonicalField,
        /// Headers present in the input.
        headers: Vec<String>,
    },

    /// More than one column matches the same field.
    #[error("{source_label}: field '{field}' matches several columns: {columns:?}")]
    AmbiguousField {
        /// File or stream the headers came from.
        source_label: String,
        /// Canonical field with conflicting columns.
        field: CanonicalField,
        /// The conflicting headers.
        columns: Vec<String>,
    },

    /// No case files were found in the upload directory.
    #[error("No case files matching 'processos_*.csv' in {}", dir.display())]
    NoInput {
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// Case files were found but contained no records.
    #[error("Case files in {} contain no records", dir.display())]
    Empty {
        /// Directory that was loaded.
        dir: PathBuf,
    },
}
