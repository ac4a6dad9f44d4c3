//! Versioned mapping from source CSV headers to canonical case fields.
//!
//! The mapping is an explicit table: each canonical field lists the header
//! names it accepts, in priority order. The default table is embedded at
//! compile time; deployments with different exports can supply their own
//! TOML file with the same shape.

use std::path::Path;

use serde::Deserialize;

use crate::SourceError;

/// The only schema version this build understands.
pub const SCHEMA_VERSION: u32 = 1;

/// Default mapping for the court's `processos_*.csv` exports.
const DEFAULT_SCHEMA_TOML: &str = include_str!("../schemas/default.toml");

/// Canonical [`congestion_case_models::CaseRecord`] fields fed from CSV
/// columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CanonicalField {
    /// Process identifier.
    CaseId,
    /// Action area.
    ActionArea,
    /// Jurisdiction.
    Jurisdiction,
    /// Court unit.
    Unit,
    /// Filing date.
    FiledDate,
    /// Closing date.
    ClosedDate,
}

impl CanonicalField {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::CaseId,
            Self::ActionArea,
            Self::Jurisdiction,
            Self::Unit,
            Self::FiledDate,
            Self::ClosedDate,
        ]
    }

    /// The field's key in the schema TOML.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CaseId => "case_id",
            Self::ActionArea => "action_area",
            Self::Jurisdiction => "jurisdiction",
            Self::Unit => "unit",
            Self::FiledDate => "filed_date",
            Self::ClosedDate => "closed_date",
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Accepted header names for every canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldAliases {
    /// Headers for [`CanonicalField::CaseId`].
    pub case_id: Vec<String>,
    /// Headers for [`CanonicalField::ActionArea`].
    pub action_area: Vec<String>,
    /// Headers for [`CanonicalField::Jurisdiction`].
    pub jurisdiction: Vec<String>,
    /// Headers for [`CanonicalField::Unit`].
    pub unit: Vec<String>,
    /// Headers for [`CanonicalField::FiledDate`].
    pub filed_date: Vec<String>,
    /// Headers for [`CanonicalField::ClosedDate`].
    pub closed_date: Vec<String>,
}

/// A versioned header-to-field mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemaMapping {
    /// Mapping format version; must equal [`SCHEMA_VERSION`].
    pub version: u32,
    /// Accepted header names per field.
    pub fields: FieldAliases,
}

/// Column positions of every canonical field within one CSV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    case_id: usize,
    action_area: usize,
    jurisdiction: usize,
    unit: usize,
    filed_date: usize,
    closed_date: usize,
}

impl ColumnIndex {
    /// Returns the zero-based column position of `field`.
    #[must_use]
    pub const fn get(&self, field: CanonicalField) -> usize {
        match field {
            CanonicalField::CaseId => self.case_id,
            CanonicalField::ActionArea => self.action_area,
            CanonicalField::Jurisdiction => self.jurisdiction,
            CanonicalField::Unit => self.unit,
            CanonicalField::FiledDate => self.filed_date,
            CanonicalField::ClosedDate => self.closed_date,
        }
    }
}

impl SchemaMapping {
    /// Returns the embedded default mapping.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the embedded TOML is malformed. This is
    /// covered by tests, so it only fails if the file is edited carelessly.
    pub fn embedded() -> Result<Self, SourceError> {
        parse_schema_toml(DEFAULT_SCHEMA_TOML)
    }

    /// Loads a mapping from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the file cannot be read, is not valid TOML,
    /// or declares an unsupported version.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path)?;
        log::debug!("Loaded schema mapping from {}", path.display());
        parse_schema_toml(&contents)
    }

    /// Returns the accepted header names for `field`, in priority order.
    #[must_use]
    pub fn aliases(&self, field: CanonicalField) -> &[String] {
        match field {
            CanonicalField::CaseId => &self.fields.case_id,
            CanonicalField::ActionArea => &self.fields.action_area,
            CanonicalField::Jurisdiction => &self.fields.jurisdiction,
            CanonicalField::Unit => &self.fields.unit,
            CanonicalField::FiledDate => &self.fields.filed_date,
            CanonicalField::ClosedDate => &self.fields.closed_date,
        }
    }

    /// Locates every canonical field among `headers`.
    ///
    /// Aliases are tried in order and compared after trimming, ignoring
    /// case; the first alias present in the headers wins.
    ///
    /// # Errors
    ///
    /// * [`SourceError::UnmappedField`] if no alias of a field is present.
    /// * [`SourceError::AmbiguousField`] if the winning alias matches more
    ///   than one header.
    pub fn resolve(&self, headers: &[String], source_label: &str) -> Result<ColumnIndex, SourceError> {
        let locate = |field: CanonicalField| self.locate(field, headers, source_label);

        Ok(ColumnIndex {
            case_id: locate(CanonicalField::CaseId)?,
            action_area: locate(CanonicalField::ActionArea)?,
            jurisdiction: locate(CanonicalField::Jurisdiction)?,
            unit: locate(CanonicalField::Unit)?,
            filed_date: locate(CanonicalField::FiledDate)?,
            closed_date: locate(CanonicalField::ClosedDate)?,
        })
    }

    fn locate(
        &self,
        field: CanonicalField,
        headers: &[String],
        source_label: &str,
    ) -> Result<usize, SourceError> {
        for alias in self.aliases(field) {
            let wanted = normalize_header(alias);
            let matches: Vec<usize> = headers
                .iter()
                .enumerate()
                .filter(|(_, h)| normalize_header(h) == wanted)
                .map(|(i, _)| i)
                .collect();

            match matches.as_slice() {
                [] => {}
                [index] => return Ok(*index),
                _ => {
                    return Err(SourceError::AmbiguousField {
                        source_label: source_label.to_string(),
                        field,
                        columns: matches.iter().map(|&i| headers[i].clone()).collect(),
                    });
                }
            }
        }

        Err(SourceError::UnmappedField {
            source_label: source_label.to_string(),
            field,
            headers: headers.to_vec(),
        })
    }
}

/// Parses and validates a schema mapping from TOML text.
///
/// # Errors
///
/// Returns [`SourceError::SchemaParse`] for malformed TOML and
/// [`SourceError::UnsupportedSchemaVersion`] for any version other than
/// [`SCHEMA_VERSION`].
pub fn parse_schema_toml(toml_str: &str) -> Result<SchemaMapping, SourceError> {
    let mapping: SchemaMapping = toml::from_str(toml_str)?;
    if mapping.version != SCHEMA_VERSION {
        return Err(SourceError::UnsupportedSchemaVersion {
            found: mapping.version,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(mapping)
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}
