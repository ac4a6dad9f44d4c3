#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Judicial case record types and grouping dimensions.
//!
//! This crate defines the canonical [`CaseRecord`] shape that every ingestion
//! path normalizes into, along with the grouping keys the statistics engine
//! aggregates by.

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Action area label used for the totals row of a snapshot table.
pub const TOTALS_LABEL: &str = "TOTAL";

/// One judicial process as normalized by the ingestion layer.
///
/// Dates are optional: malformed source values are coerced to `None` during
/// ingestion rather than rejected. A missing `closed_date` means the case is
/// still open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    /// Process identifier. Not guaranteed to be unique across files.
    pub case_id: String,
    /// Legal subject-matter category ("área de ação").
    pub action_area: String,
    /// Administrative territorial unit ("comarca").
    pub jurisdiction: String,
    /// Court office handling the case ("serventia").
    pub unit: String,
    /// When the case was filed ("distribuído").
    pub filed_date: Option<NaiveDate>,
    /// When the case was closed ("baixado").
    pub closed_date: Option<NaiveDate>,
}

impl CaseRecord {
    /// Year of the filing date, if known.
    #[must_use]
    pub fn filed_year(&self) -> Option<i32> {
        self.filed_date.map(|d| d.year())
    }

    /// Year of the closing date, if known.
    #[must_use]
    pub fn closed_year(&self) -> Option<i32> {
        self.closed_date.map(|d| d.year())
    }

    /// Returns `true` when the case has no closing date.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.closed_date.is_none()
    }

    /// Returns the value of the given secondary grouping dimension.
    #[must_use]
    pub fn dimension(&self, dimension: SecondaryDimension) -> &str {
        match dimension {
            SecondaryDimension::ActionArea => &self.action_area,
            SecondaryDimension::Unit => &self.unit,
        }
    }
}

/// The three-part grouping key of a snapshot row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupKey {
    /// Action area.
    pub action_area: String,
    /// Jurisdiction.
    pub jurisdiction: String,
    /// Court unit.
    pub unit: String,
}

impl GroupKey {
    /// Builds the grouping key of a record.
    #[must_use]
    pub fn of(record: &CaseRecord) -> Self {
        Self {
            action_area: record.action_area.clone(),
            jurisdiction: record.jurisdiction.clone(),
            unit: record.unit.clone(),
        }
    }

    /// The sentinel key of the totals row: `("TOTAL", "", "")`.
    #[must_use]
    pub fn totals() -> Self {
        Self {
            action_area: TOTALS_LABEL.to_string(),
            jurisdiction: String::new(),
            unit: String::new(),
        }
    }

    /// Returns `true` if this is the totals sentinel.
    #[must_use]
    pub fn is_totals(&self) -> bool {
        self.action_area == TOTALS_LABEL && self.jurisdiction.is_empty() && self.unit.is_empty()
    }
}

/// Secondary dimension a time series is broken down by, within a
/// jurisdiction.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SecondaryDimension {
    /// Break down by legal subject-matter category.
    ActionArea,
    /// Break down by court office.
    Unit,
}

impl SecondaryDimension {
    /// Human-readable label for table headers and legends.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ActionArea => "Action area",
            Self::Unit => "Unit",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::ActionArea, Self::Unit]
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    fn record(filed: Option<(i32, u32, u32)>, closed: Option<(i32, u32, u32)>) -> CaseRecord {
        CaseRecord {
            case_id: "0001".to_string(),
            action_area: "Civil".to_string(),
            jurisdiction: "GOIÂNIA".to_string(),
            unit: "1ª Vara Cível".to_string(),
            filed_date: filed.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            closed_date: closed.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }

    #[test]
    fn derives_years_from_dates() {
        let r = record(Some((2021, 3, 4)), Some((2023, 12, 31)));
        assert_eq!(r.filed_year(), Some(2021));
        assert_eq!(r.closed_year(), Some(2023));
        assert!(!r.is_open());
    }

    #[test]
    fn missing_dates_contribute_no_year() {
        let r = record(None, None);
        assert_eq!(r.filed_year(), None);
        assert_eq!(r.closed_year(), None);
        assert!(r.is_open());
    }

    #[test]
    fn dimension_selects_field() {
        let r = record(None, None);
        assert_eq!(r.dimension(SecondaryDimension::ActionArea), "Civil");
        assert_eq!(r.dimension(SecondaryDimension::Unit), "1ª Vara Cível");
    }

    #[test]
    fn totals_key_is_recognized() {
        assert!(GroupKey::totals().is_totals());
        let r = record(None, None);
        assert!(!GroupKey::of(&r).is_totals());
    }

    #[test]
    fn secondary_dimension_string_forms() {
        for dim in SecondaryDimension::all() {
            let parsed = SecondaryDimension::from_str(dim.as_ref()).unwrap();
            assert_eq!(parsed, *dim);
        }
        assert_eq!(SecondaryDimension::ActionArea.to_string(), "action_area");
        assert_eq!(
            serde_json::to_string(&SecondaryDimension::Unit).unwrap(),
            "\"unit\""
        );
    }
}
