#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Congestion statistics query parameters and result types.
//!
//! These are the values exchanged between the statistics engine and the
//! presentation layer: snapshot tables, per-year rate series and the
//! cross-jurisdiction year comparison. All of them are plain query results,
//! rebuilt on every call.

use std::collections::BTreeMap;

use congestion_case_models::{GroupKey, SecondaryDimension};
use serde::{Deserialize, Serialize};

/// Year used when the caller supplies no usable year.
pub const DEFAULT_YEAR: i32 = 2022;

/// Jurisdiction selected when the caller supplies none.
pub const DEFAULT_JURISDICTION: &str = "ABADIÂNIA";

/// Inclusive upper bound on years plotted in a time series.
pub const DEFAULT_MAX_YEAR: i32 = 2024;

/// Parameters for a snapshot table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotParams {
    /// Jurisdiction, matched exactly (case- and whitespace-sensitive).
    pub jurisdiction: String,
    /// Reference year.
    pub year: i32,
}

impl SnapshotParams {
    /// Builds parameters from raw request values, applying the defaults.
    ///
    /// A missing jurisdiction becomes [`DEFAULT_JURISDICTION`]; a present one
    /// is kept verbatim. The year goes through [`parse_year`].
    #[must_use]
    pub fn from_request(jurisdiction: Option<&str>, year: Option<&str>) -> Self {
        Self {
            jurisdiction: jurisdiction.unwrap_or(DEFAULT_JURISDICTION).to_string(),
            year: parse_year(year),
        }
    }
}

/// One row of a snapshot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRow {
    /// Grouping key, or [`GroupKey::totals`] for the totals row.
    #[serde(flatten)]
    pub key: GroupKey,
    /// Cases filed in the reference year.
    pub filed_count: u64,
    /// Cases closed in the reference year, regardless of filing year.
    pub closed_count: u64,
    /// Cases filed in the reference year that are still open.
    pub pending_count: u64,
    /// `pending / (pending + closed) * 100`, two decimals; `0` when both
    /// counts are zero.
    pub congestion_rate: f64,
}

/// Snapshot of one jurisdiction for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotTable {
    /// Jurisdiction the table was computed for.
    pub jurisdiction: String,
    /// Reference year.
    pub year: i32,
    /// Group rows in first-seen order.
    pub groups: Vec<AggregateRow>,
    /// Column totals with a recomputed rate.
    pub totals: AggregateRow,
}

impl SnapshotTable {
    /// Iterates over the group rows followed by the totals row.
    pub fn rows(&self) -> impl Iterator<Item = &AggregateRow> {
        self.groups.iter().chain(std::iter::once(&self.totals))
    }

    /// Returns `true` when no group matched the selection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Parameters for a per-year rate series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesParams {
    /// Jurisdiction, matched after trimming and ignoring case.
    pub jurisdiction: String,
    /// Dimension each series is keyed by.
    pub dimension: SecondaryDimension,
    /// Inclusive year ceiling; [`DEFAULT_MAX_YEAR`] when `None`.
    pub max_year: Option<i32>,
}

impl SeriesParams {
    /// The effective year ceiling.
    #[must_use]
    pub fn max_year(&self) -> i32 {
        self.max_year.unwrap_or(DEFAULT_MAX_YEAR)
    }
}

/// A congestion rate for one group in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Jurisdiction value as stored on the records.
    pub jurisdiction: String,
    /// Value of the secondary dimension (action area or unit).
    pub group: String,
    /// Calendar year.
    pub year: i32,
    /// Congestion rate, two decimals.
    pub congestion_rate: f64,
}

/// Result of a time-series query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimeSeries {
    /// No record matched the requested jurisdiction.
    NoData {
        /// The jurisdiction as requested.
        jurisdiction: String,
    },
    /// Rate points for the matched jurisdiction.
    #[serde(rename_all = "camelCase")]
    Data {
        /// The jurisdiction as requested, trimmed.
        jurisdiction: String,
        /// Dimension the points are keyed by.
        dimension: SecondaryDimension,
        /// Filing and closing years of the matched records, capped, ascending.
        years: Vec<i32>,
        /// Points sorted by group, then year.
        points: Vec<TimeSeriesPoint>,
    },
}

impl TimeSeries {
    /// Returns `true` for the no-data marker.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    /// The rate points, empty for the no-data marker.
    #[must_use]
    pub fn points(&self) -> &[TimeSeriesPoint] {
        match self {
            Self::NoData { .. } => &[],
            Self::Data { points, .. } => points,
        }
    }

    /// The year axis, empty for the no-data marker.
    #[must_use]
    pub fn years(&self) -> &[i32] {
        match self {
            Self::NoData { .. } => &[],
            Self::Data { years, .. } => years,
        }
    }

    /// Groups the points into one series per distinct group value, as a
    /// chart would draw them.
    #[must_use]
    pub fn by_group(&self) -> BTreeMap<&str, Vec<&TimeSeriesPoint>> {
        let mut series: BTreeMap<&str, Vec<&TimeSeriesPoint>> = BTreeMap::new();
        for point in self.points() {
            series.entry(point.group.as_str()).or_default().push(point);
        }
        series
    }
}

/// Congestion rate of one action area in one jurisdiction for a given year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPoint {
    /// Action area.
    pub action_area: String,
    /// Jurisdiction.
    pub jurisdiction: String,
    /// Congestion rate, two decimals; `0` when there was no activity.
    pub congestion_rate: f64,
}

/// Rates of every (action area, jurisdiction) pair for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearComparison {
    /// Reference year.
    pub year: i32,
    /// Points sorted by action area, then jurisdiction.
    pub points: Vec<ComparisonPoint>,
}

/// Parses a year selector, falling back to [`DEFAULT_YEAR`] when the value
/// is absent, empty or not made only of ASCII digits.
#[must_use]
pub fn parse_year(raw: Option<&str>) -> i32 {
    raw.filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_YEAR)
}

/// Chooses the jurisdiction for a time-series view.
///
/// A non-blank request is used (trimmed). Otherwise [`DEFAULT_JURISDICTION`]
/// is used when it is available, then the first available jurisdiction,
/// then an empty string.
#[must_use]
pub fn series_jurisdiction(requested: Option<&str>, available: &[String]) -> String {
    if let Some(requested) = requested.map(str::trim)
        && !requested.is_empty()
    {
        return requested.to_string();
    }

    if available.iter().any(|j| j == DEFAULT_JURISDICTION) {
        return DEFAULT_JURISDICTION.to_string();
    }

    available.first().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(action_area: &str, pending: u64, closed: u64, rate: f64) -> AggregateRow {
        AggregateRow {
            key: GroupKey {
                action_area: action_area.to_string(),
                jurisdiction: "X".to_string(),
                unit: "U1".to_string(),
            },
            filed_count: pending,
            closed_count: closed,
            pending_count: pending,
            congestion_rate: rate,
        }
    }

    #[test]
    fn parse_year_accepts_digits() {
        assert_eq!(parse_year(Some("2019")), 2019);
    }

    #[test]
    fn parse_year_falls_back_to_default() {
        assert_eq!(parse_year(None), DEFAULT_YEAR);
        assert_eq!(parse_year(Some("")), DEFAULT_YEAR);
        assert_eq!(parse_year(Some("20x2")), DEFAULT_YEAR);
        assert_eq!(parse_year(Some("-2020")), DEFAULT_YEAR);
        assert_eq!(parse_year(Some(" 2020")), DEFAULT_YEAR);
        assert_eq!(parse_year(Some("99999999999")), DEFAULT_YEAR);
    }

    #[test]
    fn snapshot_params_defaults() {
        let params = SnapshotParams::from_request(None, Some("abc"));
        assert_eq!(params.jurisdiction, DEFAULT_JURISDICTION);
        assert_eq!(params.year, DEFAULT_YEAR);

        let params = SnapshotParams::from_request(Some(" goiás "), Some("2020"));
        assert_eq!(params.jurisdiction, " goiás ");
        assert_eq!(params.year, 2020);
    }

    #[test]
    fn series_jurisdiction_prefers_request() {
        let available = vec!["ABADIÂNIA".to_string(), "GOIÁS".to_string()];
        assert_eq!(series_jurisdiction(Some("  goiás "), &available), "goiás");
        assert_eq!(series_jurisdiction(Some("   "), &available), "ABADIÂNIA");
        assert_eq!(series_jurisdiction(None, &available), "ABADIÂNIA");
    }

    #[test]
    fn series_jurisdiction_falls_back_to_first_available() {
        let available = vec!["ANÁPOLIS".to_string(), "GOIÁS".to_string()];
        assert_eq!(series_jurisdiction(None, &available), "ANÁPOLIS");
        assert_eq!(series_jurisdiction(None, &[]), "");
    }

    #[test]
    fn series_params_default_ceiling() {
        let params = SeriesParams {
            jurisdiction: "X".to_string(),
            dimension: SecondaryDimension::Unit,
            max_year: None,
        };
        assert_eq!(params.max_year(), DEFAULT_MAX_YEAR);
    }

    #[test]
    fn snapshot_rows_end_with_totals() {
        let table = SnapshotTable {
            jurisdiction: "X".to_string(),
            year: 2022,
            groups: vec![row("Civil", 1, 1, 50.0), row("Criminal", 0, 2, 0.0)],
            totals: AggregateRow {
                key: GroupKey::totals(),
                ..row("", 1, 3, 25.0)
            },
        };
        let keys: Vec<&str> = table.rows().map(|r| r.key.action_area.as_str()).collect();
        assert_eq!(keys, vec!["Civil", "Criminal", "TOTAL"]);
        assert!(!table.is_empty());
    }

    #[test]
    fn aggregate_row_serializes_flat() {
        let json = serde_json::to_value(row("Civil", 1, 1, 50.0)).unwrap();
        assert_eq!(json["actionArea"], "Civil");
        assert_eq!(json["unit"], "U1");
        assert_eq!(json["pendingCount"], 1);
        assert_eq!(json["congestionRate"], 50.0);
    }

    #[test]
    fn no_data_marker_has_no_points() {
        let series = TimeSeries::NoData {
            jurisdiction: "nowhere".to_string(),
        };
        assert!(series.is_no_data());
        assert!(series.points().is_empty());
        assert!(series.years().is_empty());
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["status"], "no_data");
    }

    #[test]
    fn by_group_splits_series() {
        let point = |group: &str, year: i32| TimeSeriesPoint {
            jurisdiction: "X".to_string(),
            group: group.to_string(),
            year,
            congestion_rate: 10.0,
        };
        let series = TimeSeries::Data {
            jurisdiction: "X".to_string(),
            dimension: SecondaryDimension::ActionArea,
            years: vec![2021, 2022],
            points: vec![point("Civil", 2021), point("Civil", 2022), point("Criminal", 2022)],
        };
        let groups = series.by_group();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["Civil"].len(), 2);
        assert_eq!(groups["Criminal"][0].year, 2022);
    }
}
