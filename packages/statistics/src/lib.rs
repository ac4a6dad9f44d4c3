#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Congestion statistics over an in-memory set of judicial case records.
//!
//! A [`RecordStore`] is built once from the ingested records and never
//! mutated. The [`StatisticsEngine`] answers every query by recomputing from
//! the store: per-group snapshot tables, per-year rate series and the
//! cross-jurisdiction year comparison.

mod comparison;
pub mod rate;
mod series;
mod snapshot;
pub mod store;

use congestion_statistics_models::{
    SeriesParams, SnapshotParams, SnapshotTable, TimeSeries, YearComparison,
};

pub use store::{RecordStore, RecordView};

/// Query façade over a [`RecordStore`].
#[derive(Debug, Clone, Default)]
pub struct StatisticsEngine {
    store: RecordStore,
}

impl StatisticsEngine {
    /// Creates an engine owning `store`.
    #[must_use]
    pub const fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// The underlying record store.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Distinct non-blank jurisdictions, sorted.
    #[must_use]
    pub fn distinct_jurisdictions(&self) -> Vec<String> {
        self.store.distinct_jurisdictions()
    }

    /// Distinct closing years, sorted.
    #[must_use]
    pub fn distinct_years(&self) -> Vec<i32> {
        self.store.distinct_years()
    }

    /// Per-group counts and rates for one jurisdiction in one year, followed
    /// by a totals row.
    ///
    /// The jurisdiction is matched exactly.
    #[must_use]
    pub fn snapshot(&self, params: &SnapshotParams) -> SnapshotTable {
        snapshot::snapshot(&self.store, &params.jurisdiction, params.year)
    }

    /// Per-year rates for each value of the requested dimension.
    ///
    /// The jurisdiction is matched after trimming and ignoring case.
    /// Returns [`TimeSeries::NoData`] when no record matches.
    #[must_use]
    pub fn time_series(&self, params: &SeriesParams) -> TimeSeries {
        series::time_series(&self.store, params)
    }

    /// Rates of every (action area, jurisdiction) pair for `year`.
    #[must_use]
    pub fn year_comparison(&self, year: i32) -> YearComparison {
        comparison::year_comparison(&self.store, year)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use congestion_case_models::CaseRecord;

    use crate::store::RecordStore;

    /// Builds a record with mid-year dates in the given years.
    pub fn case(
        action_area: &str,
        jurisdiction: &str,
        unit: &str,
        filed_year: Option<i32>,
        closed_year: Option<i32>,
    ) -> CaseRecord {
        CaseRecord {
            case_id: String::new(),
            action_area: action_area.to_string(),
            jurisdiction: jurisdiction.to_string(),
            unit: unit.to_string(),
            filed_date: filed_year.and_then(|y| NaiveDate::from_ymd_opt(y, 3, 15)),
            closed_date: closed_year.and_then(|y| NaiveDate::from_ymd_opt(y, 9, 30)),
        }
    }

    /// A deterministic mixed dataset spanning several jurisdictions, groups
    /// and years, including open cases, undated filings and late closings.
    pub fn sample_store() -> RecordStore {
        const AREAS: [&str; 3] = ["Civil", "Criminal", "Família"];
        const JURISDICTIONS: [&str; 4] = ["ABADIÂNIA", "ANÁPOLIS", "GOIÁS", "goiás"];
        const UNITS: [&str; 3] = ["1ª Vara", "2ª Vara", "Juizado"];

        let records = (0..360_usize)
            .map(|i| {
                let filed = 2016 + i32::try_from(i % 9).unwrap_or_default();
                let filed_year = (i % 17 != 0).then_some(filed);
                let closed_year = match i % 5 {
                    0 | 1 => None,
                    2 => Some(filed),
                    _ => Some(filed + i32::try_from(i % 4).unwrap_or_default()),
                };
                let mut record = case(
                    AREAS[i % AREAS.len()],
                    JURISDICTIONS[(i / 3) % JURISDICTIONS.len()],
                    UNITS[(i / 7) % UNITS.len()],
                    filed_year,
                    closed_year,
                );
                record.case_id = format!("{i:05}");
                record
            })
            .collect();

        RecordStore::new(records)
    }
}
