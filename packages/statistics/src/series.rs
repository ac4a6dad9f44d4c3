//! Per-year congestion rate series within one jurisdiction.

use std::collections::{BTreeMap, BTreeSet};

use congestion_statistics_models::{SeriesParams, TimeSeries, TimeSeriesPoint};

use crate::rate::congestion_rate;
use crate::store::RecordStore;

/// Normalized form used to match jurisdictions in series queries.
fn normalize(jurisdiction: &str) -> String {
    jurisdiction.trim().to_lowercase()
}

/// Builds the rate series for `params`.
///
/// The year axis holds every filing and closing year of the matched
/// records up to the ceiling, so a year may appear without any point.
/// Pending cases are bucketed by filing year and closed cases by closing
/// year, both capped at the ceiling. Cells are keyed by (group, year, raw
/// jurisdiction) so that two spellings matching the same request stay
/// separate. A cell whose rate is undefined yields no point.
#[must_use]
pub fn time_series(store: &RecordStore, params: &SeriesParams) -> TimeSeries {
    let requested = params.jurisdiction.trim();
    let wanted = normalize(requested);
    let max_year = params.max_year();

    let matched = store.filter(|r| normalize(&r.jurisdiction) == wanted);
    if matched.is_empty() {
        log::debug!("time series: no records for jurisdiction {requested:?}");
        return TimeSeries::NoData {
            jurisdiction: requested.to_string(),
        };
    }

    // (pending, closed) per (group, year, jurisdiction)
    let mut cells: BTreeMap<(&str, i32, &str), (u64, u64)> = BTreeMap::new();

    for record in matched.iter() {
        let group = record.dimension(params.dimension);
        let jurisdiction = record.jurisdiction.as_str();

        if record.is_open() {
            if let Some(year) = record.filed_year().filter(|&y| y <= max_year) {
                cells.entry((group, year, jurisdiction)).or_default().0 += 1;
            }
        } else if let Some(year) = record.closed_year().filter(|&y| y <= max_year) {
            cells.entry((group, year, jurisdiction)).or_default().1 += 1;
        }
    }

    // Every filing year counts, including those of cases closed later.
    let years: Vec<i32> = matched
        .iter()
        .flat_map(|r| [r.filed_year(), r.closed_year()])
        .flatten()
        .filter(|&y| y <= max_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let points: Vec<TimeSeriesPoint> = cells
        .into_iter()
        .filter_map(|((group, year, jurisdiction), (pending, closed))| {
            congestion_rate(pending, closed).map(|rate| TimeSeriesPoint {
                jurisdiction: jurisdiction.to_string(),
                group: group.to_string(),
                year,
                congestion_rate: rate,
            })
        })
        .collect();

    log::debug!(
        "time series jurisdiction={requested:?} by={} max_year={max_year}: {} point(s) over {} year(s)",
        params.dimension,
        points.len(),
        years.len()
    );

    TimeSeries::Data {
        jurisdiction: requested.to_string(),
        dimension: params.dimension,
        years,
        points,
    }
}
