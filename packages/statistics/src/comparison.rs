//! Cross-jurisdiction comparison of congestion rates for one year.

use std::collections::BTreeMap;

use congestion_statistics_models::{ComparisonPoint, YearComparison};

use crate::rate::congestion_rate_or_zero;
use crate::store::RecordStore;

/// Rates of every (action area, jurisdiction) pair with activity in `year`.
///
/// Pending counts cases filed in the year that are still open, closed counts
/// cases closed in the year. A rate is only computed for pairs with both
/// pending and closed cases; a pair present on one side only rates `0`.
#[must_use]
pub fn year_comparison(store: &RecordStore, year: i32) -> YearComparison {
    let mut cells: BTreeMap<(&str, &str), (u64, u64)> = BTreeMap::new();

    for record in store.records() {
        let key = (record.action_area.as_str(), record.jurisdiction.as_str());
        if record.is_open() && record.filed_year() == Some(year) {
            cells.entry(key).or_default().0 += 1;
        } else if record.closed_year() == Some(year) {
            cells.entry(key).or_default().1 += 1;
        }
    }

    let points: Vec<ComparisonPoint> = cells
        .into_iter()
        .map(|((action_area, jurisdiction), (pending, closed))| ComparisonPoint {
            action_area: action_area.to_string(),
            jurisdiction: jurisdiction.to_string(),
            congestion_rate: if pending > 0 && closed > 0 {
                congestion_rate_or_zero(pending, closed)
            } else {
                0.0
            },
        })
        .collect();

    log::debug!("year comparison {year}: {} point(s)", points.len());

    YearComparison { year, points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{case, sample_store};

    fn flatten(comparison: &YearComparison) -> Vec<(&str, &str, f64)> {
        comparison
            .points
            .iter()
            .map(|p| {
                (
                    p.action_area.as_str(),
                    p.jurisdiction.as_str(),
                    p.congestion_rate,
                )
            })
            .collect()
    }

    #[test]
    fn compares_all_jurisdictions_sorted() {
        let store = RecordStore::new(vec![
            case("Criminal", "Y", "U1", Some(2022), None),
            case("Civil", "Y", "U1", Some(2022), Some(2022)),
            case("Civil", "X", "U1", Some(2022), None),
            case("Civil", "X", "U2", Some(2021), Some(2022)),
        ]);
        let comparison = year_comparison(&store, 2022);

        assert_eq!(comparison.year, 2022);
        assert_eq!(
            flatten(&comparison),
            vec![
                ("Civil", "X", 50.0),
                ("Civil", "Y", 0.0),
                ("Criminal", "Y", 0.0),
            ]
        );
    }

    #[test]
    fn one_sided_pairs_rate_zero() {
        let store = RecordStore::new(vec![
            case("Civil", "X", "U1", Some(2022), None),
            case("Civil", "X", "U2", Some(2022), None),
            case("Criminal", "X", "U1", Some(2020), Some(2022)),
        ]);
        // Pending-only and closed-only pairs are listed with a zero rate.
        assert_eq!(
            flatten(&year_comparison(&store, 2022)),
            vec![("Civil", "X", 0.0), ("Criminal", "X", 0.0)]
        );
    }

    #[test]
    fn pairs_without_activity_are_absent() {
        let store = RecordStore::new(vec![
            case("Civil", "X", "U1", Some(2021), None),
            case("Civil", "Y", "U1", Some(2020), Some(2021)),
        ]);
        assert!(year_comparison(&store, 2022).points.is_empty());
        assert_eq!(year_comparison(&store, 2021).points.len(), 2);
    }

    #[test]
    fn units_are_merged_within_a_pair() {
        let store = RecordStore::new(vec![
            case("Civil", "X", "U1", Some(2022), None),
            case("Civil", "X", "U2", Some(2022), None),
            case("Civil", "X", "U3", Some(2019), Some(2022)),
            case("Civil", "X", "U3", Some(2020), Some(2022)),
            case("Civil", "X", "U4", Some(2021), Some(2022)),
        ]);
        assert_eq!(flatten(&year_comparison(&store, 2022)), vec![("Civil", "X", 40.0)]);
    }

    #[test]
    fn rates_stay_within_percentage_range() {
        let store = sample_store();
        for year in 2015..=2025 {
            for point in year_comparison(&store, year).points {
                assert!((0.0..=100.0).contains(&point.congestion_rate));
            }
        }
    }
}
