//! Per-group snapshot of one jurisdiction in one year.
//!
//! The three counts come from independent predicates over the jurisdiction's
//! records:
//!
//! * **filed**: filed in the year. Only groups with at least one filing get
//!   a row.
//! * **closed**: closed in the year, whatever the filing year.
//! * **pending**: filed in the year and still open.
//!
//! Closed and pending counts are left-joined onto the filed groups, so a
//! group that only had closings in the year does not appear.

use std::collections::BTreeMap;

use congestion_case_models::GroupKey;
use congestion_statistics_models::{AggregateRow, SnapshotTable};

use crate::rate::congestion_rate_or_zero;
use crate::store::RecordStore;

#[derive(Default)]
struct Counts {
    filed: u64,
    closed: u64,
    pending: u64,
}

impl Counts {
    fn into_row(self, key: GroupKey) -> AggregateRow {
        AggregateRow {
            key,
            filed_count: self.filed,
            closed_count: self.closed,
            pending_count: self.pending,
            congestion_rate: congestion_rate_or_zero(self.pending, self.closed),
        }
    }
}

/// Builds the snapshot table for `jurisdiction` (exact match) and `year`.
///
/// Never fails: an unknown jurisdiction or a year without filings yields a
/// table whose only row is an all-zero totals row.
#[must_use]
pub fn snapshot(store: &RecordStore, jurisdiction: &str, year: i32) -> SnapshotTable {
    let in_jurisdiction = store.filter(|r| r.jurisdiction == jurisdiction);

    // First-seen order of groups, with a lookup from the borrowed key tuple.
    let mut order: Vec<(&str, &str, &str)> = Vec::new();
    let mut counts: BTreeMap<(&str, &str, &str), Counts> = BTreeMap::new();

    for record in in_jurisdiction.iter().filter(|r| r.filed_year() == Some(year)) {
        let key = (
            record.action_area.as_str(),
            record.jurisdiction.as_str(),
            record.unit.as_str(),
        );
        let entry = counts.entry(key).or_insert_with(|| {
            order.push(key);
            Counts::default()
        });
        entry.filed += 1;
        if record.is_open() {
            entry.pending += 1;
        }
    }

    for record in in_jurisdiction.iter().filter(|r| r.closed_year() == Some(year)) {
        let key = (
            record.action_area.as_str(),
            record.jurisdiction.as_str(),
            record.unit.as_str(),
        );
        if let Some(entry) = counts.get_mut(&key) {
            entry.closed += 1;
        }
    }

    let mut totals = Counts::default();
    let groups: Vec<AggregateRow> = order
        .into_iter()
        .filter_map(|key| counts.remove(&key).map(|c| (key, c)))
        .map(|((action_area, jurisdiction, unit), c)| {
            totals.filed += c.filed;
            totals.closed += c.closed;
            totals.pending += c.pending;
            c.into_row(GroupKey {
                action_area: action_area.to_string(),
                jurisdiction: jurisdiction.to_string(),
                unit: unit.to_string(),
            })
        })
        .collect();

    log::debug!(
        "snapshot jurisdiction={jurisdiction:?} year={year}: {} group(s), filed={} closed={} pending={}",
        groups.len(),
        totals.filed,
        totals.closed,
        totals.pending
    );

    SnapshotTable {
        jurisdiction: jurisdiction.to_string(),
        year,
        groups,
        totals: totals.into_row(GroupKey::totals()),
    }
}
