//! Plain-text rendering of query results.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use congestion_statistics_models::{SnapshotTable, TimeSeries, YearComparison};

const RULE_WIDTH: usize = 96;

fn rule(out: &mut String) {
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
}

/// Renders a snapshot as a table with the totals row last.
pub fn snapshot(table: &SnapshotTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Jurisdiction: {}  Year: {}", table.jurisdiction, table.year);
    let _ = writeln!(
        out,
        "{:<28} {:<20} {:<24} {:>7} {:>7} {:>7} {:>8}",
        "ACTION AREA", "JURISDICTION", "UNIT", "FILED", "CLOSED", "PENDING", "RATE %"
    );
    rule(&mut out);

    for (i, row) in table.rows().enumerate() {
        if i == table.groups.len() {
            rule(&mut out);
        }
        let _ = writeln!(
            out,
            "{:<28} {:<20} {:<24} {:>7} {:>7} {:>7} {:>8.2}",
            row.key.action_area,
            row.key.jurisdiction,
            row.key.unit,
            row.filed_count,
            row.closed_count,
            row.pending_count,
            row.congestion_rate
        );
    }

    out
}

/// Renders a time series as one line per group with a column per year.
///
/// Years in which a group has no point are shown as `-`. When several
/// stored spellings of the jurisdiction matched, each gets its own line.
pub fn time_series(series: &TimeSeries) -> String {
    let mut out = String::new();

    let (jurisdiction, dimension, years, points) = match series {
        TimeSeries::NoData { jurisdiction } => {
            let _ = writeln!(out, "No data for jurisdiction '{jurisdiction}'.");
            return out;
        }
        TimeSeries::Data {
            jurisdiction,
            dimension,
            years,
            points,
        } => (jurisdiction, dimension, years, points),
    };

    let _ = writeln!(out, "Jurisdiction: {jurisdiction}  By: {}", dimension.label());
    if points.is_empty() {
        out.push_str("No congestion rates to show.\n");
        return out;
    }

    let mut lines: BTreeMap<(&str, &str), BTreeMap<i32, f64>> = BTreeMap::new();
    for point in points {
        lines
            .entry((point.group.as_str(), point.jurisdiction.as_str()))
            .or_default()
            .insert(point.year, point.congestion_rate);
    }
    let show_spelling = lines
        .keys()
        .map(|&(_, spelling)| spelling)
        .collect::<BTreeSet<_>>()
        .len()
        > 1;

    let _ = write!(out, "{:<32}", dimension.label().to_uppercase());
    for year in years {
        let _ = write!(out, " {year:>7}");
    }
    out.push('\n');
    rule(&mut out);

    for ((group, spelling), rates) in &lines {
        let label = if show_spelling {
            format!("{group} [{spelling}]")
        } else {
            (*group).to_string()
        };
        let _ = write!(out, "{label:<32}");
        for year in years {
            match rates.get(year) {
                Some(rate) => {
                    let _ = write!(out, " {rate:>7.2}");
                }
                None => {
                    let _ = write!(out, " {:>7}", "-");
                }
            }
        }
        out.push('\n');
    }

    out
}

/// Renders the year comparison as one line per (action area, jurisdiction).
pub fn comparison(comparison: &YearComparison) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Year: {}", comparison.year);
    if comparison.points.is_empty() {
        out.push_str("No activity in this year.\n");
        return out;
    }

    let _ = writeln!(out, "{:<28} {:<28} {:>8}", "ACTION AREA", "JURISDICTION", "RATE %");
    rule(&mut out);
    for point in &comparison.points {
        let _ = writeln!(
            out,
            "{:<28} {:<28} {:>8.2}",
            point.action_area, point.jurisdiction, point.congestion_rate
        );
    }

    out
}
