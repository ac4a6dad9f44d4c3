//! Read-only, in-memory collection of case records.

use std::collections::BTreeSet;

use congestion_case_models::CaseRecord;

/// Owns the normalized case records for the lifetime of the process.
///
/// The store is never mutated after construction, so shared references can
/// be queried from any number of threads without locking.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<CaseRecord>,
}

impl RecordStore {
    /// Takes ownership of an ingested batch.
    #[must_use]
    pub const fn new(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in ingestion order.
    #[must_use]
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    /// Distinct non-blank jurisdictions, sorted, case preserved.
    #[must_use]
    pub fn distinct_jurisdictions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.jurisdiction.as_str())
            .filter(|j| !j.trim().is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct closing years, sorted.
    ///
    /// Only closing dates are considered, so a year in which cases were filed
    /// but none closed is not listed.
    #[must_use]
    pub fn distinct_years(&self) -> Vec<i32> {
        self.records
            .iter()
            .filter_map(CaseRecord::closed_year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Describes the subset of records matching `predicate`.
    ///
    /// Nothing is copied or evaluated until the view is iterated.
    pub fn filter<P>(&self, predicate: P) -> RecordView<'_, P>
    where
        P: Fn(&CaseRecord) -> bool,
    {
        RecordView {
            records: &self.records,
            predicate,
        }
    }
}

/// A lazily evaluated subset of a [`RecordStore`].
#[derive(Clone)]
pub struct RecordView<'a, P> {
    records: &'a [CaseRecord],
    predicate: P,
}

impl<'a, P> RecordView<'a, P>
where
    P: Fn(&CaseRecord) -> bool,
{
    /// Iterates over the matching records in store order.
    pub fn iter(&self) -> impl Iterator<Item = &'a CaseRecord> + '_ {
        self.records.iter().filter(move |&r| (self.predicate)(r))
    }

    /// Number of matching records.
    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// Returns `true` when no record matches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Narrows the view with an additional predicate.
    pub fn filter<Q>(self, next: Q) -> RecordView<'a, impl Fn(&CaseRecord) -> bool>
    where
        Q: Fn(&CaseRecord) -> bool,
    {
        let current = self.predicate;
        RecordView {
            records: self.records,
            predicate: move |r: &CaseRecord| current(r) && next(r),
        }
    }
}
