//! Record filtering for listing and audit queries.

use crate::record::SignatureRecord;
use chrono::{DateTime, Utc};
use readproof_canonical::{SignerId, SubjectId};

/// Trait for selecting records.
pub trait RecordFilter {
    /// Returns true if the record matches the filter criteria.
    fn matches(&self, record: &SignatureRecord) -> bool;
}

/// Filter by subject.
#[derive(Debug, Clone)]
pub struct SubjectFilter {
    /// Subject to match.
    pub subject_id: SubjectId,
}

impl RecordFilter for SubjectFilter {
    fn matches(&self, record: &SignatureRecord) -> bool {
        record.fact.subject_id == self.subject_id
    }
}

/// Filter by signer.
#[derive(Debug, Clone)]
pub struct SignerFilter {
    /// Signer to match.
    pub signer_id: SignerId,
}

impl RecordFilter for SignerFilter {
    fn matches(&self, record: &SignatureRecord) -> bool {
        record.fact.signer_id == self.signer_id
    }
}

/// Filter by the instant of acknowledgment, compared in UTC.
#[derive(Debug, Clone, Default)]
pub struct SignedAtRangeFilter {
    /// Include records signed at or after this instant.
    pub after: Option<DateTime<Utc>>,
    /// Include records signed at or before this instant.
    pub before: Option<DateTime<Utc>>,
}

impl RecordFilter for SignedAtRangeFilter {
    fn matches(&self, record: &SignatureRecord) -> bool {
        let signed_at = record.fact.signed_at.with_timezone(&Utc);
        self.after.map_or(true, |after| signed_at >= after)
            && self.before.map_or(true, |before| signed_at <= before)
    }
}

/// Composite filter: all filters must match (AND). An empty set matches
/// everything.
#[derive(Default)]
pub struct AndFilter {
    /// Filters to combine with AND logic.
    pub filters: Vec<Box<dyn RecordFilter>>,
}

impl AndFilter {
    /// Adds a filter.
    pub fn with(mut self, filter: impl RecordFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }
}

impl RecordFilter for AndFilter {
    fn matches(&self, record: &SignatureRecord) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }
}

/// Keeps the records `filter` accepts, preserving chain order.
pub fn select<F: RecordFilter + ?Sized>(
    records: impl IntoIterator<Item = SignatureRecord>,
    filter: &F,
) -> Vec<SignatureRecord> {
    records.into_iter().filter(|r| filter.matches(r)).collect()
}
