//! Storage backend contract.

use crate::error::StoreError;
use crate::record::{PendingRecord, SignatureRecord};
use readproof_canonical::{SignerId, SubjectId};

/// Append-only ledger storage.
///
/// Implementations must make [`insert_linked`](LedgerStore::insert_linked)
/// atomic with respect to every other call of it: the tail read that yields
/// `prev_hash`, the uniqueness checks, and the insert happen as one unit.
/// There is no update or delete operation.
pub trait LedgerStore: Send + Sync {
    /// Links `pending` to the current tail and commits it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateAttestation`] if the subject/signer pair is
    ///   already recorded
    /// - [`StoreError::NonceReused`] if the nonce was used before
    /// - backend errors; on error nothing is committed
    fn insert_linked(&self, pending: PendingRecord) -> Result<SignatureRecord, StoreError>;

    /// Looks up the record for a subject/signer pair.
    fn find(
        &self,
        subject_id: &SubjectId,
        signer_id: &SignerId,
    ) -> Result<Option<SignatureRecord>, StoreError>;

    /// Most recently committed record.
    fn tail(&self) -> Result<Option<SignatureRecord>, StoreError>;

    /// Committed records with `from <= id <= to`, ordered by id.
    fn range(&self, from: u64, to: u64) -> Result<Vec<SignatureRecord>, StoreError>;

    /// Number of committed records.
    fn len(&self) -> Result<u64, StoreError>;

    /// Whether nothing has been committed yet.
    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}
