//! Volatile in-process ledger.

use crate::error::StoreError;
use crate::index::ChainIndex;
use crate::record::{PendingRecord, SignatureRecord};
use crate::traits::LedgerStore;
use parking_lot::RwLock;
use readproof_canonical::{SignerId, SubjectId};

/// Ledger held entirely in memory. Useful for tests and for evaluation
/// deployments; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    index: RwLock<ChainIndex>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of already committed records, e.g. read from a journal for
    /// offline verification. Records are taken as they are, not re-linked.
    pub fn from_records(records: impl IntoIterator<Item = SignatureRecord>) -> Self {
        let mut index = ChainIndex::default();
        for record in records {
            index.commit(record);
        }
        Self {
            index: RwLock::new(index),
        }
    }
}

impl LedgerStore for MemoryLedger {
    fn insert_linked(&self, pending: PendingRecord) -> Result<SignatureRecord, StoreError> {
        // The write guard covers tail read, uniqueness checks, and push.
        let mut index = self.index.write();
        let record = index.link(pending)?;
        index.commit(record.clone());
        Ok(record)
    }

    fn find(
        &self,
        subject_id: &SubjectId,
        signer_id: &SignerId,
    ) -> Result<Option<SignatureRecord>, StoreError> {
        Ok(self.index.read().find(subject_id, signer_id).cloned())
    }

    fn tail(&self) -> Result<Option<SignatureRecord>, StoreError> {
        Ok(self.index.read().tail().cloned())
    }

    fn range(&self, from: u64, to: u64) -> Result<Vec<SignatureRecord>, StoreError> {
        Ok(self.index.read().range(from, to))
    }

    fn len(&self) -> Result<u64, StoreError> {
        Ok(self.index.read().len())
    }
}
