//! Journal-backed durable ledger.

use crate::error::StoreError;
use crate::index::ChainIndex;
use crate::record::{PendingRecord, SignatureRecord};
use crate::traits::LedgerStore;
use parking_lot::{Mutex, RwLock};
use readproof_canonical::{SignerId, SubjectId};
use readproof_journal::{
    repair_torn_tail, JournalReader, JournalWriter, ReadMode, TailRepair, WriteOptions,
};
use std::path::{Path, PathBuf};

/// Ledger persisted in a journal file.
///
/// On open the whole journal is replayed into memory to rebuild the
/// uniqueness indexes. Appends hold the writer mutex from tail read to
/// frame write; the record becomes visible to readers only after its frame
/// is on disk.
pub struct JournalLedger {
    path: PathBuf,
    writer: Mutex<JournalWriter>,
    index: RwLock<ChainIndex>,
}

impl JournalLedger {
    /// Opens (or creates) the ledger at `path`.
    ///
    /// An existing file is never modified on open. Any damage, including a partial
    /// frame left by an interrupted write, is an error; see
    /// [`JournalLedger::repair_torn_tail`].
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let writer = JournalWriter::open(&path, options)?;

        let mut index = ChainIndex::default();
        for record in Self::read_records(&path)? {
            index.commit(record);
        }

        tracing::info!(path = %path.display(), records = index.len(), "opened ledger journal");
        Ok(Self {
            path,
            writer: Mutex::new(writer),
            index: RwLock::new(index),
        })
    }

    /// Reads every record without opening the journal for writing.
    ///
    /// Fails on any damaged or truncated frame; records past the damage are
    /// never silently dropped.
    pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<SignatureRecord>, StoreError> {
        let mut reader = JournalReader::open(path, ReadMode::Strict)?;
        let mut records = Vec::new();
        while let Some(record) = reader.read_record::<SignatureRecord>()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Cuts off a partial final frame left by a crash, after checking that
    /// nothing follows it. Must not run while the ledger is open.
    pub fn repair_torn_tail<P: AsRef<Path>>(
        path: P,
        options: WriteOptions,
    ) -> Result<TailRepair, StoreError> {
        repair_torn_tail(path, options).map_err(StoreError::from)
    }

    /// Location of the backing journal.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JournalLedger {
    fn insert_linked(&self, pending: PendingRecord) -> Result<SignatureRecord, StoreError> {
        let mut writer = self.writer.lock();
        // Only writer-lock holders mutate the index, so the tail cannot move
        // between this read and the commit below.
        let record = self.index.read().link(pending)?;
        writer.append_record(&record)?;
        self.index.write().commit(record.clone());
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
