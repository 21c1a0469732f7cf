//! In-memory chain state shared by every backend.

use crate::error::StoreError;
use crate::record::{PendingRecord, SignatureRecord};
use chrono::Utc;
use readproof_canonical::{Nonce, SignerId, SubjectId};
use std::collections::{HashMap, HashSet};

/// Committed records plus the uniqueness indexes over them.
///
/// Callers serialize `link` + `commit` behind their writer lock; readers only
/// ever see fully committed records.
#[derive(Debug, Default)]
pub(crate) struct ChainIndex {
    records: Vec<SignatureRecord>,
    by_pair: HashMap<(SubjectId, SignerId), usize>,
    nonces: HashSet<Nonce>,
}

impl ChainIndex {
    /// Checks the uniqueness constraints and builds the linked record
    /// without committing it.
    pub(crate) fn link(&self, pending: PendingRecord) -> Result<SignatureRecord, StoreError> {
        let pair = (pending.fact.subject_id.clone(), pending.fact.signer_id.clone());
        if self.by_pair.contains_key(&pair) {
            return Err(StoreError::DuplicateAttestation {
                subject_id: pair.0,
                signer_id: pair.1,
            });
        }
        if self.nonces.contains(&pending.fact.nonce) {
            return Err(StoreError::NonceReused(pending.fact.nonce));
        }

        let tail = self.records.last();
        Ok(SignatureRecord {
            id: tail.map_or(1, |t| t.id + 1),
            prev_hash: tail.map(|t| t.payload_hash.clone()),
            created_at: Utc::now(),
            fact: pending.fact,
            signer_name: pending.signer_name,
            payload_hash: pending.payload_hash,
            signature: pending.signature,
        })
    }

    /// Adds a record produced by `link` (or read back from disk).
    ///
    /// Replayed journals are taken as they are: if the file was tampered with
    /// so that a pair or nonce repeats, the first occurrence keeps the index
    /// slot and the verifier reports the damage.
    pub(crate) fn commit(&mut self, record: SignatureRecord) {
        let pair = (record.fact.subject_id.clone(), record.fact.signer_id.clone());
        let position = self.records.len();
        if self.by_pair.contains_key(&pair) || !self.nonces.insert(record.fact.nonce.clone()) {
            tracing::warn!(id = record.id, "replayed record repeats a unique key");
        }
        self.by_pair.entry(pair).or_insert(position);
        self.records.push(record);
    }

    pub(crate) fn find(&self, subject_id: &SubjectId, signer_id: &SignerId) -> Option<&SignatureRecord> {
        self.by_pair
            .get(&(subject_id.clone(), signer_id.clone()))
            .map(|i| &self.records[*i])
    }

    pub(crate) fn tail(&self) -> Option<&SignatureRecord> {
        self.records.last()
    }

    pub(crate) fn range(&self, from: u64, to: u64) -> Vec<SignatureRecord> {
        self.records
            .iter()
            .filter(|r| r.id >= from && r.id <= to)
            .cloned()
            .collect()
    }

    pub(crate) fn len(&self) -> u64 {
        self.records.len() as u64
    }
}
