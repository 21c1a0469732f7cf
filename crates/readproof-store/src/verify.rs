//! Chain replay and tamper detection.
//!
//! Verification trusts nothing stored except the public key it is given:
//! every payload hash is recomputed from the record's facts, every link is
//! checked against both the predecessor's stored and recomputed hash, and
//! every signature is checked against the recomputed hash. All findings are
//! collected; nothing is ever repaired.

use crate::error::StoreError;
use crate::record::SignatureRecord;
use crate::traits::LedgerStore;
use ed25519_dalek::{Signature as DalekSignature, VerifyingKey};
use readproof_canonical::{payload_hash, Digest};
use serde::{Deserialize, Serialize};

/// What is wrong with a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscrepancyKind {
    /// The stored payload hash differs from the hash of the stored facts.
    HashMismatch {
        /// Hash found in the record.
        stored: Digest,
        /// Hash recomputed from the facts.
        recomputed: Digest,
    },
    /// `prev_hash` does not point at the predecessor.
    BrokenLink {
        /// What `prev_hash` should have been.
        expected: Option<Digest>,
        /// What `prev_hash` is.
        found: Option<Digest>,
    },
    /// The signature does not verify over the recomputed hash.
    SignatureInvalid,
    /// The stored facts can no longer be encoded.
    Unencodable {
        /// Encoder message.
        reason: String,
    },
    /// Ids `first..=last` are absent from the chain.
    MissingRecords {
        /// First missing id.
        first: u64,
        /// Last missing id.
        last: u64,
    },
    /// The id does not increase over its predecessor's.
    OutOfOrder {
        /// Id of the preceding row.
        after: u64,
    },
}

/// One finding, tied to the record it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// Id of the affected record.
    pub record_id: u64,
    /// Failure kind.
    #[serde(flatten)]
    pub kind: DiscrepancyKind,
}

/// Outcome of replaying a range of the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// First id requested.
    pub from: u64,
    /// Last id examined (clamped to the tail).
    pub to: u64,
    /// Number of records examined.
    pub checked: u64,
    /// Every discrepancy found, in chain order.
    pub discrepancies: Vec<Discrepancy>,
}

impl VerificationReport {
    /// True when no discrepancy was found.
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }

    /// Ids of records with at least one discrepancy, ascending, deduplicated.
    pub fn affected_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.discrepancies.iter().map(|d| d.record_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn report(&mut self, record_id: u64, kind: DiscrepancyKind) {
        tracing::warn!(record_id, ?kind, "ledger discrepancy");
        self.discrepancies.push(Discrepancy { record_id, kind });
    }
}

/// Replays the chain against a published public key.
#[derive(Debug, Clone)]
pub struct ChainVerifier {
    key: VerifyingKey,
}

impl ChainVerifier {
    /// Verifier for an already parsed key.
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Verifier for raw public key bytes.
    pub fn from_public_key(bytes: &[u8; 32]) -> Result<Self, StoreError> {
        VerifyingKey::from_bytes(bytes)
            .map(Self::new)
            .map_err(|e| StoreError::InvalidPublicKey(e.to_string()))
    }

    /// Verifies records `from..=to` of `store`.
    ///
    /// `from` below 1 is treated as 1 and `to` is clamped to the current
    /// tail. When `from > 1` the first record's link is checked against
    /// record `from - 1`, which is itself not reported on.
    pub fn verify_chain(
        &self,
        store: &dyn LedgerStore,
        from: u64,
        to: u64,
    ) -> Result<VerificationReport, StoreError> {
        let from = from.max(1);
        let tail_id = store.tail()?.map_or(0, |t| t.id);
        let to = to.min(tail_id);
        if from > to {
            return Ok(VerificationReport {
                from,
                to,
                checked: 0,
                discrepancies: Vec::new(),
            });
        }

        let mut rows = store.range(from - 1, to)?;
        let predecessor = match rows.first() {
            Some(first) if first.id == from - 1 && from > 1 => Some(rows.remove(0)),
            _ => None,
        };
        Ok(self.verify_records(from, to, predecessor.as_ref(), &rows))
    }

    /// Verifies an explicit slice of records. `predecessor` is the record
    /// just before `records[0]` when the slice does not start at id 1.
    pub fn verify_records(
        &self,
        from: u64,
        to: u64,
        predecessor: Option<&SignatureRecord>,
        records: &[SignatureRecord],
    ) -> VerificationReport {
        let mut report = VerificationReport {
            from,
            to,
            checked: 0,
            discrepancies: Vec::new(),
        };

        let mut prev: Option<Link<'_>> = predecessor.map(Link::of);
        if from > 1 && prev.is_none() {
            report.report(
                from,
                DiscrepancyKind::MissingRecords {
                    first: from - 1,
                    last: from - 1,
                },
            );
        }

        let mut expected_id = from;
        for record in records {
            report.checked += 1;

            if record.id > expected_id {
                report.report(
                    record.id,
                    DiscrepancyKind::MissingRecords {
                        first: expected_id,
                        last: record.id - 1,
                    },
                );
            } else if record.id < expected_id {
                report.report(
                    record.id,
                    DiscrepancyKind::OutOfOrder {
                        after: expected_id - 1,
                    },
                );
            }
            expected_id = record.id.max(expected_id) + 1;

            let current = Link::of(record);
            if let Err(reason) = &current.recomputed {
                report.report(
                    record.id,
                    DiscrepancyKind::Unencodable {
                        reason: reason.clone(),
                    },
                );
            }
            if let Ok(recomputed) = &current.recomputed {
                if *recomputed != record.payload_hash {
                    report.report(
                        record.id,
                        DiscrepancyKind::HashMismatch {
                            stored: record.payload_hash.clone(),
                            recomputed: recomputed.clone(),
                        },
                    );
                }
            }

            self.check_link(&mut report, prev.as_ref(), record);

            if let Ok(recomputed) = &current.recomputed {
                if !self.signature_holds(record, recomputed) {
                    report.report(record.id, DiscrepancyKind::SignatureInvalid);
                }
            }

            prev = Some(current);
        }

        report
    }

    fn check_link(
        &self,
        report: &mut VerificationReport,
        prev: Option<&Link<'_>>,
        record: &SignatureRecord,
    ) {
        match prev {
            None if record.id == 1 => {
                if record.prev_hash.is_some() {
                    report.report(
                        record.id,
                        DiscrepancyKind::BrokenLink {
                            expected: None,
                            found: record.prev_hash.clone(),
                        },
                    );
                }
            }
            // Predecessor absent; already reported as missing.
            None => {}
            Some(link) => {
                let stored = &link.record.payload_hash;
                let matches_stored = record.prev_hash.as_ref() == Some(stored);
                let matches_recomputed = match &link.recomputed {
                    Ok(recomputed) => record.prev_hash.as_ref() == Some(recomputed),
                    Err(_) => true,
                };
                if !(matches_stored && matches_recomputed) {
                    let expected = link.recomputed.as_ref().unwrap_or(stored).clone();
                    report.report(
                        record.id,
                        DiscrepancyKind::BrokenLink {
                            expected: Some(expected),
                            found: record.prev_hash.clone(),
                        },
                    );
                }
            }
        }
    }

    fn signature_holds(&self, record: &SignatureRecord, recomputed: &Digest) -> bool {
        let (Ok(hash), Ok(sig)) = (recomputed.to_bytes(), record.signature.to_bytes()) else {
            return false;
        };
        self.key
            .verify_strict(&hash, &DalekSignature::from_bytes(&sig))
            .is_ok()
    }
}

/// A record together with the hash recomputed from its facts.
struct Link<'a> {
    record: &'a SignatureRecord,
    recomputed: Result<Digest, String>,
}

impl<'a> Link<'a> {
    fn of(record: &'a SignatureRecord) -> Self {
        Self {
            record,
            recomputed: payload_hash(&record.fact).map_err(|e| e.to_string()),
        }
    }
}
