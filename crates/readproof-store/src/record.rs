//! Persisted ledger entries.

use chrono::{DateTime, Utc};
use readproof_canonical::{AttestationFact, Digest, Signature};
use serde::{Deserialize, Serialize};

/// A hashed and signed fact waiting to be linked into the chain.
///
/// Everything here is computed before the writer lock is taken; the store
/// only adds `id`, `prev_hash`, and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    /// Attested facts.
    pub fact: AttestationFact,
    /// Display name; not part of the signed payload.
    pub signer_name: Option<String>,
    /// SHA-256 of the canonical encoding of `fact`.
    pub payload_hash: Digest,
    /// Ed25519 signature over `payload_hash`.
    pub signature: Signature,
}

/// One committed ledger entry.
///
/// Serialized flat: the fact fields sit next to the chain fields, one JSON
/// object per journal frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Monotonic position in the chain, starting at 1.
    pub id: u64,
    /// Attested facts.
    #[serde(flatten)]
    pub fact: AttestationFact,
    /// Display name; not part of the signed payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_name: Option<String>,
    /// SHA-256 of the canonical encoding of `fact`.
    pub payload_hash: Digest,
    /// Ed25519 signature over `payload_hash`.
    pub signature: Signature,
    /// `payload_hash` of the predecessor; `None` only for the first record.
    pub prev_hash: Option<Digest>,
    /// Insertion time assigned by the store.
    pub created_at: DateTime<Utc>,
}
