//! Error types for store operations.

use readproof_canonical::{Nonce, SignerId, SubjectId};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A record already exists for this subject and signer.
    #[error("{signer_id} already acknowledged {subject_id}")]
    DuplicateAttestation {
        /// Subject of the existing record.
        subject_id: SubjectId,
        /// Signer of the existing record.
        signer_id: SignerId,
    },
    /// The nonce was used by an earlier record.
    #[error("nonce {0} was already used")]
    NonceReused(Nonce),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] readproof_journal::JournalError),
    /// The verifying key bytes are not a valid Ed25519 point.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}
