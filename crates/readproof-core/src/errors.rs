//! Errors surfaced by [`crate::ChainBuilder::append`] and ledger setup.

use crate::keys::KeyError;
use crate::subject::SubjectLookupError;
use readproof_canonical::{EncodeError, Nonce, SignerId, SubjectId};
use readproof_store::StoreError;
use thiserror::Error;

/// Ledger operation failures.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The signer already has a record for this subject. Final.
    #[error("{signer_id} already acknowledged {subject_id}")]
    AlreadyAcknowledged {
        /// Subject of the existing record.
        subject_id: SubjectId,
        /// Signer of the existing record.
        signer_id: SignerId,
    },

    /// The subject changed after the signer read it.
    #[error("{subject_id} changed: signer read {expected}, current is {current}")]
    SubjectChanged {
        /// Subject being acknowledged.
        subject_id: SubjectId,
        /// Checksum the signer saw.
        expected: String,
        /// Checksum the directory reports now.
        current: String,
    },

    /// The subject directory does not know the subject.
    #[error("subject {0} not found")]
    SubjectNotFound(SubjectId),

    /// The signing key could not be loaded.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Signing failed for a reason other than key material.
    #[error("signing failed: {0}")]
    Signing(KeyError),

    /// The nonce was used by an earlier record.
    #[error("nonce {0} was already used")]
    NonceReused(Nonce),

    /// The facts cannot be canonically encoded.
    #[error("invalid attestation: {0}")]
    InvalidFact(#[from] EncodeError),

    /// Storage failure.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<KeyError> for LedgerError {
    fn from(err: KeyError) -> Self {
        match err {
            KeyError::InvalidKeyMaterial(reason) => LedgerError::InvalidKeyMaterial(reason),
            other => LedgerError::Signing(other),
        }
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateAttestation {
                subject_id,
                signer_id,
            } => LedgerError::AlreadyAcknowledged {
                subject_id,
                signer_id,
            },
            StoreError::NonceReused(nonce) => LedgerError::NonceReused(nonce),
            other => LedgerError::Store(other),
        }
    }
}

impl From<SubjectLookupError> for LedgerError {
    fn from(err: SubjectLookupError) -> Self {
        match err {
            SubjectLookupError::NotFound(subject_id) => LedgerError::SubjectNotFound(subject_id),
        }
    }
}
