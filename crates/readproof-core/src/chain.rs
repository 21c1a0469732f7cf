//! Building and linking new attestations.

use crate::errors::LedgerError;
use crate::keys::KeyCustodian;
use crate::nonce::generate_nonce;
use crate::subject::SubjectDirectory;
use chrono::{DateTime, FixedOffset, TimeZone};
use readproof_canonical::{encode, AttestationFact, Nonce, SignerId, SubjectId};
use readproof_store::{
    ChainVerifier, LedgerStore, PendingRecord, SignatureRecord, StoreError, VerificationReport,
};
use std::sync::Arc;

/// A signer's request to acknowledge a subject.
///
/// `signer_id` and `signer_email` come from the identity collaborator and are
/// taken as authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendRequest {
    /// Subject being acknowledged.
    pub subject_id: SubjectId,
    /// Authenticated signer.
    pub signer_id: SignerId,
    /// Signer email; lower-cased by the encoder.
    pub signer_email: String,
    /// Display name, stored but not signed.
    pub signer_name: Option<String>,
    /// Moment of acknowledgment.
    pub signed_at: DateTime<FixedOffset>,
    /// Caller-supplied nonce; generated when absent.
    pub nonce: Option<Nonce>,
    /// Checksum of the version the signer read.
    pub subject_checksum: Option<String>,
    /// Checksum of the subject's current version, resolved before append.
    pub current_checksum: Option<String>,
}

impl AppendRequest {
    /// Minimal request; everything optional is unset.
    pub fn new<Tz: TimeZone>(
        subject_id: impl Into<SubjectId>,
        signer_id: impl Into<SignerId>,
        signer_email: impl Into<String>,
        signed_at: DateTime<Tz>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            signer_id: signer_id.into(),
            signer_email: signer_email.into(),
            signer_name: None,
            signed_at: signed_at.fixed_offset(),
            nonce: None,
            subject_checksum: None,
            current_checksum: None,
        }
    }

    /// Sets the display name.
    pub fn with_signer_name(mut self, name: impl Into<String>) -> Self {
        self.signer_name = Some(name.into());
        self
    }

    /// Uses a caller-chosen nonce instead of a generated one.
    pub fn with_nonce(mut self, nonce: Nonce) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Binds the attestation to the version the signer read.
    pub fn with_subject_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.subject_checksum = Some(checksum.into());
        self
    }

    /// Records the subject's current checksum.
    pub fn with_current_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.current_checksum = Some(checksum.into());
        self
    }

    /// Asks `directory` for the subject's current checksum.
    pub fn resolve_current_checksum(
        mut self,
        directory: &dyn SubjectDirectory,
    ) -> Result<Self, LedgerError> {
        self.current_checksum = Some(directory.current_checksum(&self.subject_id)?);
        Ok(self)
    }
}

/// Turns append requests into signed, linked records.
#[derive(Clone)]
pub struct ChainBuilder {
    custodian: Arc<KeyCustodian>,
    store: Arc<dyn LedgerStore>,
}

impl ChainBuilder {
    /// Builder signing with `custodian` and writing to `store`.
    pub fn new(custodian: Arc<KeyCustodian>, store: Arc<dyn LedgerStore>) -> Self {
        Self { custodian, store }
    }

    /// Hashes, signs, and links one attestation.
    ///
    /// Everything up to the signature happens outside the store's writer
    /// lock. The store re-checks uniqueness under the lock, so a racing
    /// duplicate still ends as [`LedgerError::AlreadyAcknowledged`].
    ///
    /// # Errors
    ///
    /// - [`LedgerError::AlreadyAcknowledged`] if the pair is already recorded
    /// - [`LedgerError::SubjectChanged`] if the expected and current checksums differ
    /// - [`LedgerError::InvalidFact`] if a field cannot be encoded
    /// - [`LedgerError::NonceReused`] for a caller nonce seen before
    pub fn append(&self, request: AppendRequest) -> Result<SignatureRecord, LedgerError> {
        if self
            .store
            .find(&request.subject_id, &request.signer_id)?
            .is_some()
        {
            return Err(LedgerError::AlreadyAcknowledged {
                subject_id: request.subject_id,
                signer_id: request.signer_id,
            });
        }

        if let (Some(expected), Some(current)) =
            (&request.subject_checksum, &request.current_checksum)
        {
            if expected != current {
                return Err(LedgerError::SubjectChanged {
                    subject_id: request.subject_id,
                    expected: expected.clone(),
                    current: current.clone(),
                });
            }
        }

        let mut fact = AttestationFact::new(
            request.subject_id,
            request.signer_id,
            request.signer_email,
            request.signed_at,
            request.nonce.unwrap_or_else(generate_nonce),
        );
        fact.subject_checksum = request.subject_checksum;

        let payload_hash = encode(&fact)?.payload_hash();
        let signature = self.custodian.sign_digest(&payload_hash)?;

        let record = self.store.insert_linked(PendingRecord {
            fact,
            signer_name: request.signer_name,
            payload_hash,
            signature,
        })?;
        tracing::debug!(
            id = record.id,
            subject_id = %record.fact.subject_id,
            signer_id = %record.fact.signer_id,
            "appended attestation"
        );
        Ok(record)
    }

    /// Raw public key of the signing custodian.
    pub fn public_key(&self) -> [u8; 32] {
        self.custodian.public_key()
    }

    /// Verifies `from..=to` against this builder's own public key.
    pub fn verify_chain(&self, from: u64, to: u64) -> Result<VerificationReport, StoreError> {
        ChainVerifier::new(self.custodian.verifying_key()).verify_chain(self.store.as_ref(), from, to)
    }

    /// Store this builder writes to.
    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Custodian this builder signs with.
    pub fn custodian(&self) -> &Arc<KeyCustodian> {
        &self.custodian
    }
}
