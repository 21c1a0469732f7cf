use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

use crate::identifiers::{Nonce, SignerId, SubjectId};

/// The facts a signer attests to.
///
/// `signed_at` keeps the offset the caller supplied; the encoder forces it to
/// UTC, so two facts describing the same instant from different zones hash
/// identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationFact {
    /// Acknowledged subject.
    pub subject_id: SubjectId,
    /// Authenticated signer.
    pub signer_id: SignerId,
    /// Signer email as supplied by the identity collaborator.
    pub signer_email: String,
    /// Moment of acknowledgment.
    pub signed_at: DateTime<FixedOffset>,
    /// Anti-replay nonce.
    pub nonce: Nonce,
    /// Checksum of the exact subject version, when the caller attests to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_checksum: Option<String>,
}

impl AttestationFact {
    /// Builds a fact from any time zone.
    pub fn new<Tz: TimeZone>(
        subject_id: impl Into<SubjectId>,
        signer_id: impl Into<SignerId>,
        signer_email: impl Into<String>,
        signed_at: DateTime<Tz>,
        nonce: Nonce,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            signer_id: signer_id.into(),
            signer_email: signer_email.into(),
            signed_at: signed_at.fixed_offset(),
            nonce,
            subject_checksum: None,
        }
    }

    /// Attaches the subject checksum the signer saw.
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.subject_checksum = Some(checksum.into());
        self
    }
}
