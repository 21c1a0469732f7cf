//! Canonical line encoding of attestation facts.
//!
//! The encoding is a fixed sequence of `key=value` lines joined by `\n`
//! (no trailing newline):
//!
//! ```text
//! subject_id=<subject>
//! signer_id=<signer>
//! signer_email=<lower-cased email>
//! signed_at=<RFC 3339, nanoseconds, UTC, Z suffix>
//! nonce=<nonce>
//! subject_checksum=<checksum>      (only when present)
//! ```
//!
//! The payload hash of a fact is `sha256(encode(fact))`.

use chrono::{SecondsFormat, Utc};

use crate::digest::Digest;
use crate::fact::AttestationFact;

/// Error returned when a fact cannot be encoded unambiguously.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A required field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    /// A value contained a carriage return or line feed.
    #[error("{0} must not contain line breaks")]
    LineBreak(&'static str),
}

/// Canonical bytes for one fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalBytes {
    /// UTF-8 encoded lines.
    pub bytes: Vec<u8>,
}

impl CanonicalBytes {
    /// SHA-256 of the encoded bytes.
    pub fn payload_hash(&self) -> Digest {
        Digest::sha256(&self.bytes)
    }
}

/// Encodes a fact into its canonical byte form.
///
/// Pure: the same logical fact always yields the same bytes, regardless of
/// email casing or the time zone `signed_at` was expressed in.
pub fn encode(fact: &AttestationFact) -> Result<CanonicalBytes, EncodeError> {
    let email = fact.signer_email.to_lowercase();
    let signed_at = fact
        .signed_at
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Nanos, true);

    let mut lines = vec![
        line("subject_id", fact.subject_id.as_str())?,
        line("signer_id", fact.signer_id.as_str())?,
        line("signer_email", &email)?,
        line("signed_at", &signed_at)?,
        line("nonce", fact.nonce.as_str())?,
    ];
    if let Some(checksum) = &fact.subject_checksum {
        lines.push(line("subject_checksum", checksum)?);
    }

    Ok(CanonicalBytes {
        bytes: lines.join("\n").into_bytes(),
    })
}

/// Encodes and hashes a fact in one step.
pub fn payload_hash(fact: &AttestationFact) -> Result<Digest, EncodeError> {
    encode(fact).map(|encoded| encoded.payload_hash())
}

fn line(key: &'static str, value: &str) -> Result<String, EncodeError> {
    if value.is_empty() {
        return Err(EncodeError::EmptyField(key));
    }
    if value.contains(['\r', '\n']) {
        return Err(EncodeError::LineBreak(key));
    }
    Ok(format!("{key}={value}"))
}
