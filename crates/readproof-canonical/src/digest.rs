use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

use crate::validation::ValidationError;

/// Length of a SHA-256 digest in bytes.
pub const DIGEST_LEN: usize = 32;

static DIGEST_B64: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{43}$").expect("static digest pattern"));

/// Supported digest algorithms for payload hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlg {
    /// SHA-256, the only algorithm the ledger writes.
    #[serde(rename = "sha-256")]
    Sha256,
}

/// Algorithm + bytes digest, encoded as base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest {
    /// Digest algorithm (currently always `sha-256`).
    pub alg: DigestAlg,
    /// Base64URL (no padding) digest bytes.
    #[serde(rename = "b64")]
    pub b64: String,
}

impl Digest {
    /// Constructs a validated digest from its base64url text.
    pub fn new(alg: DigestAlg, b64: impl Into<String>) -> Result<Self, ValidationError> {
        let b64 = b64.into();
        if !DIGEST_B64.is_match(&b64) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value: b64,
            });
        }
        Ok(Digest { alg, b64 })
    }

    /// Hashes `data` with SHA-256.
    pub fn sha256(data: &[u8]) -> Self {
        let hash: [u8; DIGEST_LEN] = Sha256::digest(data).into();
        Self::from_bytes(hash)
    }

    /// Wraps raw SHA-256 output.
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Digest {
            alg: DigestAlg::Sha256,
            b64: URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    /// Decodes the digest back to its raw 32 bytes.
    ///
    /// Fails if the stored text was altered into something that is no longer
    /// a 32-byte base64url value.
    pub fn to_bytes(&self) -> Result<[u8; DIGEST_LEN], ValidationError> {
        let raw = URL_SAFE_NO_PAD
            .decode(&self.b64)
            .map_err(|e| ValidationError::Undecodable {
                field: "digest",
                reason: e.to_string(),
            })?;
        raw.as_slice()
            .try_into()
            .map_err(|_| ValidationError::WrongLength {
                field: "digest",
                expected: DIGEST_LEN,
                actual: raw.len(),
            })
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.b64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input_matches_known_vector() {
        let digest = Digest::sha256(b"");
        assert_eq!(
            hex::encode(digest.to_bytes().unwrap()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(digest.b64.len(), 43);
    }

    #[test]
    fn new_rejects_padded_or_short_values() {
        assert!(Digest::new(DigestAlg::Sha256, "abc").is_err());
        let padded = format!("{}=", Digest::sha256(b"x").b64);
        assert!(Digest::new(DigestAlg::Sha256, padded).is_err());
    }

    #[test]
    fn to_bytes_reports_undecodable_text() {
        let digest = Digest {
            alg: DigestAlg::Sha256,
            b64: "not base64!".into(),
        };
        assert!(matches!(
            digest.to_bytes(),
            Err(ValidationError::Undecodable { .. })
        ));
    }
}
