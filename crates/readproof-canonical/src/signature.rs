//! Detached signature over a payload hash.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Length of an Ed25519 signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Signature algorithms the ledger understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAlg {
    /// Ed25519 (RFC 8032).
    #[serde(rename = "ed25519")]
    Ed25519,
}

/// Signature bytes carried as base64url without padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Signature algorithm.
    pub alg: SignatureAlg,
    /// Base64URL (no padding) signature bytes.
    pub b64: String,
}

impl Signature {
    /// Wraps a raw Ed25519 signature.
    pub fn ed25519(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self {
            alg: SignatureAlg::Ed25519,
            b64: URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    /// Decodes the raw 64 signature bytes.
    pub fn to_bytes(&self) -> Result<[u8; SIGNATURE_LEN], ValidationError> {
        let raw = URL_SAFE_NO_PAD
            .decode(&self.b64)
            .map_err(|e| ValidationError::Undecodable {
                field: "signature",
                reason: e.to_string(),
            })?;
        raw.as_slice()
            .try_into()
            .map_err(|_| ValidationError::WrongLength {
                field: "signature",
                expected: SIGNATURE_LEN,
                actual: raw.len(),
            })
    }
}
