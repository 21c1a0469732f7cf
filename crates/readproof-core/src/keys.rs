//! Signing key custody.
//!
//! The secret is a standard base64 string of 64 bytes: the 32-byte Ed25519
//! seed followed by the 32-byte public key. Decoded secret material only ever
//! lives in [`Zeroizing`] buffers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey, KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH};
use rand_core::OsRng;
use readproof_canonical::{Digest, Signature};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

/// Errors raised while loading or using a signing key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The configured secret cannot be turned into a key pair.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),
    /// Refusing to sign an empty message.
    #[error("refusing to sign an empty message")]
    EmptyMessage,
    /// The digest text does not decode to 32 bytes.
    #[error("cannot sign digest: {0}")]
    UnsignableDigest(String),
}

/// Owns the process signing key.
///
/// Built once at startup and shared behind an `Arc`; it is never mutated.
pub struct KeyCustodian {
    signing: SigningKey,
    ephemeral: bool,
}

impl KeyCustodian {
    /// Loads the configured secret, or generates an ephemeral key when none
    /// is configured.
    ///
    /// An ephemeral key keeps the process running, but nothing it signs will
    /// verify once the process restarts.
    pub fn load(secret: Option<&str>) -> Result<Self, KeyError> {
        match secret.map(str::trim).filter(|s| !s.is_empty()) {
            Some(secret) => Self::from_secret(secret),
            None => {
                let custodian = Self::generate();
                tracing::warn!(
                    public_key = %custodian.public_key_b64(),
                    "no signing key configured; using an ephemeral key, signatures will not verify after restart"
                );
                Ok(custodian)
            }
        }
    }

    /// Decodes a base64 seed-plus-public-key secret.
    pub fn from_secret(secret: &str) -> Result<Self, KeyError> {
        let raw = Zeroizing::new(
            STANDARD
                .decode(secret.trim())
                .map_err(|e| KeyError::InvalidKeyMaterial(format!("secret is not base64: {e}")))?,
        );
        if raw.len() != KEYPAIR_LENGTH {
            return Err(KeyError::InvalidKeyMaterial(format!(
                "secret decodes to {} bytes, expected {KEYPAIR_LENGTH}",
                raw.len()
            )));
        }
        let mut keypair = Zeroizing::new([0u8; KEYPAIR_LENGTH]);
        keypair.copy_from_slice(&raw);
        let signing = SigningKey::from_keypair_bytes(&keypair).map_err(|_| {
            KeyError::InvalidKeyMaterial("public key half does not match the seed".into())
        })?;

        let custodian = Self {
            signing,
            ephemeral: false,
        };
        tracing::info!(public_key = %custodian.public_key_b64(), "loaded signing key");
        Ok(custodian)
    }

    /// Fresh key from the OS random source. Ephemeral until its secret is
    /// exported and configured.
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
            ephemeral: true,
        }
    }

    /// The secret in the format [`KeyCustodian::load`] accepts.
    pub fn export_secret(&self) -> Zeroizing<String> {
        let keypair = Zeroizing::new(self.signing.to_keypair_bytes());
        Zeroizing::new(STANDARD.encode(keypair.as_slice()))
    }

    /// True when the key was generated for this process only.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Signs raw bytes.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, KeyError> {
        if message.is_empty() {
            return Err(KeyError::EmptyMessage);
        }
        Ok(Signature::ed25519(self.signing.sign(message).to_bytes()))
    }

    /// Signs the 32 raw bytes of a payload hash.
    pub fn sign_digest(&self, digest: &Digest) -> Result<Signature, KeyError> {
        let bytes = digest
            .to_bytes()
            .map_err(|e| KeyError::UnsignableDigest(e.to_string()))?;
        self.sign(&bytes)
    }

    /// Raw public key bytes.
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing.verifying_key().to_bytes()
    }

    /// Public half as a verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }

    /// Public key as standard base64, the published form.
    pub fn public_key_b64(&self) -> String {
        STANDARD.encode(self.public_key())
    }
}

impl fmt::Debug for KeyCustodian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCustodian")
            .field("public_key", &self.public_key_b64())
            .field("ephemeral", &self.ephemeral)
            .finish_non_exhaustive()
    }
}

/// Published verifying key, for readers that never hold the secret.
pub struct PublicKey;

impl PublicKey {
    /// Parses a standard base64 32-byte public key.
    pub fn parse(b64: &str) -> Result<VerifyingKey, KeyError> {
        let raw = STANDARD
            .decode(b64.trim())
            .map_err(|e| KeyError::InvalidKeyMaterial(format!("public key is not base64: {e}")))?;
        let bytes: [u8; PUBLIC_KEY_LENGTH] = raw.as_slice().try_into().map_err(|_| {
            KeyError::InvalidKeyMaterial(format!(
                "public key decodes to {} bytes, expected {PUBLIC_KEY_LENGTH}",
                raw.len()
            ))
        })?;
        VerifyingKey::from_bytes(&bytes)
            .map_err(|e| KeyError::InvalidKeyMaterial(format!("not an ed25519 point: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Signature as DalekSignature;

    #[test]
    fn exported_secret_loads_back_to_the_same_key() {
        let original = KeyCustodian::generate();
        let secret = original.export_secret();

        let loaded = KeyCustodian::load(Some(secret.as_str())).unwrap();
        assert_eq!(loaded.public_key(), original.public_key());
        assert!(!loaded.is_ephemeral());
        assert!(original.is_ephemeral());
    }

    #[test]
    fn absent_secret_degrades_to_ephemeral() {
        assert!(KeyCustodian::load(None).unwrap().is_ephemeral());
        assert!(KeyCustodian::load(Some("   ")).unwrap().is_ephemeral());
    }

    #[test]
    fn malformed_secrets_are_invalid_key_material() {
        let short = STANDARD.encode([1u8; 32]);
        let mut mismatched = [3u8; 64];
        mismatched[32..].copy_from_slice(&[9u8; 32]);
        let mismatched = STANDARD.encode(mismatched);

        for secret in ["not base64!!", short.as_str(), mismatched.as_str()] {
            assert!(matches!(
                KeyCustodian::load(Some(secret)),
                Err(KeyError::InvalidKeyMaterial(_))
            ));
        }
    }

    #[test]
    fn signature_round_trips_over_digest_bytes() {
        let custodian = KeyCustodian::generate();
        let digest = Digest::sha256(b"subject_id=doc-1");
        let signature = custodian.sign_digest(&digest).unwrap();

        let sig = DalekSignature::from_bytes(&signature.to_bytes().unwrap());
        let key = PublicKey::parse(&custodian.public_key_b64()).unwrap();
        assert!(key.verify_strict(&digest.to_bytes().unwrap(), &sig).is_ok());
        assert!(key.verify_strict(b"something else", &sig).is_err());
    }

    #[test]
    fn empty_message_is_refused() {
        assert_eq!(
            KeyCustodian::generate().sign(b"").unwrap_err(),
            KeyError::EmptyMessage
        );
    }

    #[test]
    fn debug_output_never_contains_the_secret() {
        let custodian = KeyCustodian::generate();
        let debug = format!("{custodian:?}");
        assert!(!debug.contains(custodian.export_secret().as_str()));
        assert!(debug.contains(&custodian.public_key_b64()));
    }

    #[test]
    fn public_key_parse_rejects_wrong_length() {
        assert!(PublicKey::parse(&STANDARD.encode([0u8; 31])).is_err());
    }
}
