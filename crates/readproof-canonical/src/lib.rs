//! Canonical data model primitives for readproof attestations.
//!
//! Every byte that participates in hashing or signature verification is
//! produced by this crate. The line-oriented encoding lives in [`encoder`];
//! the facts it consumes live in [`fact`].
//!
#![deny(missing_docs)]

/// Fixed-order line encoding of attestation facts.
pub mod encoder;
/// Digest primitives (SHA-256, base64url without padding).
pub mod digest;
/// Attestation fact supplied by callers.
pub mod fact;
/// Identifier newtypes validated at the API edge.
pub mod identifiers;
/// Detached Ed25519 signature wrapper.
pub mod signature;
/// Validation helpers used by canonical types.
pub mod validation;

pub use digest::{Digest, DigestAlg};
pub use encoder::{encode, payload_hash, CanonicalBytes, EncodeError};
pub use fact::AttestationFact;
pub use identifiers::{Nonce, SignerId, SubjectId};
pub use signature::{Signature, SignatureAlg};
pub use validation::ValidationError;
