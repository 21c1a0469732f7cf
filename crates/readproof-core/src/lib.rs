//! Key custody and chain building for the readproof ledger.
//!
//! A [`ChainBuilder`] takes an [`AppendRequest`], encodes and hashes the
//! facts, signs the hash with the process [`KeyCustodian`], and hands the
//! result to a [`readproof_store::LedgerStore`] that links it to the tail.
//!
//! ```no_run
//! use chrono::Utc;
//! use readproof_core::{AppendRequest, LedgerConfig};
//!
//! # fn main() -> Result<(), readproof_core::LedgerError> {
//! let builder = LedgerConfig::from_env().open()?;
//! let record = builder.append(AppendRequest::new("doc-1", "alice", "alice@example.com", Utc::now()))?;
//! assert!(builder.verify_chain(record.id, record.id)?.is_clean());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

/// Append pipeline.
pub mod chain;
/// Ledger configuration.
pub mod config;
/// Ledger error type.
pub mod errors;
/// Signing key custody.
pub mod keys;
/// Nonce generation.
pub mod nonce;
/// Subject directory contract.
pub mod subject;

pub use chain::{AppendRequest, ChainBuilder};
pub use config::{LedgerConfig, JOURNAL_ENV, PUBLIC_KEY_ENV, SIGNING_KEY_ENV};
pub use errors::LedgerError;
pub use keys::{KeyCustodian, KeyError, PublicKey};
pub use nonce::generate_nonce;
pub use subject::{StaticDirectory, SubjectDirectory, SubjectLookupError};
