//! Append-only storage and verification for the readproof ledger.
//!
//! This crate provides:
//! - [`SignatureRecord`], the persisted ledger entry
//! - the [`LedgerStore`] contract with atomic tail-linked inserts and
//!   storage-level uniqueness of subject/signer pairs and nonces
//! - [`MemoryLedger`] and the durable [`JournalLedger`]
//! - record filters for listing
//! - [`ChainVerifier`], which replays the chain against a public key
//!
//! There is no update or delete path; `created_at` and every other field are
//! written once.

#![deny(missing_docs)]

/// Error types for store operations.
pub mod error;
/// Record filtering API.
pub mod filter;
mod index;
/// Journal-backed storage implementation.
pub mod journal;
/// In-memory storage implementation.
pub mod memory;
/// Ledger entry types.
pub mod record;
/// Storage backend trait.
pub mod traits;
/// Chain verification.
pub mod verify;

pub use error::StoreError;
pub use filter::{select, AndFilter, RecordFilter, SignedAtRangeFilter, SignerFilter, SubjectFilter};
pub use journal::JournalLedger;
pub use memory::MemoryLedger;
pub use readproof_journal::{TailRepair, WriteOptions};
pub use record::{PendingRecord, SignatureRecord};
pub use traits::LedgerStore;
pub use verify::{ChainVerifier, Discrepancy, DiscrepancyKind, VerificationReport};
