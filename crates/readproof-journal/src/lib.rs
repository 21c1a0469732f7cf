//! Append-only journal file for readproof signature records.
//!
//! Layout:
//! - 16-byte header: `b"RPJ1"`, little-endian version, zero flags, eight
//!   reserved zero bytes.
//! - A sequence of frames: kind byte, three reserved zero bytes, little-endian
//!   `u32` payload length, then the payload. Record frames carry one JSON
//!   object each.
//!
//! The journal knows nothing about hashing or signatures; chain linkage and
//! verification are layered on top by `readproof-store`.

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Header and frame structure.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Explicit repair of a torn final frame.
pub mod repair;
/// Journal writer implementation.
pub mod writer;

pub use errors::JournalError;
pub use frame::{FrameHeader, FrameKind, JournalHeader};
pub use reader::{JournalReader, ReadMode};
pub use repair::{repair_torn_tail, TailRepair};
pub use writer::{JournalWriter, WriteOptions};
