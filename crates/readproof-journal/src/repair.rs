//! Torn-tail repair.
//!
//! Opening a journal never truncates it. A crash in the middle of an append
//! can leave a partial final frame, which strict readers reject; the only way
//! to drop it is [`repair_torn_tail`], run on purpose by an operator.

use crate::errors::JournalError;
use crate::frame::FRAME_HEADER_SIZE;
use crate::reader::{JournalReader, ReadMode};
use crate::writer::{JournalWriter, WriteOptions};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// What [`repair_torn_tail`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailRepair {
    /// Every frame was complete; nothing was changed.
    Clean,
    /// A partial final frame was cut off.
    Discarded {
        /// Offset the file was truncated to.
        offset: u64,
        /// Number of bytes removed.
        bytes: u64,
    },
}

/// Drops a partial final frame left by an interrupted append.
///
/// The journal is read strictly. If it ends in a truncated frame, the bytes
/// from that frame to the end of the file are only removed when they cannot
/// hide another frame. Otherwise [`JournalError::UnrecoverableTail`] is
/// returned and the file is left as it is. Any other damage is returned
/// unchanged.
pub fn repair_torn_tail<P: AsRef<Path>>(
    path: P,
    options: WriteOptions,
) -> Result<TailRepair, JournalError> {
    let path = path.as_ref();
    let mut reader = JournalReader::open(path, ReadMode::Strict)?;
    let offset = loop {
        match reader.read_frame() {
            Ok(Some(_)) => continue,
            Ok(None) => return Ok(TailRepair::Clean),
            Err(JournalError::TruncatedFrame { offset }) => break offset,
            Err(other) => return Err(other),
        }
    };
    drop(reader);

    let mut region = Vec::new();
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    file.read_to_end(&mut region)?;
    if !is_final_frame(&region) {
        tracing::error!(offset, "truncated frame is followed by more frames; refusing to repair");
        return Err(JournalError::UnrecoverableTail { offset });
    }

    let mut writer = JournalWriter::open(
        path,
        WriteOptions {
            create: false,
            ..options
        },
    )?;
    let bytes = writer.end() - offset;
    writer.discard_after(offset)?;
    writer.finish()?;
    tracing::warn!(offset, bytes, "repaired torn journal tail");
    Ok(TailRepair::Discarded { offset, bytes })
}

/// Every frame header carries three zero reserved bytes, and JSON payloads
/// never contain a NUL byte. A NUL after the partial frame's own header
/// therefore means another frame follows.
fn is_final_frame(region: &[u8]) -> bool {
    region.len() < FRAME_HEADER_SIZE || !region[FRAME_HEADER_SIZE..].contains(&0)
}
