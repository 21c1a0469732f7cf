//! Journal writer implementation.

use crate::errors::JournalError;
use crate::frame::{FrameHeader, FrameKind, JournalHeader, FRAME_HEADER_SIZE, HEADER_SIZE};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
        }
    }
}

/// Append-only writer over a journal file.
///
/// Every append is all-or-nothing: if writing a frame fails part-way, the
/// file is truncated back to where the frame started before the error is
/// returned.
///
/// # Example
///
/// ```rust,no_run
/// use readproof_journal::{JournalWriter, WriteOptions};
/// use serde_json::json;
///
/// let mut writer = JournalWriter::open("ledger.rpj", WriteOptions::default())?;
/// writer.append_record(&json!({ "id": 1 }))?;
/// writer.finish()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalWriter {
    file: File,
    sync: bool,
    end: u64,
}

impl JournalWriter {
    /// Opens or creates a journal for appending.
    ///
    /// An empty file gets a fresh header. A non-empty file must start with a
    /// valid header; writing continues at its end.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if the file cannot be opened, is too short to
    /// be a journal, or carries an invalid header.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .create(options.create)
            .read(true)
            .write(true)
            .open(path)?;

        let len = file.metadata()?.len();
        if len == 0 {
            file.write_all(&JournalHeader::current().to_bytes())?;
            file.flush()?;
            if options.sync {
                file.sync_all()?;
            }
        } else if len < HEADER_SIZE as u64 {
            return Err(JournalError::NotAJournal);
        } else {
            let mut header = [0u8; HEADER_SIZE];
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut header)?;
            JournalHeader::from_bytes(&header)?;
        }

        let end = file.seek(SeekFrom::End(0))?;
        Ok(Self {
            file,
            sync: options.sync,
            end,
        })
    }

    /// Byte offset where the next frame will start.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Drops everything past `offset`.
    ///
    /// Used after a crash left a partial frame at the tail; `offset` must be
    /// the end of the last complete frame as reported by a permissive reader.
    pub fn discard_after(&mut self, offset: u64) -> Result<(), JournalError> {
        if offset < HEADER_SIZE as u64 || offset > self.end {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: "discard offset outside journal bounds".to_string(),
            });
        }
        if offset < self.end {
            tracing::warn!(
                discarded = self.end - offset,
                offset,
                "discarding partial frame at journal tail"
            );
            self.file.set_len(offset)?;
            self.end = self.file.seek(SeekFrom::Start(offset))?;
        }
        Ok(())
    }

    /// Serializes `record` as JSON and appends it as a record frame.
    ///
    /// Returns the byte offset of the new frame.
    pub fn append_record<T: Serialize>(&mut self, record: &T) -> Result<u64, JournalError> {
        let payload = serde_json::to_vec(record).map_err(JournalError::Serialize)?;
        self.append_raw(FrameKind::Record, &payload)
    }

    /// Appends a raw frame with the given kind and payload.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<u64, JournalError> {
        let header = FrameHeader::for_payload(kind, payload)?;
        let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
        frame.extend_from_slice(&header.to_bytes());
        frame.extend_from_slice(payload);

        let start = self.end;
        if let Err(err) = self.write_frame(&frame) {
            self.rollback(start);
            return Err(err);
        }
        self.end = start + frame.len() as u64;
        Ok(start)
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), JournalError> {
        self.file.write_all(frame)?;
        self.file.flush()?;
        if self.sync {
            self.file.sync_data()?;
        }
        Ok(())
    }

    fn rollback(&mut self, start: u64) {
        let restored = self
            .file
            .set_len(start)
            .and_then(|()| self.file.seek(SeekFrom::Start(start)).map(|_| ()));
        if let Err(err) = restored {
            tracing::error!(offset = start, error = %err, "failed to roll back partial frame");
        }
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}
