//! Journal reader implementation.

use crate::errors::JournalError;
use crate::frame::{FrameHeader, FrameKind, JournalHeader, FRAME_HEADER_SIZE, HEADER_SIZE};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read mode for handling truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Strict mode: truncated frames are errors.
    Strict,
    /// Permissive mode: truncation is treated as end-of-file.
    Permissive,
}

/// Sequential reader over a journal file.
///
/// ```rust,no_run
/// use readproof_journal::{JournalReader, ReadMode};
///
/// let mut reader = JournalReader::open("ledger.rpj", ReadMode::Strict)?;
/// while let Some(record) = reader.read_record::<serde_json::Value>()? {
///     println!("{}", record["id"]);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalReader {
    input: BufReader<File>,
    mode: ReadMode,
    position: u64,
}

impl JournalReader {
    /// Opens a journal and validates its header.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut input = BufReader::new(File::open(path)?);
        let mut header = [0u8; HEADER_SIZE];
        input.read_exact(&mut header).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => JournalError::NotAJournal,
            _ => JournalError::Io(e),
        })?;
        JournalHeader::from_bytes(&header)?;

        Ok(Self {
            input,
            mode,
            position: HEADER_SIZE as u64,
        })
    }

    /// Byte offset just past the last complete frame read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next frame. `Ok(None)` at end-of-file, or at a truncated
    /// tail in permissive mode.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        let mut header_bytes = [0u8; FRAME_HEADER_SIZE];
        match read_full(&mut self.input, &mut header_bytes)? {
            0 => return Ok(None),
            n if n < FRAME_HEADER_SIZE => return self.truncated(),
            _ => {}
        }
        let header = FrameHeader::from_bytes(&header_bytes, self.position)?;

        let mut payload = vec![0u8; header.len as usize];
        if read_full(&mut self.input, &mut payload)? < payload.len() {
            return self.truncated();
        }

        self.position += (FRAME_HEADER_SIZE + payload.len()) as u64;
        Ok(Some((header.kind, payload)))
    }

    /// Reads and decodes the next record frame, skipping unknown kinds.
    pub fn read_record<T: DeserializeOwned>(&mut self) -> Result<Option<T>, JournalError> {
        loop {
            let offset = self.position;
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::Record, payload)) => {
                    return serde_json::from_slice(&payload)
                        .map(Some)
                        .map_err(|source| JournalError::Payload { offset, source });
                }
                Some((FrameKind::Unknown(kind), _)) => {
                    tracing::debug!(kind, offset, "skipping unknown frame kind");
                }
            }
        }
    }

    fn truncated<T>(&self) -> Result<Option<T>, JournalError> {
        match self.mode {
            ReadMode::Permissive => Ok(None),
            ReadMode::Strict => Err(JournalError::TruncatedFrame {
                offset: self.position,
            }),
        }
    }
}

/// Fills `buf` as far as the input allows and returns the byte count.
fn read_full(input: &mut impl Read, buf: &mut [u8]) -> Result<usize, JournalError> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
