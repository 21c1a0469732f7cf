use thiserror::Error;

/// Errors that can occur while reading or appending journal frames.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid file header (magic, version, or flags).
    #[error("invalid journal header: {0}")]
    InvalidHeader(String),
    /// Invalid frame structure (reserved bytes or length).
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Payload exceeds maximum size limit.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: usize,
        /// Maximum allowed size.
        max: u32,
    },
    /// Record payload is not the JSON the caller expected.
    #[error("record payload at offset {offset} is not valid JSON: {source}")]
    Payload {
        /// Byte offset of the frame.
        offset: u64,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Record could not be serialized.
    #[error("record serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
    /// The file has content but is shorter than a header.
    #[error("file is not empty but too short to hold a journal header")]
    NotAJournal,
    /// A truncated frame is followed by more frames, so it is not a torn
    /// final write and must not be cut off.
    #[error("frame at offset {offset} is truncated but more frames follow it")]
    UnrecoverableTail {
        /// Byte offset of the truncated frame.
        offset: u64,
    },
    /// Truncated frame detected in strict mode.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset where truncation occurred.
        offset: u64,
    },
}
