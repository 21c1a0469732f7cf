use crate::errors::JournalError;

/// Journal file magic bytes: `b"RPJ1"`.
pub const MAGIC: &[u8; 4] = b"RPJ1";

/// Current journal format version.
pub const VERSION: u16 = 0x0001;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Upper bound on a single record payload: 1 MiB. Signature records are a
/// few hundred bytes; anything larger is corruption.
pub const MAX_PAYLOAD_SIZE: u32 = 1024 * 1024;

const KIND_RECORD: u8 = 0x01;

/// Journal file header: magic, version, flags, eight reserved zero bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalHeader {
    /// Format version.
    pub version: u16,
}

impl JournalHeader {
    /// Header for the current format version.
    pub fn current() -> Self {
        Self { version: VERSION }
    }

    /// Serializes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes
    }

    /// Parses and validates a header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        if bytes.len() < HEADER_SIZE {
            return Err(JournalError::InvalidHeader(format!(
                "header too short: {} bytes",
                bytes.len()
            )));
        }
        if &bytes[0..4] != MAGIC {
            return Err(JournalError::InvalidHeader(format!(
                "invalid magic {:?}",
                &bytes[0..4]
            )));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(JournalError::InvalidHeader(format!(
                "unsupported version 0x{version:04x}"
            )));
        }
        if bytes[6..HEADER_SIZE].iter().any(|b| *b != 0) {
            return Err(JournalError::InvalidHeader(
                "non-zero flags or reserved bytes".to_string(),
            ));
        }
        Ok(Self { version })
    }
}

/// Kind byte of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// One JSON-encoded signature record.
    Record,
    /// Written by a newer format revision; readers skip it.
    Unknown(u8),
}

impl FrameKind {
    /// Decodes a kind byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            KIND_RECORD => FrameKind::Record,
            other => FrameKind::Unknown(other),
        }
    }

    /// Encodes the kind byte.
    pub fn to_byte(self) -> u8 {
        match self {
            FrameKind::Record => KIND_RECORD,
            FrameKind::Unknown(b) => b,
        }
    }
}

/// Frame header: kind, three reserved zero bytes, little-endian payload length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Frame kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl FrameHeader {
    /// Builds a header for a payload, enforcing the size limit.
    pub fn for_payload(kind: FrameKind, payload: &[u8]) -> Result<Self, JournalError> {
        if payload.len() > MAX_PAYLOAD_SIZE as usize {
            return Err(JournalError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(Self {
            kind,
            len: payload.len() as u32,
        })
    }

    /// Serializes the frame header.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut bytes = [0u8; FRAME_HEADER_SIZE];
        bytes[0] = self.kind.to_byte();
        bytes[4..8].copy_from_slice(&self.len.to_le_bytes());
        bytes
    }

    /// Parses a frame header that starts at `offset` in the file.
    pub fn from_bytes(bytes: &[u8; FRAME_HEADER_SIZE], offset: u64) -> Result<Self, JournalError> {
        if bytes[1..4] != [0u8; 3] {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: "non-zero reserved bytes".to_string(),
            });
        }
        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::InvalidFrame {
                offset,
                reason: format!("payload size {len} exceeds maximum {MAX_PAYLOAD_SIZE}"),
            });
        }
        Ok(Self {
            kind: FrameKind::from_byte(bytes[0]),
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_rejects_foreign_magic() {
        let mut bytes = JournalHeader::current().to_bytes();
        bytes[0] = b'N';
        assert!(JournalHeader::from_bytes(&bytes).is_err());
    }

    #[test]
    fn header_rejects_unknown_version_and_flags() {
        let mut bytes = JournalHeader::current().to_bytes();
        bytes[4] = 0x02;
        let err = JournalHeader::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("version"));

        let mut bytes = JournalHeader::current().to_bytes();
        bytes[6] = 0x01;
        assert!(JournalHeader::from_bytes(&bytes).is_err());
    }

    #[test]
    fn frame_header_enforces_limits() {
        let big = vec![0u8; MAX_PAYLOAD_SIZE as usize + 1];
        assert!(FrameHeader::for_payload(FrameKind::Record, &big).is_err());

        let mut bytes = FrameHeader::for_payload(FrameKind::Record, b"{}")
            .unwrap()
            .to_bytes();
        bytes[2] = 0x01;
        assert!(matches!(
            FrameHeader::from_bytes(&bytes, 16),
            Err(JournalError::InvalidFrame { offset: 16, .. })
        ));
    }

    #[test]
    fn unknown_kind_survives_round_trip() {
        assert_eq!(FrameKind::from_byte(0xFE).to_byte(), 0xFE);
    }
}
