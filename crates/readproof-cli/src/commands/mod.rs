pub mod append;
pub mod canonicalize;
pub mod keygen;
pub mod list;
pub mod pubkey;
pub mod repair;
pub mod verify;

use chrono::{DateTime, FixedOffset};

pub(crate) fn parse_time(flag: &str, value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| format!("--{flag} must be an RFC 3339 timestamp: {e}"))
}
