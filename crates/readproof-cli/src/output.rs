//! Output formatting utilities.

use readproof_store::{Discrepancy, DiscrepancyKind, SignatureRecord};

/// Formats a value as pretty JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Prints the record table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!(
        "{:<6} {:<24} {:<20} {:<31} {}",
        "ID", "SUBJECT", "SIGNER", "SIGNED_AT", "PAYLOAD_HASH"
    );
    println!("{}", "-".repeat(126));
}

/// Formats a record as a table row.
pub fn format_table_row(record: &SignatureRecord) -> String {
    format!(
        "{:<6} {:<24} {:<20} {:<31} {}",
        record.id,
        truncate(record.fact.subject_id.as_str(), 24),
        truncate(record.fact.signer_id.as_str(), 20),
        record.fact.signed_at.to_rfc3339(),
        record.payload_hash.b64
    )
}

/// Formats a discrepancy as a table row.
pub fn format_discrepancy(discrepancy: &Discrepancy) -> String {
    let detail = match &discrepancy.kind {
        DiscrepancyKind::HashMismatch { stored, recomputed } => {
            format!("hash_mismatch stored={} recomputed={}", stored.b64, recomputed.b64)
        }
        DiscrepancyKind::BrokenLink { expected, found } => format!(
            "broken_link expected={} found={}",
            expected.as_ref().map_or("-", |d| d.b64.as_str()),
            found.as_ref().map_or("-", |d| d.b64.as_str())
        ),
        DiscrepancyKind::SignatureInvalid => "signature_invalid".to_string(),
        DiscrepancyKind::Unencodable { reason } => format!("unencodable {reason}"),
        DiscrepancyKind::MissingRecords { first, last } => {
            format!("missing_records {first}..={last}")
        }
        DiscrepancyKind::OutOfOrder { after } => format!("out_of_order after={after}"),
    };
    format!("{:<6} {}", discrepancy.record_id, detail)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
