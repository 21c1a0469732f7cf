//! Verify command implementation.

use crate::output;
use crate::path;
use readproof_core::{KeyCustodian, PublicKey};
use readproof_store::{ChainVerifier, JournalLedger, MemoryLedger};
use std::path::PathBuf;

pub fn run(
    journal: PathBuf,
    public_key: Option<String>,
    signing_key: Option<String>,
    from: u64,
    to: Option<u64>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(&journal, false)
        .map_err(|e| format!("Invalid journal path: {}", e))?;

    let key = match (public_key, signing_key) {
        (Some(public), _) => PublicKey::parse(&public)?,
        (None, Some(secret)) => KeyCustodian::from_secret(&secret)?.verifying_key(),
        (None, None) => {
            return Err("a public key is required (--public-key or READPROOF_PUBLIC_KEY)".into())
        }
    };

    // Verification reads a snapshot; it never opens the journal for writing.
    let records = JournalLedger::read_records(&journal_path).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal_path);
        format!("Failed to read journal {}: {}", sanitized, e)
    })?;
    let snapshot = MemoryLedger::from_records(records);

    let report = ChainVerifier::new(key).verify_chain(&snapshot, from, to.unwrap_or(u64::MAX))?;

    if json_output {
        println!("{}", output::format_json(&report));
    } else {
        println!(
            "checked {} record(s) in {}..={}: {}",
            report.checked,
            report.from,
            report.to,
            if report.is_clean() { "OK" } else { "TAMPERED" }
        );
        if !report.is_clean() {
            println!("{:<6} {}", "ID", "DISCREPANCY");
            println!("{}", "-".repeat(70));
            for discrepancy in &report.discrepancies {
                println!("{}", output::format_discrepancy(discrepancy));
            }
        }
    }

    if strict && !report.is_clean() {
        std::process::exit(1);
    }

    Ok(())
}
