//! Repair command implementation.

use crate::path;
use readproof_store::{JournalLedger, TailRepair, WriteOptions};
use std::path::PathBuf;

pub fn run(journal: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(&journal, false)
        .map_err(|e| format!("Invalid journal path: {}", e))?;

    let outcome = JournalLedger::repair_torn_tail(
        &journal_path,
        WriteOptions {
            sync: true,
            ..WriteOptions::default()
        },
    )
    .map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal_path);
        format!("Cannot repair journal {}: {}", sanitized, e)
    })?;

    match outcome {
        TailRepair::Clean => println!("journal is intact; nothing to repair"),
        TailRepair::Discarded { offset, bytes } => {
            println!("discarded {bytes} byte(s) of a partial frame at offset {offset}")
        }
    }
    Ok(())
}
