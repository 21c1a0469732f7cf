//! List command implementation.

use super::parse_time;
use crate::output;
use crate::path;
use chrono::Utc;
use readproof_store::{select, AndFilter, JournalLedger, SignedAtRangeFilter, SignerFilter, SubjectFilter};
use std::path::PathBuf;

pub fn run(
    journal: PathBuf,
    json: bool,
    subject: Option<String>,
    signer: Option<String>,
    after: Option<String>,
    before: Option<String>,
    max_records: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(&journal, false)
        .map_err(|e| format!("Invalid journal path: {}", e))?;

    let records = JournalLedger::read_records(&journal_path).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal_path);
        format!("Failed to read journal {}: {}", sanitized, e)
    })?;

    let mut filter = AndFilter::default();
    if let Some(subject_id) = subject {
        filter = filter.with(SubjectFilter {
            subject_id: subject_id.into(),
        });
    }
    if let Some(signer_id) = signer {
        filter = filter.with(SignerFilter {
            signer_id: signer_id.into(),
        });
    }
    if after.is_some() || before.is_some() {
        filter = filter.with(SignedAtRangeFilter {
            after: after
                .map(|v| parse_time("after", &v))
                .transpose()?
                .map(|t| t.with_timezone(&Utc)),
            before: before
                .map(|v| parse_time("before", &v))
                .transpose()?
                .map(|t| t.with_timezone(&Utc)),
        });
    }

    let limit = max_records.map_or(usize::MAX, |m| usize::try_from(m).unwrap_or(usize::MAX));
    let selected = select(records, &filter);

    if !json {
        output::print_table_header();
    }
    for record in selected.iter().take(limit) {
        if json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!("{}", output::format_table_row(record));
        }
    }

    Ok(())
}
