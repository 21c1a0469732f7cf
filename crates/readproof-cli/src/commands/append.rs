//! Append command implementation.

use super::parse_time;
use crate::output;
use crate::path;
use chrono::Utc;
use readproof_canonical::{Nonce, SignerId, SubjectId};
use readproof_core::{AppendRequest, LedgerConfig};
use std::path::PathBuf;

pub struct AppendArgs {
    pub journal: PathBuf,
    pub signing_key: Option<String>,
    pub subject: String,
    pub signer: String,
    pub email: String,
    pub name: Option<String>,
    pub signed_at: Option<String>,
    pub nonce: Option<String>,
    pub checksum: Option<String>,
    pub current_checksum: Option<String>,
    pub sync: bool,
    pub json: bool,
}

pub fn run(args: AppendArgs) -> Result<(), Box<dyn std::error::Error>> {
    let journal_path = path::validate_journal_path(&args.journal, true)
        .map_err(|e| format!("Invalid journal path: {}", e))?;

    let signed_at = match &args.signed_at {
        Some(value) => parse_time("signed-at", value)?,
        None => Utc::now().fixed_offset(),
    };

    let subject = SubjectId::parse(args.subject).map_err(|e| format!("Invalid subject: {}", e))?;
    let signer = SignerId::parse(args.signer).map_err(|e| format!("Invalid signer: {}", e))?;

    let mut request = AppendRequest::new(subject, signer, args.email, signed_at);
    if let Some(name) = args.name {
        request = request.with_signer_name(name);
    }
    if let Some(nonce) = args.nonce {
        request = request.with_nonce(
            Nonce::parse(nonce).map_err(|e| format!("Invalid nonce: {}", e))?,
        );
    }
    if let Some(checksum) = args.checksum {
        request = request.with_subject_checksum(checksum);
    }
    if let Some(current) = args.current_checksum {
        request = request.with_current_checksum(current);
    }

    let builder = LedgerConfig {
        journal_path: Some(journal_path),
        signing_key: args.signing_key,
        sync: args.sync,
    }
    .open()?;
    let record = builder.append(request)?;

    if args.json {
        println!("{}", output::format_json(&record));
    } else {
        output::print_table_header();
        println!("{}", output::format_table_row(&record));
    }
    Ok(())
}
