//! readproof CLI - key management, attestation, and chain verification.

use clap::{Parser, Subcommand};
use readproof_core::{JOURNAL_ENV, PUBLIC_KEY_ENV, SIGNING_KEY_ENV};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod path;

use commands::{append, canonicalize, keygen, list, pubkey, repair, verify};

#[derive(Parser)]
#[command(name = "readproof")]
#[command(about = "Tamper-evident proof-of-read ledger CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a signing key pair
    Keygen {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the public key for a signing secret
    Pubkey {
        /// Base64 signing secret
        #[arg(long, env = SIGNING_KEY_ENV, hide_env_values = true)]
        signing_key: String,
    },
    /// Record that a signer read a subject
    Append {
        /// Path to journal file
        #[arg(long, env = JOURNAL_ENV)]
        journal: PathBuf,
        /// Base64 signing secret (ephemeral key if unset)
        #[arg(long, env = SIGNING_KEY_ENV, hide_env_values = true)]
        signing_key: Option<String>,
        /// Subject being acknowledged
        #[arg(long)]
        subject: String,
        /// Authenticated signer id
        #[arg(long)]
        signer: String,
        /// Signer email
        #[arg(long)]
        email: String,
        /// Signer display name
        #[arg(long)]
        name: Option<String>,
        /// RFC 3339 time of acknowledgment (default: now)
        #[arg(long)]
        signed_at: Option<String>,
        /// Nonce to use instead of a generated one
        #[arg(long)]
        nonce: Option<String>,
        /// Checksum of the version the signer read
        #[arg(long)]
        checksum: Option<String>,
        /// Checksum of the subject's current version
        #[arg(long)]
        current_checksum: Option<String>,
        /// fsync the journal after writing
        #[arg(long)]
        sync: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List records in a journal
    List {
        /// Path to journal file
        #[arg(env = JOURNAL_ENV)]
        journal: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Only records for this subject
        #[arg(long)]
        subject: Option<String>,
        /// Only records by this signer
        #[arg(long)]
        signer: Option<String>,
        /// Only records signed at or after this RFC 3339 time
        #[arg(long)]
        after: Option<String>,
        /// Only records signed at or before this RFC 3339 time
        #[arg(long)]
        before: Option<String>,
        /// Stop after printing N records (default: unlimited)
        #[arg(long)]
        max_records: Option<u64>,
    },
    /// Verify hashes, links, and signatures of a journal
    Verify {
        /// Path to journal file
        #[arg(env = JOURNAL_ENV)]
        journal: PathBuf,
        /// Base64 public key the chain was signed with
        #[arg(long, env = PUBLIC_KEY_ENV)]
        public_key: Option<String>,
        /// Derive the public key from this signing secret instead
        #[arg(long, env = SIGNING_KEY_ENV, hide_env_values = true)]
        signing_key: Option<String>,
        /// First record id to check
        #[arg(long, default_value_t = 1)]
        from: u64,
        /// Last record id to check (default: tail)
        #[arg(long)]
        to: Option<u64>,
        /// Exit with error code if any discrepancy is found
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Cut off a partial final frame left by an interrupted append
    Repair {
        /// Path to journal file
        #[arg(env = JOURNAL_ENV)]
        journal: PathBuf,
    },
    /// Show canonical bytes for an attestation fact
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Print the payload hash instead of the bytes
        #[arg(long)]
        hash: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("readproof=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Keygen { json } => keygen::run(json),
        Commands::Pubkey { signing_key } => pubkey::run(signing_key),
        Commands::Append {
            journal,
            signing_key,
            subject,
            signer,
            email,
            name,
            signed_at,
            nonce,
            checksum,
            current_checksum,
            sync,
            json,
        } => append::run(append::AppendArgs {
            journal,
            signing_key,
            subject,
            signer,
            email,
            name,
            signed_at,
            nonce,
            checksum,
            current_checksum,
            sync,
            json,
        }),
        Commands::List {
            journal,
            json,
            subject,
            signer,
            after,
            before,
            max_records,
        } => list::run(journal, json, subject, signer, after, before, max_records),
        Commands::Verify {
            journal,
            public_key,
            signing_key,
            from,
            to,
            strict,
            json,
        } => verify::run(journal, public_key, signing_key, from, to, strict, json),
        Commands::Repair { journal } => repair::run(journal),
        Commands::Canonicalize { input, hash } => canonicalize::run(input, hash),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
