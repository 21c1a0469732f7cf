//! Ledger configuration.

use crate::chain::ChainBuilder;
use crate::errors::LedgerError;
use crate::keys::KeyCustodian;
use readproof_store::{JournalLedger, LedgerStore, MemoryLedger, WriteOptions};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Environment variable naming the journal file.
pub const JOURNAL_ENV: &str = "READPROOF_JOURNAL";
/// Environment variable holding the base64 signing secret.
pub const SIGNING_KEY_ENV: &str = "READPROOF_SIGNING_KEY";
/// Environment variable holding a published base64 public key.
pub const PUBLIC_KEY_ENV: &str = "READPROOF_PUBLIC_KEY";

/// Everything needed to open a ledger.
#[derive(Clone, Default)]
pub struct LedgerConfig {
    /// Journal file; `None` keeps the ledger in memory.
    pub journal_path: Option<PathBuf>,
    /// Base64 signing secret; `None` runs with an ephemeral key.
    pub signing_key: Option<String>,
    /// fsync after every append.
    pub sync: bool,
}

impl LedgerConfig {
    /// Reads `READPROOF_JOURNAL` and `READPROOF_SIGNING_KEY`.
    pub fn from_env() -> Self {
        Self {
            journal_path: std::env::var_os(JOURNAL_ENV).map(PathBuf::from),
            signing_key: std::env::var(SIGNING_KEY_ENV).ok(),
            sync: false,
        }
    }

    /// Loads the key and opens the store.
    pub fn open(&self) -> Result<ChainBuilder, LedgerError> {
        let custodian = Arc::new(KeyCustodian::load(self.signing_key.as_deref())?);
        let store: Arc<dyn LedgerStore> = match &self.journal_path {
            Some(path) => Arc::new(JournalLedger::open(
                path,
                WriteOptions {
                    sync: self.sync,
                    ..WriteOptions::default()
                },
            )?),
            None => Arc::new(MemoryLedger::new()),
        };
        Ok(ChainBuilder::new(custodian, store))
    }
}

impl fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("journal_path", &self.journal_path)
            .field("signing_key", &self.signing_key.as_ref().map(|_| "<redacted>"))
            .field("sync", &self.sync)
            .finish()
    }
}
