//! Contract for the collaborator that knows each subject's current version.

use readproof_canonical::SubjectId;
use std::collections::HashMap;
use thiserror::Error;

/// Lookup failures from a [`SubjectDirectory`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubjectLookupError {
    /// The directory has never heard of the subject.
    #[error("subject {0} not found")]
    NotFound(SubjectId),
}

/// Resolves a subject to the checksum of its current content.
///
/// Called before an append, never while the ledger's writer lock is held.
pub trait SubjectDirectory: Send + Sync {
    /// Current checksum of `subject_id`.
    fn current_checksum(&self, subject_id: &SubjectId) -> Result<String, SubjectLookupError>;
}

/// Fixed map of subjects to checksums.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    checksums: HashMap<SubjectId, String>,
}

impl StaticDirectory {
    /// Empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a subject's checksum.
    pub fn insert(&mut self, subject_id: impl Into<SubjectId>, checksum: impl Into<String>) {
        self.checksums.insert(subject_id.into(), checksum.into());
    }
}

impl SubjectDirectory for StaticDirectory {
    fn current_checksum(&self, subject_id: &SubjectId) -> Result<String, SubjectLookupError> {
        self.checksums
            .get(subject_id)
            .cloned()
            .ok_or_else(|| SubjectLookupError::NotFound(subject_id.clone()))
    }
}
