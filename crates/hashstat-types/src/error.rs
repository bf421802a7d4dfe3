use thiserror::Error;

use crate::entry::EntryId;

/// Errors from entry store operations (used by trait definitions in hashstat-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Backend unreachable, malformed query, or a failed read/write.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("entry {0} not found")]
    NotFound(EntryId),

    #[error("entry {0} is already finalized")]
    AlreadyFinalized(EntryId),

    #[error("invalid table name: '{0}'")]
    InvalidTableName(String),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}

/// Errors from loading the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },
}
