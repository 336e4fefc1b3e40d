//! Quote store error types.
//!
//! - `Serialization`: the quote file is not a JSON array of strings
//! - `Io`: the file system refused a read, write or rename

use thiserror::Error;

/// Errors that can occur while reading or writing quotes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Encoding or decoding the quote file failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error (missing permissions, full disk, failed rename)
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}
