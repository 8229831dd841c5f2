//! Store error types

use crate::codec::CodecError;
use std::io;
use std::path::PathBuf;

/// Errors raised by [`AnchorStore`](super::AnchorStore) operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store file is missing or unreadable
    #[error("failed to read anchor store '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store file exists but does not hold an array of anchor records
    #[error("anchor store '{}' holds invalid data: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Records could not be encoded for writing
    #[error("failed to encode anchors: {0}")]
    Encode(#[source] CodecError),

    /// Writing or replacing the store file failed
    #[error("failed to write anchor store '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Whether this is a read failure because the file does not exist yet
    pub fn is_missing(&self) -> bool {
        matches!(self, StoreError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// Whether the caller may treat this as "no data yet"
    pub fn is_read_failure(&self) -> bool {
        matches!(self, StoreError::Read { .. })
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
