//! Error types for blobpush

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for blobpush operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for blobpush
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors (source stream and file system operations)
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Staging a block was rejected by the store; aborts the file transfer
    #[error("staging block {index} failed")]
    Staging {
        index: u64,
        #[source]
        source: Box<Error>,
    },

    /// Committing the block list was rejected by the store
    #[error("committing block list failed")]
    Commit {
        #[source]
        source: Box<Error>,
    },

    /// Store-level errors (placeholder missing, unknown block id)
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Azure service errors
    #[error("Azure error: {message}")]
    Azure { message: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Invalid destination URI format
    #[error("invalid destination: {uri} - {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Source path not found
    #[error("source not found: {path}")]
    NotFound { path: PathBuf },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an Azure error
    pub fn azure(message: impl Into<String>) -> Self {
        Self::Azure {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Wrap a store error as a staging failure for the block at `index`
    pub fn staging(index: u64, cause: Error) -> Self {
        Self::Staging {
            index,
            source: Box::new(cause),
        }
    }

    /// Wrap a store error as a commit failure
    pub fn commit(cause: Error) -> Self {
        Self::Commit {
            source: Box::new(cause),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}
