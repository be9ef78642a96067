//! Core domain types for blobpush

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A remote object: container plus object name within it.
///
/// Created as an empty placeholder before any block is staged; only after
/// a successful commit does it become readable with real content. Between
/// placeholder creation and commit the object is in an indeterminate state
/// and must not be treated as valid by readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetObject {
    /// Container holding the object
    pub container: String,

    /// Full object name (prefix already applied)
    pub name: String,
}

impl TargetObject {
    /// Create a target from container and object name
    pub fn new(container: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for TargetObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.container, self.name)
    }
}

/// A local file selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path used to open the file
    pub path: PathBuf,

    /// Target-relative name (forward slashes), appended to the prefix
    pub name: String,

    /// Size in bytes at scan time
    pub size: u64,
}

/// Per-file transfer outcome
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransfer {
    /// Bytes read from the source and staged
    pub bytes: u64,

    /// Blocks committed for this object
    pub blocks: u64,
}

/// Statistics for an upload run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadStats {
    /// Files found by the source walk
    pub files_scanned: u64,

    /// Files fully committed
    pub files_uploaded: u64,

    /// Blocks staged across all committed files
    pub blocks_staged: u64,

    /// Total bytes transferred
    pub bytes_transferred: u64,

    /// Duration in seconds
    pub duration_secs: f64,
}

impl UploadStats {
    /// Transfer rate in bytes per second
    pub fn transfer_rate(&self) -> f64 {
        if self.duration_secs == 0.0 {
            0.0
        } else {
            self.bytes_transferred as f64 / self.duration_secs
        }
    }
}
