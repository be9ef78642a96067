//! blobpush - Chunked block uploads to Azure Blob Storage
//!
//! This library segments local files into fixed-size blocks, stages each
//! block against a target blob under a deterministic identifier, and
//! commits the ordered block list so the object's content appears
//! atomically.

pub mod block;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod retry;
pub mod segment;
pub mod store;
pub mod transfer;
pub mod types;
pub mod uri;
pub mod walk;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
