//! Configuration management for blobpush

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Default block size (4MB - what the classic SDKs send per block)
pub const DEFAULT_BLOCK_SIZE: usize = 4 * 1024 * 1024;

/// Maximum permitted block size (100MB, the service per-block cap for the
/// API versions the SDK speaks)
pub const MAX_BLOCK_SIZE: usize = 100 * 1024 * 1024;

/// Default number of whole-file retries after a failed transfer
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Environment variable carrying the storage account name
pub const ENV_STORAGE_ACCOUNT: &str = "AZURE_STORAGE_ACCOUNT";

/// Environment variable carrying the storage access key
pub const ENV_STORAGE_ACCESS_KEY: &str = "AZURE_STORAGE_ACCESS_KEY";

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Block size in bytes for staged uploads
    pub block_size: usize,

    /// Exclude patterns (gitignore syntax) applied during the source walk
    pub exclude: Vec<String>,

    /// Maximum whole-file retries for failed transfers (0 = fail immediately)
    pub max_retries: u32,

    /// Retry delay base in milliseconds
    pub retry_delay_ms: u64,

    /// List what would be uploaded without touching the store
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            exclude: Vec::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: 1000,
            dry_run: false,
        }
    }
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io("reading config", e))?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io("creating config dir", e))?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("serializing config: {}", e)))?;
        std::fs::write(path, contents).map_err(|e| Error::io("writing config", e))?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("blobpush").join("config.toml"))
            .ok_or_else(|| Error::config("could not determine config directory"))
    }

    /// Clamp a block size to the service limits.
    ///
    /// Zero (the unset/invalid marker) and anything above the per-block cap
    /// both become [`MAX_BLOCK_SIZE`]; an oversized block would be rejected
    /// by the store, so it is never passed through as-is. Any other
    /// positive size is accepted unchanged.
    pub fn clamp_block_size(bytes: usize) -> usize {
        if bytes == 0 || bytes > MAX_BLOCK_SIZE {
            MAX_BLOCK_SIZE
        } else {
            bytes
        }
    }
}

/// Storage account credentials, resolved once at the CLI boundary and
/// threaded through explicitly - never read from the environment mid-transfer.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Storage account name
    pub account: String,

    /// Shared access key for the account
    pub access_key: String,
}

impl Credentials {
    /// Resolve credentials from explicit flags, falling back to the
    /// conventional environment variables.
    pub fn resolve(account: Option<String>, access_key: Option<String>) -> Result<Self> {
        let account = account
            .or_else(|| env::var(ENV_STORAGE_ACCOUNT).ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "storage account not set (use --account or {})",
                    ENV_STORAGE_ACCOUNT
                ))
            })?;
        let access_key = access_key
            .or_else(|| env::var(ENV_STORAGE_ACCESS_KEY).ok())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "storage access key not set (use --access-key or {})",
                    ENV_STORAGE_ACCESS_KEY
                ))
            })?;

        Ok(Self {
            account,
            access_key,
        })
    }
}
