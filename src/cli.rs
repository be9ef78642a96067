//! CLI argument parsing for blobpush

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// blobpush - Chunked block uploads to Azure Blob Storage
#[derive(Parser, Debug)]
#[command(name = "blobpush")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a file or directory to a container
    Upload(UploadArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Arguments for the upload command
#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// Source file or directory
    pub source: PathBuf,

    /// Destination container or URI (az://container[/prefix])
    pub destination: String,

    /// Storage account name (falls back to AZURE_STORAGE_ACCOUNT)
    #[arg(long)]
    pub account: Option<String>,

    /// Storage access key (falls back to AZURE_STORAGE_ACCESS_KEY)
    #[arg(long)]
    pub access_key: Option<String>,

    /// Block size in KB [default: 4096]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub block_size: Option<u64>,

    /// Exclude pattern (can be specified multiple times)
    #[arg(long = "exclude", action = clap::ArgAction::Append)]
    pub exclude: Vec<String>,

    /// List what would be uploaded with no changes made
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Whole-file retries for failed transfers
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Configuration file path
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

impl UploadArgs {
    /// Convert CLI args to Config, merging with file config
    pub fn to_config(&self) -> crate::error::Result<crate::config::Config> {
        let mut config = if let Some(ref path) = self.config {
            crate::config::Config::load_from(path)?
        } else {
            crate::config::Config::load()?
        };

        // CLI args override config file
        config.dry_run = self.dry_run;

        if let Some(kb) = self.block_size {
            config.block_size = crate::config::Config::clamp_block_size(kb as usize * 1024);
        }
        if let Some(retries) = self.max_retries {
            config.max_retries = retries;
        }
        if !self.exclude.is_empty() {
            config.exclude = self.exclude.clone();
        }

        Ok(config)
    }
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show the configuration file path
    #[arg(long)]
    pub path: bool,

    /// Create default configuration file
    #[arg(long)]
    pub init: bool,
}
