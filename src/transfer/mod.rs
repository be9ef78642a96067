//! Upload engine and orchestration

pub mod upload;

use crate::config::Config;
use crate::error::Result;
use crate::retry::{with_retry, RetryConfig};
use crate::store::BlockStore;
use crate::types::{SourceFile, TargetObject, UploadStats};
use crate::uri::Destination;

/// The main upload engine
pub struct UploadEngine<S> {
    /// Configuration
    config: Config,
    /// Block store receiving the uploads
    store: S,
    /// Destination container and optional prefix
    destination: Destination,
}

impl<S: BlockStore> UploadEngine<S> {
    /// Create a new upload engine
    pub fn new(config: Config, store: S, destination: Destination) -> Self {
        Self {
            config,
            store,
            destination,
        }
    }

    /// Upload the scanned files one by one.
    ///
    /// Each file gets a fresh transfer; a failed file is retried from
    /// scratch up to the configured limit, then the error propagates and
    /// the run stops. Files already committed stay committed.
    pub async fn run(&self, files: &[SourceFile]) -> Result<UploadStats> {
        let start = std::time::Instant::now();
        let mut stats = UploadStats {
            files_scanned: files.len() as u64,
            ..Default::default()
        };

        let retry = RetryConfig::from(&self.config);

        for file in files {
            let target = TargetObject::new(
                &self.destination.container,
                self.destination.join(&file.name),
            );

            tracing::info!(
                path = %file.path.display(),
                object = %target,
                size = file.size,
                "Uploading"
            );

            let result = with_retry(&retry, || {
                upload::transfer_file(&self.store, &file.path, &target, self.config.block_size)
            })
            .await;

            match result {
                Ok(transfer) => {
                    stats.files_uploaded += 1;
                    stats.blocks_staged += transfer.blocks;
                    stats.bytes_transferred += transfer.bytes;
                }
                Err(e) => {
                    tracing::error!(path = %file.path.display(), error = %e, "Upload failed");
                    return Err(e);
                }
            }
        }

        stats.duration_secs = start.elapsed().as_secs_f64();
        Ok(stats)
    }
}
