//! Azure Blob Storage backend using the native SDK

use crate::block::Manifest;
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::store::BlockStore;
use crate::types::TargetObject;

use async_trait::async_trait;
use azure_storage::prelude::*;
use azure_storage_blobs::prelude::*;
use bytes::Bytes;

/// Azure Blob Storage backend
#[derive(Clone)]
pub struct AzureStore {
    service: BlobServiceClient,
}

impl AzureStore {
    /// Create a new Azure store from resolved credentials
    pub fn new(credentials: &Credentials) -> Self {
        let storage_creds = StorageCredentials::access_key(
            credentials.account.clone(),
            credentials.access_key.clone(),
        );
        let service = BlobServiceClient::new(credentials.account.clone(), storage_creds);
        Self { service }
    }

    /// Verify the container exists before any transfer starts
    pub async fn ensure_container(&self, container: &str) -> Result<()> {
        let container_client = self.service.container_client(container);

        if !container_client.exists().await.map_err(|e| Error::Azure {
            message: format!("Failed to check container existence: {}", e),
        })? {
            return Err(Error::Azure {
                message: format!("Container '{}' does not exist", container),
            });
        }

        Ok(())
    }

    fn blob_client(&self, target: &TargetObject) -> BlobClient {
        self.service
            .container_client(&target.container)
            .blob_client(&target.name)
    }
}

#[async_trait]
impl BlockStore for AzureStore {
    async fn create_placeholder(&self, target: &TargetObject) -> Result<()> {
        let blob_client = self.blob_client(target);

        blob_client
            .put_block_blob(Bytes::new())
            .await
            .map_err(|e| Error::Azure {
                message: format!("Failed to create blob placeholder: {}", e),
            })?;

        Ok(())
    }

    async fn stage_block(&self, target: &TargetObject, block_id: &str, data: Bytes) -> Result<()> {
        let blob_client = self.blob_client(target);

        blob_client
            .put_block(BlockId::new(block_id.to_owned()), data)
            .await
            .map_err(|e| Error::Azure {
                message: format!("Failed to put block: {}", e),
            })?;

        Ok(())
    }

    async fn commit_block_list(&self, target: &TargetObject, manifest: &Manifest) -> Result<()> {
        let blob_client = self.blob_client(target);

        let block_list = BlockList {
            blocks: manifest
                .refs()
                .iter()
                .map(|r| BlobBlockType::Latest(BlockId::new(r.id.clone())))
                .collect(),
        };

        blob_client
            .put_block_list(block_list)
            .await
            .map_err(|e| Error::Azure {
                message: format!("Failed to commit block list: {}", e),
            })?;

        Ok(())
    }
}
