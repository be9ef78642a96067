//! In-memory block store mirroring the service's staging semantics
//!
//! Used by the test suites to verify transfer behavior without network
//! access. It enforces the rules that matter for correctness: blocks can
//! only be staged against an existing object, identifiers must be valid
//! base64 of uniform length, re-staging an identifier overwrites it, and
//! content becomes readable only when a block list commits.

use crate::block::Manifest;
use crate::error::{Error, Result};
use crate::store::BlockStore;
use crate::types::TargetObject;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Longest permitted decoded block identifier, per the service contract
const MAX_DECODED_ID_LEN: usize = 64;

#[derive(Debug, Default)]
struct ObjectState {
    staged: HashMap<String, Bytes>,
    committed: Option<Bytes>,
}

/// In-memory [`BlockStore`] implementation
#[derive(Clone, Default)]
pub struct MemoryStore {
    objects: Arc<Mutex<HashMap<String, ObjectState>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(target: &TargetObject) -> String {
        format!("{}/{}", target.container, target.name)
    }

    /// Committed content of an object, if a block list has been committed
    pub async fn committed(&self, target: &TargetObject) -> Option<Bytes> {
        let objects = self.objects.lock().await;
        objects
            .get(&Self::key(target))
            .and_then(|state| state.committed.clone())
    }

    /// Whether the object exists at all (placeholder or committed)
    pub async fn exists(&self, target: &TargetObject) -> bool {
        let objects = self.objects.lock().await;
        objects.contains_key(&Self::key(target))
    }

    /// Number of blocks currently staged against an object
    pub async fn staged_count(&self, target: &TargetObject) -> usize {
        let objects = self.objects.lock().await;
        objects
            .get(&Self::key(target))
            .map(|state| state.staged.len())
            .unwrap_or(0)
    }

    fn validate_block_id(state: &ObjectState, block_id: &str) -> Result<()> {
        let decoded = BASE64.decode(block_id).map_err(|_| {
            Error::storage(format!("block id '{}' is not valid base64", block_id))
        })?;
        if decoded.is_empty() || decoded.len() > MAX_DECODED_ID_LEN {
            return Err(Error::storage(format!(
                "block id decodes to {} bytes, must be 1..={}",
                decoded.len(),
                MAX_DECODED_ID_LEN
            )));
        }
        // The service requires every block id on one object to be the same length
        if let Some(existing) = state.staged.keys().next() {
            if existing.len() != block_id.len() {
                return Err(Error::storage(format!(
                    "block id '{}' differs in length from previously staged ids",
                    block_id
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BlockStore for MemoryStore {
    async fn create_placeholder(&self, target: &TargetObject) -> Result<()> {
        let mut objects = self.objects.lock().await;
        let state = objects.entry(Self::key(target)).or_default();
        // A fresh placeholder discards staged blocks from earlier attempts
        state.staged.clear();
        state.committed = Some(Bytes::new());
        Ok(())
    }

    async fn stage_block(&self, target: &TargetObject, block_id: &str, data: Bytes) -> Result<()> {
        let mut objects = self.objects.lock().await;
        let state = objects.get_mut(&Self::key(target)).ok_or_else(|| {
            Error::storage(format!("object '{}' does not exist", target))
        })?;

        Self::validate_block_id(state, block_id)?;
        state.staged.insert(block_id.to_owned(), data);
        Ok(())
    }

    async fn commit_block_list(&self, target: &TargetObject, manifest: &Manifest) -> Result<()> {
        let mut objects = self.objects.lock().await;
        let state = objects.get_mut(&Self::key(target)).ok_or_else(|| {
            Error::storage(format!("object '{}' does not exist", target))
        })?;

        let mut content = Vec::new();
        for block_ref in manifest.refs() {
            let data = state.staged.get(&block_ref.id).ok_or_else(|| {
                Error::storage(format!(
                    "block id '{}' was never staged against '{}'",
                    block_ref.id, target
                ))
            })?;
            content.extend_from_slice(data);
        }

        state.committed = Some(Bytes::from(content));
        // Commit consumes the staging area, matching service garbage collection
        state.staged.clear();
        Ok(())
    }
}
