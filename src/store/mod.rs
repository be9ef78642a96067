//! Block store backends
//!
//! A block store exposes the three-step staged upload protocol: create a
//! placeholder object, stage blocks against it, then commit an ordered
//! block list to make the object's content visible atomically.

pub mod azure;
pub mod memory;

use crate::block::Manifest;
use crate::error::Result;
use crate::types::TargetObject;
use async_trait::async_trait;
use bytes::Bytes;

pub use azure::AzureStore;
pub use memory::MemoryStore;

/// Staged-upload operations against an object store.
///
/// Implementations do not retry internally; callers decide retry policy.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Create an empty placeholder for the target object.
    ///
    /// Until [`commit_block_list`](Self::commit_block_list) runs, the
    /// object's readable content is indeterminate: a fresh placeholder,
    /// a previous committed version, or nothing at all.
    async fn create_placeholder(&self, target: &TargetObject) -> Result<()>;

    /// Stage one block of data under the given identifier.
    ///
    /// Staging the same identifier again replaces the earlier bytes, which
    /// is what makes a from-scratch retry of a whole transfer safe.
    async fn stage_block(&self, target: &TargetObject, block_id: &str, data: Bytes) -> Result<()>;

    /// Commit the manifest's blocks, in order, as the object's content.
    async fn commit_block_list(&self, target: &TargetObject, manifest: &Manifest) -> Result<()>;
}
