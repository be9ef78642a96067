//! Staged block upload of a single source file
//!
//! A transfer is three steps against the store: create a placeholder
//! object, stage every chunk under its derived block identifier, then
//! commit the ordered block list. Content becomes visible only at the
//! commit; a failure anywhere leaves the object without this transfer's
//! content and the caller decides whether to retry from scratch.

use crate::block::{block_id, BlockReference, Manifest, MAX_BLOCK_COUNT};
use crate::error::{Error, Result};
use crate::segment::Segmenter;
use crate::store::BlockStore;
use crate::types::{FileTransfer, TargetObject};

use std::path::Path;
use tokio::io::AsyncRead;

/// Stage every chunk of the source and build the commit manifest.
///
/// Identifiers derive from chunk indexes alone, so re-running this for the
/// same source re-stages the same identifiers. Stops at the first failure;
/// blocks staged before the failure stay uncommitted on the service side.
pub async fn stage_all<S, R>(
    store: &S,
    target: &TargetObject,
    segmenter: &mut Segmenter<R>,
) -> Result<Manifest>
where
    S: BlockStore + ?Sized,
    R: AsyncRead + Unpin + Send,
{
    let mut manifest = Manifest::new();

    while let Some(chunk) = segmenter.next_chunk().await? {
        if chunk.index >= MAX_BLOCK_COUNT {
            return Err(Error::config(format!(
                "source requires more than {} blocks; increase the block size",
                MAX_BLOCK_COUNT
            )));
        }

        let id = block_id(chunk.index);
        tracing::trace!(object = %target, index = chunk.index, bytes = chunk.len(), "Staging block");

        let index = chunk.index;
        store
            .stage_block(target, &id, chunk.payload)
            .await
            .map_err(|e| Error::staging(index, e))?;

        manifest.push(BlockReference::latest(id));
    }

    Ok(manifest)
}

/// Commit the manifest, making the staged blocks the object's content.
///
/// The manifest is consumed; a new transfer derives a new one.
pub async fn commit<S>(store: &S, target: &TargetObject, manifest: Manifest) -> Result<()>
where
    S: BlockStore + ?Sized,
{
    tracing::debug!(object = %target, blocks = manifest.len(), "Committing block list");
    store
        .commit_block_list(target, &manifest)
        .await
        .map_err(Error::commit)
}

/// Upload one file as a block blob.
///
/// The source handle is opened here and lives only for the duration of
/// the transfer. An empty file commits an empty block list and yields an
/// empty object.
pub async fn transfer_file<S>(
    store: &S,
    path: &Path,
    target: &TargetObject,
    block_size: usize,
) -> Result<FileTransfer>
where
    S: BlockStore + ?Sized,
{
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| Error::io(format!("opening {}", path.display()), e))?;
    let mut segmenter = Segmenter::new(file, block_size);

    store.create_placeholder(target).await?;
    let manifest = stage_all(store, target, &mut segmenter).await?;
    let blocks = manifest.len() as u64;
    commit(store, target, manifest).await?;

    Ok(FileTransfer {
        bytes: segmenter.bytes_read(),
        blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Store wrapper that fails the nth stage_block call
    struct FailStage {
        inner: MemoryStore,
        fail_at: u64,
        calls: AtomicU64,
    }

    #[async_trait]
    impl BlockStore for FailStage {
        async fn create_placeholder(&self, target: &TargetObject) -> Result<()> {
            self.inner.create_placeholder(target).await
        }

        async fn stage_block(
            &self,
            target: &TargetObject,
            block_id: &str,
            data: Bytes,
        ) -> Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == self.fail_at {
                return Err(Error::Azure {
                    message: "simulated stage failure (503)".to_string(),
                });
            }
            self.inner.stage_block(target, block_id, data).await
        }

        async fn commit_block_list(&self, target: &TargetObject, manifest: &Manifest) -> Result<()> {
            self.inner.commit_block_list(target, manifest).await
        }
    }

    /// Store wrapper that fails the first n commit attempts
    struct FailCommit {
        inner: MemoryStore,
        remaining: Arc<AtomicU64>,
    }

    #[async_trait]
    impl BlockStore for FailCommit {
        async fn create_placeholder(&self, target: &TargetObject) -> Result<()> {
            self.inner.create_placeholder(target).await
        }

        async fn stage_block(
            &self,
            target: &TargetObject,
            block_id: &str,
            data: Bytes,
        ) -> Result<()> {
            self.inner.stage_block(target, block_id, data).await
        }

        async fn commit_block_list(&self, target: &TargetObject, manifest: &Manifest) -> Result<()> {
            if self.remaining.load(Ordering::SeqCst) > 0 {
                self.remaining.fetch_sub(1, Ordering::SeqCst);
                return Err(Error::Azure {
                    message: "simulated commit failure (503)".to_string(),
                });
            }
            self.inner.commit_block_list(target, manifest).await
        }
    }

    fn target() -> TargetObject {
        TargetObject::new("uploads", "data.bin")
    }

    fn patterned(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn test_stage_all_orders_manifest_by_index() {
        let store = MemoryStore::new();
        let target = target();
        store.create_placeholder(&target).await.unwrap();

        let mut segmenter = Segmenter::new(Cursor::new(b"ABCDEFGHIJ".to_vec()), 4);
        let manifest = stage_all(&store, &target, &mut segmenter).await.unwrap();

        assert_eq!(manifest.len(), 3);
        let ids: Vec<&str> = manifest.refs().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids[0], block_id(0));
        assert_eq!(ids[1], block_id(1));
        assert_eq!(ids[2], block_id(2));
    }

    #[tokio::test]
    async fn test_transfer_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        let content = patterned(10_007);
        std::fs::write(&path, &content).unwrap();

        let store = MemoryStore::new();
        let target = target();
        let transfer = transfer_file(&store, &path, &target, 4096).await.unwrap();

        assert_eq!(transfer.bytes, 10_007);
        assert_eq!(transfer.blocks, 3);
        assert_eq!(store.committed(&target).await.unwrap(), Bytes::from(content));
        assert_eq!(store.staged_count(&target).await, 0);
    }

    #[tokio::test]
    async fn test_empty_file_commits_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();

        let store = MemoryStore::new();
        let target = target();
        let transfer = transfer_file(&store, &path, &target, 4096).await.unwrap();

        assert_eq!(transfer.bytes, 0);
        assert_eq!(transfer.blocks, 0);
        assert_eq!(store.committed(&target).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_staging_failure_stops_before_later_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        std::fs::write(&path, patterned(3 * 1024)).unwrap();

        let store = FailStage {
            inner: MemoryStore::new(),
            fail_at: 1,
            calls: AtomicU64::new(0),
        };
        let target = target();
        let err = transfer_file(&store, &path, &target, 1024).await.unwrap_err();

        match err {
            Error::Staging { index, .. } => assert_eq!(index, 1),
            other => panic!("expected staging error, got {:?}", other),
        }
        // Block 0 staged, block 2 never attempted, nothing committed
        assert_eq!(store.inner.staged_count(&target).await, 1);
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.inner.committed(&target).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_commit_failure_then_whole_file_retry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        let content = patterned(2_500);
        std::fs::write(&path, &content).unwrap();

        let store = FailCommit {
            inner: MemoryStore::new(),
            remaining: Arc::new(AtomicU64::new(1)),
        };
        let target = target();

        let err = transfer_file(&store, &path, &target, 1024).await.unwrap_err();
        assert!(matches!(err, Error::Commit { .. }));
        // Staged but uncommitted: the object content is not the source
        assert_eq!(store.inner.staged_count(&target).await, 3);
        assert_eq!(store.inner.committed(&target).await.unwrap().len(), 0);

        // A from-scratch retry re-derives the same identifiers and succeeds
        let transfer = transfer_file(&store, &path, &target, 1024).await.unwrap();
        assert_eq!(transfer.blocks, 3);
        assert_eq!(store.inner.committed(&target).await.unwrap(), Bytes::from(content));
    }

    #[tokio::test]
    async fn test_block_count_ceiling() {
        let store = MemoryStore::new();
        let target = target();
        store.create_placeholder(&target).await.unwrap();

        let source = vec![0u8; (MAX_BLOCK_COUNT + 1) as usize];
        let mut segmenter = Segmenter::new(Cursor::new(source), 1);
        let err = stage_all(&store, &target, &mut segmenter).await.unwrap_err();

        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("increase the block size"));
    }
}
