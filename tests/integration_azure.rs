//! Azure Blob Storage integration tests
//!
//! These tests are marked with #[ignore] and require real Azure credentials.
//! They will NOT run with normal `cargo test`.
//!
//! To run these tests manually:
//!   export AZURE_STORAGE_ACCOUNT="youraccount"
//!   export AZURE_STORAGE_ACCESS_KEY="yourkey"
//!   cargo test --test integration_azure -- --ignored --nocapture
//!
//! Test container: blobpushtest (must already exist)

use blobpush::block::{block_id, BlockReference, Manifest};
use blobpush::config::{Config, Credentials};
use blobpush::store::{AzureStore, BlockStore};
use blobpush::transfer::UploadEngine;
use blobpush::types::TargetObject;
use blobpush::uri::Destination;
use blobpush::walk::walk_source;

use azure_storage::prelude::*;
use azure_storage_blobs::prelude::*;
use bytes::Bytes;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

const TEST_CONTAINER: &str = "blobpushtest";
const TEST_FILE_SIZE: usize = 9 * 1024 * 1024; // 9MB, spans 3 blocks at 4MB

/// Generate a random file of specified size
fn generate_random_file(path: &std::path::Path, size: usize) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    let mut rng_data = vec![0u8; 64 * 1024];

    // Simple PRNG for reproducible "random" data
    let mut seed: u64 = 0xDEADBEEF;
    let mut written = 0;

    while written < size {
        for byte in rng_data.iter_mut() {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            *byte = (seed >> 33) as u8;
        }

        let to_write = std::cmp::min(rng_data.len(), size - written);
        file.write_all(&rng_data[..to_write])?;
        written += to_write;
    }

    file.sync_all()?;
    Ok(())
}

/// Unique prefix per test run for isolation
fn test_prefix() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    let pid = std::process::id();

    format!("bptest-{}-{}-{}", timestamp, pid, counter)
}

fn credentials() -> Credentials {
    Credentials::resolve(None, None).expect("AZURE_STORAGE_ACCOUNT / AZURE_STORAGE_ACCESS_KEY not set")
}

/// Raw SDK client for verification reads and cleanup
fn service_client() -> BlobServiceClient {
    let creds = credentials();
    let storage_creds =
        StorageCredentials::access_key(creds.account.clone(), creds.access_key.clone());
    BlobServiceClient::new(creds.account, storage_creds)
}

#[tokio::test]
#[ignore]
async fn test_azure_upload_multi_block_file() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("large_file.bin");
    let prefix = test_prefix();

    println!("Generating 9MB test file...");
    generate_random_file(&test_file, TEST_FILE_SIZE).unwrap();
    let original = fs::read(&test_file).unwrap();

    let store = AzureStore::new(&credentials());
    store.ensure_container(TEST_CONTAINER).await.expect("container check failed");

    let destination = Destination::parse(&format!("az://{}/{}", TEST_CONTAINER, prefix)).unwrap();
    let files = walk_source(&test_file, &[]).await.unwrap();

    println!("Uploading to az://{}/{}...", TEST_CONTAINER, prefix);
    let engine = UploadEngine::new(Config::default(), store, destination);
    let stats = engine.run(&files).await.expect("upload failed");

    assert_eq!(stats.files_uploaded, 1);
    assert_eq!(stats.blocks_staged, 3);
    assert_eq!(stats.bytes_transferred, TEST_FILE_SIZE as u64);

    // Verify the committed content byte for byte
    println!("Downloading for verification...");
    let blob_name = format!("{}/large_file.bin", prefix);
    let blob_client = service_client()
        .container_client(TEST_CONTAINER)
        .blob_client(&blob_name);
    let downloaded = blob_client.get_content().await.expect("download failed");
    assert_eq!(downloaded.len(), original.len());
    assert_eq!(downloaded, original);

    // Cleanup
    println!("Cleaning up...");
    blob_client.delete().await.expect("cleanup failed");
    println!("Test passed!");
}

#[tokio::test]
#[ignore]
async fn test_azure_staged_blocks_invisible_until_commit() {
    let prefix = test_prefix();
    let blob_name = format!("{}/staged.bin", prefix);
    let target = TargetObject::new(TEST_CONTAINER, &blob_name);

    let store = AzureStore::new(&credentials());
    store.ensure_container(TEST_CONTAINER).await.expect("container check failed");

    // Placeholder plus two staged blocks, no commit yet
    store.create_placeholder(&target).await.expect("placeholder failed");
    store
        .stage_block(&target, &block_id(0), Bytes::from(vec![0xAA; 1024]))
        .await
        .expect("stage 0 failed");
    store
        .stage_block(&target, &block_id(1), Bytes::from(vec![0xBB; 1024]))
        .await
        .expect("stage 1 failed");

    let blob_client = service_client()
        .container_client(TEST_CONTAINER)
        .blob_client(&blob_name);

    // The readable content is still the empty placeholder
    let before = blob_client.get_content().await.expect("read failed");
    assert_eq!(before.len(), 0, "staged blocks must not be readable");

    // Commit and the full content appears at once
    let mut manifest = Manifest::new();
    manifest.push(BlockReference::latest(block_id(0)));
    manifest.push(BlockReference::latest(block_id(1)));
    store
        .commit_block_list(&target, &manifest)
        .await
        .expect("commit failed");

    let after = blob_client.get_content().await.expect("read failed");
    assert_eq!(after.len(), 2048);
    assert_eq!(&after[..1024], &[0xAA; 1024][..]);
    assert_eq!(&after[1024..], &[0xBB; 1024][..]);

    // Cleanup
    blob_client.delete().await.expect("cleanup failed");
    println!("Test passed!");
}

#[tokio::test]
#[ignore]
async fn test_azure_empty_file_upload() {
    let temp_dir = TempDir::new().unwrap();
    let test_file = temp_dir.path().join("empty.bin");
    fs::write(&test_file, b"").unwrap();
    let prefix = test_prefix();

    let store = AzureStore::new(&credentials());
    store.ensure_container(TEST_CONTAINER).await.expect("container check failed");

    let destination = Destination::parse(&format!("az://{}/{}", TEST_CONTAINER, prefix)).unwrap();
    let files = walk_source(&test_file, &[]).await.unwrap();

    let engine = UploadEngine::new(Config::default(), store, destination);
    let stats = engine.run(&files).await.expect("upload failed");
    assert_eq!(stats.blocks_staged, 0);

    let blob_name = format!("{}/empty.bin", prefix);
    let blob_client = service_client()
        .container_client(TEST_CONTAINER)
        .blob_client(&blob_name);
    let content = blob_client.get_content().await.expect("read failed");
    assert_eq!(content.len(), 0);

    // Cleanup
    blob_client.delete().await.expect("cleanup failed");
    println!("Test passed!");
}
