//! Fixed-size segmentation of a source byte stream
//!
//! A [`Segmenter`] turns any async reader into a lazy, forward-only
//! sequence of block-sized chunks. Concatenating the chunk payloads in
//! sequence order reproduces the stream byte-for-byte. Only one chunk is
//! buffered at a time, so memory use is bounded by the block size no
//! matter how large the source file is.

use crate::config::Config;
use crate::error::{Error, Result};
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

/// A contiguous byte range of the source stream
#[derive(Debug, Clone)]
pub struct Chunk {
    /// 0-based position in the stream; monotonically increasing
    pub index: u64,

    /// Raw bytes; full block size except possibly for the final chunk
    pub payload: Bytes,
}

impl Chunk {
    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// True for a zero-length payload (never produced by the segmenter)
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Splits a readable stream into fixed-size chunks, lazily and exactly once.
///
/// The sequence is not restartable: it consumes the reader from its current
/// position. An empty stream yields no chunks at all, and a stream whose
/// length is an exact multiple of the block size yields no trailing empty
/// chunk. An out-of-range block size (zero, or above the service per-block
/// cap) is clamped to [`crate::config::MAX_BLOCK_SIZE`] rather than used
/// as-is.
pub struct Segmenter<R> {
    reader: R,
    block_size: usize,
    next_index: u64,
    bytes_read: u64,
    finished: bool,
}

impl<R: AsyncRead + Unpin> Segmenter<R> {
    /// Create a segmenter over `reader` producing blocks of `block_size` bytes
    pub fn new(reader: R, block_size: usize) -> Self {
        Self {
            reader,
            block_size: Config::clamp_block_size(block_size),
            next_index: 0,
            bytes_read: 0,
            finished: false,
        }
    }

    /// Effective block size after clamping
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Total bytes handed out so far
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Number of chunks produced so far
    pub fn chunks_yielded(&self) -> u64 {
        self.next_index
    }

    /// Read the next chunk, or `None` once the stream is exhausted.
    ///
    /// Short reads from the underlying reader are looped over until the
    /// block is full or the stream ends; a chunk is never yielded short of
    /// the block size except at end of stream. Read errors propagate
    /// immediately and poison the sequence - no partial chunk is yielded
    /// for a failed read.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.finished {
            return Ok(None);
        }

        let mut buf = vec![0u8; self.block_size];
        let mut filled = 0;

        while filled < self.block_size {
            let n = self
                .reader
                .read(&mut buf[filled..])
                .await
                .map_err(|e| Error::io("reading source stream", e))?;
            if n == 0 {
                self.finished = true;
                break;
            }
            filled += n;
        }

        if filled == 0 {
            return Ok(None);
        }

        buf.truncate(filled);
        let chunk = Chunk {
            index: self.next_index,
            payload: Bytes::from(buf),
        };
        self.next_index += 1;
        self.bytes_read += filled as u64;
        Ok(Some(chunk))
    }
}
