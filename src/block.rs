//! Block identifiers and the ordered block manifest
//!
//! Azure block blobs are assembled from independently staged blocks, each
//! addressed by an opaque base64 identifier of bounded length. The final
//! object is defined by the ordered list of identifiers sent at commit
//! time, not by upload order on the wire.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Decimal width of the sequence number inside a block identifier.
///
/// Wide enough that no realistic block count wraps: Azure caps a blob at
/// [`MAX_BLOCK_COUNT`] committed blocks, far below 10^11.
pub const BLOCK_ID_WIDTH: usize = 11;

/// Maximum committed blocks per blob accepted by the service.
pub const MAX_BLOCK_COUNT: u64 = 50_000;

/// Derive the block identifier for the chunk at `index`.
///
/// The identifier is the standard base64 encoding of the zero-padded
/// decimal sequence number. It is a pure function of the index: retrying
/// a chunk re-derives the identical identifier, so a from-scratch retry
/// overwrites previously staged blocks instead of orphaning them. Decoding
/// an identifier recovers the human-readable sequence number, which keeps
/// uncommitted-block listings debuggable.
pub fn block_id(index: u64) -> String {
    BASE64.encode(format!("{:0width$}", index, width = BLOCK_ID_WIDTH))
}

/// Status marker for a block reference in the commit list.
///
/// Only `Latest` is ever produced here: every reference points at the most
/// recently staged version of its identifier. Referencing previously
/// committed blocks is a service capability this tool does not use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// The most recently staged version of the identifier
    Latest,
}

/// A staged block as it will appear in the commit list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockReference {
    /// Base64 block identifier
    pub id: String,

    /// Which version of the identifier the commit should pick up
    pub status: BlockStatus,
}

impl BlockReference {
    /// Reference the latest staged version of `id`
    pub fn latest(id: String) -> Self {
        Self {
            id,
            status: BlockStatus::Latest,
        }
    }
}

/// Ordered list of block references defining the committed object.
///
/// Insertion order is upload order is the byte order of the final object.
/// Built incrementally while staging and consumed exactly once by commit.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    refs: Vec<BlockReference>,
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a reference; order of calls defines final byte order
    pub fn push(&mut self, reference: BlockReference) {
        self.refs.push(reference);
    }

    /// Number of blocks in the manifest
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// True when no blocks have been staged (zero-length source)
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// The references in commit order
    pub fn refs(&self) -> &[BlockReference] {
        &self.refs
    }
}
