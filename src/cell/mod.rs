//! Cell Module
//!
//! The cell is the unit of serialization: a bounded bit string plus a
//! bounded list of references to other cells.
//!
//! ## Layout
//! ```text
//! ┌──────────────────────────────────────┬───────────────────────────┐
//! │ Data: up to 1023 bits (MSB first)    │ Refs: up to 4 × ^Cell     │
//! └──────────────────────────────────────┴───────────────────────────┘
//! ```
//!
//! ## Representation Hash
//! ```text
//! sha256( d1 | d2 | padded data | depth(ref_i) as u16 BE ... | hash(ref_i) ... )
//!   d1 = ref count, d2 = floor(bits/8) + ceil(bits/8)
//! ```

mod builder;
mod slice;
mod uint;

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

pub use builder::CellBuilder;
pub use slice::CellSlice;
pub use uint::U256;

// =============================================================================
// Capacity Constants
// =============================================================================

/// Maximum number of data bits in one cell
pub const MAX_BITS: usize = 1023;

/// Maximum number of references in one cell
pub const MAX_REFS: usize = 4;

/// Maximum depth of a cell tree
pub const MAX_DEPTH: u16 = 1024;

// =============================================================================
// Cell
// =============================================================================

/// An immutable, finalized cell
#[derive(Clone)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
    hash: [u8; 32],
    depth: u16,
}

impl Cell {
    /// Assemble a cell from already validated parts.
    ///
    /// Only the builder calls this; it has enforced the capacity limits.
    pub(crate) fn from_parts(mut data: Vec<u8>, bit_len: usize, refs: Vec<Arc<Cell>>) -> Self {
        data.truncate(bit_len.div_ceil(8));
        let depth = refs.iter().map(|r| r.depth + 1).max().unwrap_or(0);
        let hash = representation_hash(&data, bit_len, &refs);
        Self {
            data,
            bit_len,
            refs,
            hash,
            depth,
        }
    }

    /// A cell with no bits and no references
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), 0, Vec::new())
    }

    /// Packed data bytes; the last byte is zero-filled past `bit_len`
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of data bits stored
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Child cells in reference order
    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    /// Child at `index`, if present
    pub fn reference(&self, index: usize) -> Option<&Arc<Cell>> {
        self.refs.get(index)
    }

    /// Representation hash
    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Longest reference path below this cell; zero for a leaf
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// True when the cell holds neither bits nor references
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0 && self.refs.is_empty()
    }

    /// Start reading this cell from the beginning
    pub fn parse(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    /// The two descriptor bytes used by both hashing and bag-of-cells
    pub(crate) fn descriptors(&self) -> [u8; 2] {
        descriptors(self.bit_len, self.refs.len())
    }

    /// Data bytes with the completion tag applied when not byte-aligned
    pub(crate) fn padded_data(&self) -> Vec<u8> {
        padded_data(&self.data, self.bit_len)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Cell {}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("bits", &self.bit_len)
            .field("data", &hex::encode(&self.data))
            .field("refs", &self.refs)
            .finish()
    }
}

// =============================================================================
// Hashing Helpers
// =============================================================================

fn descriptors(bit_len: usize, ref_count: usize) -> [u8; 2] {
    let d1 = ref_count as u8;
    let d2 = (bit_len / 8 + bit_len.div_ceil(8)) as u8;
    [d1, d2]
}

fn padded_data(data: &[u8], bit_len: usize) -> Vec<u8> {
    let mut out = data[..bit_len.div_ceil(8)].to_vec();
    let rem = bit_len % 8;
    if rem != 0 {
        if let Some(last) = out.last_mut() {
            *last |= 0x80 >> rem;
        }
    }
    out
}

fn representation_hash(data: &[u8], bit_len: usize, refs: &[Arc<Cell>]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(descriptors(bit_len, refs.len()));
    hasher.update(padded_data(data, bit_len));
    for r in refs {
        hasher.update(r.depth.to_be_bytes());
    }
    for r in refs {
        hasher.update(r.hash);
    }
    hasher.finalize().into()
}
