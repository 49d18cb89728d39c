//! Bag of Cells
//!
//! Standard container for shipping a cell tree across the boundary.
//!
//! ## Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Magic: b5ee9c72 (4)                                             │
//! │ Flags (1): has_idx | has_crc32c | has_cache_bits | 00 | size:3  │
//! │ OffBytes (1)                                                    │
//! │ Cells (size) | Roots (size) | Absent (size) | TotSize (off)     │
//! │ RootList: Roots × size                                          │
//! │ [Index: Cells × off]                                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ Cell Data (TotSize)                                             │
//! │   [d1][d2][padded data][ref index (size)] ...                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ [CRC32C (4, little-endian)]                                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//! Cells are ordered parents-before-children, so every reference points to
//! a higher index.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bytes::{Buf, BufMut, BytesMut};
use crc::{Crc, CRC_32_ISCSI};

use crate::cell::{Cell, CellBuilder, MAX_REFS};
use crate::error::{Result, SbtError};

/// Magic prefix of a serialized bag of cells
pub const BOC_MAGIC: u32 = 0xb5ee_9c72;

const FLAG_HAS_IDX: u8 = 0x80;
const FLAG_HAS_CRC: u8 = 0x40;
const FLAG_HAS_CACHE_BITS: u8 = 0x20;
const SIZE_MASK: u8 = 0x07;

// =============================================================================
// Serialization
// =============================================================================

/// Serialize a single-root tree with a CRC32C trailer
pub fn serialize_boc(root: &Cell) -> Vec<u8> {
    let cells = topological_order(root);
    let index: HashMap<&[u8; 32], usize> = cells
        .iter()
        .enumerate()
        .map(|(i, c)| (c.hash(), i))
        .collect();

    let size_bytes = byte_len(cells.len() as u64);

    let mut body = BytesMut::new();
    for cell in &cells {
        body.put_slice(&cell.descriptors());
        body.put_slice(&cell.padded_data());
        for r in cell.refs() {
            body.put_uint(index[r.hash()] as u64, size_bytes);
        }
    }
    let off_bytes = byte_len(body.len() as u64);

    let mut out = BytesMut::with_capacity(body.len() + 32);
    out.put_u32(BOC_MAGIC);
    out.put_u8(FLAG_HAS_CRC | size_bytes as u8);
    out.put_u8(off_bytes as u8);
    out.put_uint(cells.len() as u64, size_bytes);
    out.put_uint(1, size_bytes); // roots
    out.put_uint(0, size_bytes); // absent
    out.put_uint(body.len() as u64, off_bytes);
    out.put_uint(0, size_bytes); // root index
    out.put_slice(&body);

    let crc = crc32c(&out);
    out.put_u32_le(crc);

    tracing::trace!(
        cells = cells.len(),
        bytes = out.len(),
        "Serialized bag of cells"
    );
    out.to_vec()
}

/// Unique cells in reverse post-order, root first
fn topological_order(root: &Cell) -> Vec<&Cell> {
    let mut seen: HashSet<&[u8; 32]> = HashSet::new();
    let mut post_order: Vec<&Cell> = Vec::new();
    let mut stack: Vec<(&Cell, bool)> = vec![(root, false)];

    while let Some((cell, expanded)) = stack.pop() {
        if expanded {
            post_order.push(cell);
            continue;
        }
        if !seen.insert(cell.hash()) {
            continue;
        }
        stack.push((cell, true));
        for r in cell.refs().iter().rev() {
            if !seen.contains(r.hash()) {
                stack.push((r.as_ref(), false));
            }
        }
    }

    post_order.reverse();
    post_order
}

/// Minimal number of bytes that can hold `value` (at least 1)
fn byte_len(value: u64) -> usize {
    let bits = (u64::BITS - value.leading_zeros()) as usize;
    bits.div_ceil(8).max(1)
}

// =============================================================================
// Deserialization
// =============================================================================

/// Parse a single-root bag of cells
pub fn deserialize_boc(bytes: &[u8]) -> Result<Cell> {
    let mut buf = bytes;

    need(&buf, 6, "header")?;
    let magic = buf.get_u32();
    if magic != BOC_MAGIC {
        return Err(SbtError::InvalidArgument(format!(
            "bad bag-of-cells magic 0x{:08x}",
            magic
        )));
    }

    let flags = buf.get_u8();
    let has_idx = flags & FLAG_HAS_IDX != 0;
    let has_crc = flags & FLAG_HAS_CRC != 0;
    if flags & FLAG_HAS_CACHE_BITS != 0 && !has_idx {
        return Err(SbtError::InvalidArgument(
            "cache bits require an index".to_string(),
        ));
    }
    let size_bytes = (flags & SIZE_MASK) as usize;
    if !(1..=4).contains(&size_bytes) {
        return Err(SbtError::InvalidArgument(format!(
            "reference size {} out of range",
            size_bytes
        )));
    }
    let off_bytes = buf.get_u8() as usize;
    if !(1..=8).contains(&off_bytes) {
        return Err(SbtError::InvalidArgument(format!(
            "offset size {} out of range",
            off_bytes
        )));
    }

    if has_crc {
        if buf.len() < 4 {
            return Err(SbtError::InvalidArgument("missing CRC32C".to_string()));
        }
        let (payload, trailer) = bytes.split_at(bytes.len() - 4);
        let expected = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
        let actual = crc32c(payload);
        if actual != expected {
            return Err(SbtError::InvalidArgument(format!(
                "CRC32C mismatch: expected 0x{:08x}, got 0x{:08x}",
                expected, actual
            )));
        }
        buf = &buf[..buf.len() - 4];
    }

    need(&buf, 3 * size_bytes + off_bytes, "counts")?;
    let cell_count = buf.get_uint(size_bytes) as usize;
    let root_count = buf.get_uint(size_bytes) as usize;
    let absent = buf.get_uint(size_bytes);
    let total_size = buf.get_uint(off_bytes) as usize;

    if root_count != 1 {
        return Err(SbtError::InvalidArgument(format!(
            "expected exactly one root, found {}",
            root_count
        )));
    }
    if absent != 0 {
        return Err(SbtError::InvalidArgument(
            "absent cells are not supported".to_string(),
        ));
    }

    need(&buf, size_bytes, "root list")?;
    let root_index = buf.get_uint(size_bytes) as usize;
    if root_index >= cell_count {
        return Err(SbtError::InvalidArgument(format!(
            "root index {} out of {} cells",
            root_index, cell_count
        )));
    }

    if has_idx {
        need(&buf, cell_count * off_bytes, "index")?;
        buf.advance(cell_count * off_bytes);
    }

    need(&buf, total_size, "cell data")?;
    let mut data = &buf[..total_size];
    if buf.len() != total_size {
        return Err(SbtError::InvalidArgument(format!(
            "{} trailing bytes after cell data",
            buf.len() - total_size
        )));
    }

    // every cell takes at least its two descriptor bytes
    if cell_count * 2 > total_size {
        return Err(SbtError::InvalidArgument(format!(
            "{} cells cannot fit in {} bytes",
            cell_count, total_size
        )));
    }

    let mut raw_cells = Vec::with_capacity(cell_count);
    for i in 0..cell_count {
        raw_cells.push(read_raw_cell(&mut data, i, cell_count, size_bytes)?);
    }
    if !data.is_empty() {
        return Err(SbtError::InvalidArgument(format!(
            "{} unused bytes in cell data",
            data.len()
        )));
    }

    let mut built: Vec<Option<Arc<Cell>>> = vec![None; cell_count];
    for (i, raw) in raw_cells.into_iter().enumerate().rev() {
        let mut builder = CellBuilder::new();
        builder.store_bits(&raw.data, raw.bit_len)?;
        for r in raw.refs {
            let child = built[r].clone().ok_or_else(|| {
                SbtError::InvalidArgument(format!("cell {} references unbuilt cell {}", i, r))
            })?;
            builder.store_ref(child)?;
        }
        built[i] = Some(Arc::new(builder.build()));
    }

    let root = built[root_index]
        .take()
        .ok_or_else(|| SbtError::InvalidArgument("root cell missing".to_string()))?;
    Ok(Arc::unwrap_or_clone(root))
}

struct RawCell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<usize>,
}

fn read_raw_cell(buf: &mut &[u8], index: usize, cell_count: usize, size_bytes: usize) -> Result<RawCell> {
    need(buf, 2, "cell descriptors")?;
    let d1 = buf.get_u8();
    let d2 = buf.get_u8();

    if d1 & 0x08 != 0 {
        return Err(SbtError::InvalidArgument(format!(
            "cell {} is exotic; only ordinary cells are supported",
            index
        )));
    }
    if d1 >> 5 != 0 {
        return Err(SbtError::InvalidArgument(format!(
            "cell {} has a non-zero level",
            index
        )));
    }
    let ref_count = (d1 & 0x07) as usize;
    if ref_count > MAX_REFS {
        return Err(SbtError::InvalidArgument(format!(
            "cell {} declares {} references",
            index, ref_count
        )));
    }

    let data_len = (d2 as usize).div_ceil(2);
    need(buf, data_len + ref_count * size_bytes, "cell body")?;
    let mut data = buf[..data_len].to_vec();
    buf.advance(data_len);

    let bit_len = if d2 % 2 == 0 {
        data_len * 8
    } else {
        // strip the completion tag
        let last = data.last_mut().ok_or_else(|| {
            SbtError::InvalidArgument(format!("cell {} has an empty padded byte", index))
        })?;
        if *last == 0 {
            return Err(SbtError::InvalidArgument(format!(
                "cell {} is missing its completion tag",
                index
            )));
        }
        let tag_pos = last.trailing_zeros() as usize;
        *last &= !(1u8 << tag_pos);
        data_len * 8 - tag_pos - 1
    };

    let mut refs = Vec::with_capacity(ref_count);
    for _ in 0..ref_count {
        let r = buf.get_uint(size_bytes) as usize;
        if r <= index || r >= cell_count {
            return Err(SbtError::InvalidArgument(format!(
                "cell {} has invalid reference {}",
                index, r
            )));
        }
        refs.push(r);
    }

    Ok(RawCell { data, bit_len, refs })
}

fn need(buf: &[u8], count: usize, what: &str) -> Result<()> {
    if buf.len() < count {
        return Err(SbtError::InvalidArgument(format!(
            "truncated bag of cells: {} needs {} bytes, {} left",
            what,
            count,
            buf.len()
        )));
    }
    Ok(())
}

// =============================================================================
// Checksums & Hex
// =============================================================================

/// CRC-32C (Castagnoli) as used by the bag-of-cells trailer
const CASTAGNOLI: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

fn crc32c(bytes: &[u8]) -> u32 {
    CASTAGNOLI.checksum(bytes)
}

/// Hex dump of a serialized tree
pub fn to_hex(root: &Cell) -> String {
    hex::encode(serialize_boc(root))
}

/// Parse a hex-encoded bag of cells
pub fn from_hex(text: &str) -> Result<Cell> {
    let bytes = hex::decode(text.trim())
        .map_err(|e| SbtError::InvalidArgument(format!("invalid hex: {}", e)))?;
    deserialize_boc(&bytes)
}
