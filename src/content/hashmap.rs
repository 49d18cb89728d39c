//! Patricia-tree dictionaries with `^Cell` values
//!
//! ```text
//! hm_edge#_ label:(HmLabel ~l n) node:(HashmapNode m X) = Hashmap n X
//! hmn_leaf#_ value:X                        = HashmapNode 0 X
//! hmn_fork#_ left:^Hashmap right:^Hashmap   = HashmapNode (n + 1) X
//!
//! hml_short$0  len:(Unary ~n) s:(n * Bit)
//! hml_long$10  n:(#<= m) s:(n * Bit)
//! hml_same$11  v:Bit n:(#<= m)
//! ```
//! The encoder picks the shortest label form; ties go to short, then long.

use std::sync::Arc;

use crate::cell::{Cell, CellBuilder, CellSlice};
use crate::error::{Result, SbtError};

/// Key as a sequence of bits, most significant first
pub type BitKey = Vec<bool>;

/// Bits needed to store any value in `0..=max`
fn len_width(max: usize) -> usize {
    (usize::BITS - max.leading_zeros()) as usize
}

// =============================================================================
// Building
// =============================================================================

/// Build the root edge of a dictionary, or `None` when there are no entries.
///
/// Entries must be sorted by key, unique, and exactly `key_bits` long.
pub fn build_hashmap(entries: &[(BitKey, Arc<Cell>)], key_bits: usize) -> Result<Option<Cell>> {
    if entries.is_empty() {
        return Ok(None);
    }
    for pair in entries.windows(2) {
        if pair[0].0 >= pair[1].0 {
            return Err(SbtError::InvalidArgument(
                "dictionary keys must be unique and ascending".to_string(),
            ));
        }
    }
    if let Some((key, _)) = entries.iter().find(|(k, _)| k.len() != key_bits) {
        return Err(SbtError::InvalidArgument(format!(
            "dictionary key has {} bits, expected {}",
            key.len(),
            key_bits
        )));
    }

    let edges: Vec<(&[bool], &Arc<Cell>)> = entries.iter().map(|(k, v)| (k.as_slice(), v)).collect();
    build_edge(&edges, key_bits).map(Some)
}

fn build_edge(entries: &[(&[bool], &Arc<Cell>)], remaining: usize) -> Result<Cell> {
    let (first, value) = entries[0];
    let label_len = match entries.last() {
        Some((last, _)) if entries.len() > 1 => first
            .iter()
            .zip(last.iter())
            .take_while(|(a, b)| a == b)
            .count(),
        _ => first.len(),
    };

    let mut builder = CellBuilder::new();
    store_label(&mut builder, &first[..label_len], remaining)?;

    if entries.len() == 1 {
        builder.store_ref(Arc::clone(value))?;
        return Ok(builder.build());
    }

    let split_at = entries.partition_point(|(k, _)| !k[label_len]);
    let rest = remaining - label_len - 1;
    let left = build_edge(&strip(&entries[..split_at], label_len + 1), rest)?;
    let right = build_edge(&strip(&entries[split_at..], label_len + 1), rest)?;
    builder.store_ref(left)?;
    builder.store_ref(right)?;
    Ok(builder.build())
}

fn strip<'a>(part: &[(&'a [bool], &'a Arc<Cell>)], skip: usize) -> Vec<(&'a [bool], &'a Arc<Cell>)> {
    part.iter().map(|&(k, v)| (&k[skip..], v)).collect()
}

fn store_label(builder: &mut CellBuilder, label: &[bool], max_len: usize) -> Result<()> {
    let n = label.len();
    let width = len_width(max_len);

    let short_len = 2 * n + 2;
    let long_len = 2 + width + n;
    let same_len = 3 + width;
    let uniform = label.windows(2).all(|w| w[0] == w[1]);

    let mut best = (LabelKind::Short, short_len);
    if long_len < best.1 {
        best = (LabelKind::Long, long_len);
    }
    if uniform && same_len < best.1 {
        best = (LabelKind::Same, same_len);
    }

    match best.0 {
        LabelKind::Short => {
            builder.store_bit(false)?;
            for _ in 0..n {
                builder.store_bit(true)?;
            }
            builder.store_bit(false)?;
            for &bit in label {
                builder.store_bit(bit)?;
            }
        }
        LabelKind::Long => {
            builder.store_uint(0b10, 2)?;
            builder.store_uint(n as u64, width)?;
            for &bit in label {
                builder.store_bit(bit)?;
            }
        }
        LabelKind::Same => {
            builder.store_uint(0b11, 2)?;
            builder.store_bit(label.first().copied().unwrap_or(false))?;
            builder.store_uint(n as u64, width)?;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum LabelKind {
    Short,
    Long,
    Same,
}

// =============================================================================
// Parsing
// =============================================================================

/// Walk a dictionary rooted at `root`, returning entries in ascending key order
pub fn parse_hashmap(root: &Cell, key_bits: usize) -> Result<Vec<(BitKey, Arc<Cell>)>> {
    let mut out = Vec::new();
    let mut prefix = Vec::with_capacity(key_bits);
    parse_edge(root, key_bits, &mut prefix, &mut out)?;
    Ok(out)
}

fn parse_edge(
    cell: &Cell,
    remaining: usize,
    prefix: &mut BitKey,
    out: &mut Vec<(BitKey, Arc<Cell>)>,
) -> Result<()> {
    let mut slice = cell.parse();
    let label = load_label(&mut slice, remaining)?;
    let base = prefix.len();
    prefix.extend_from_slice(&label);

    let rest = remaining - label.len();
    if rest == 0 {
        let value = slice.load_ref()?;
        out.push((prefix.clone(), Arc::clone(value)));
    } else {
        let left = slice.load_ref()?;
        let right = slice.load_ref()?;
        for (bit, child) in [(false, left), (true, right)] {
            prefix.push(bit);
            parse_edge(child, rest - 1, prefix, out)?;
            prefix.pop();
        }
    }

    prefix.truncate(base);
    Ok(())
}

fn load_label(slice: &mut CellSlice<'_>, max_len: usize) -> Result<Vec<bool>> {
    let width = len_width(max_len);
    let label = if !slice.load_bit()? {
        let mut n = 0;
        while slice.load_bit()? {
            n += 1;
        }
        check_label_len(n, max_len)?;
        load_bits(slice, n)?
    } else if !slice.load_bit()? {
        let n = slice.load_uint(width)? as usize;
        check_label_len(n, max_len)?;
        load_bits(slice, n)?
    } else {
        let bit = slice.load_bit()?;
        let n = slice.load_uint(width)? as usize;
        check_label_len(n, max_len)?;
        vec![bit; n]
    };
    Ok(label)
}

fn check_label_len(n: usize, max_len: usize) -> Result<()> {
    if n > max_len {
        return Err(SbtError::InvalidArgument(format!(
            "dictionary label of {} bits exceeds remaining key length {}",
            n, max_len
        )));
    }
    Ok(())
}

fn load_bits(slice: &mut CellSlice<'_>, n: usize) -> Result<Vec<bool>> {
    (0..n).map(|_| slice.load_bit()).collect()
}
