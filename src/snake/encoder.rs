//! Snake encoder and decoder

use crate::cell::{Cell, CellBuilder};
use crate::config::Config;
use crate::error::{Result, SbtError};

use super::chunk::{split, CHUNK_SIZE};

/// Encoder with a configurable chunk size
#[derive(Debug, Clone, Copy)]
pub struct SnakeEncoder {
    chunk_size: usize,
}

impl Default for SnakeEncoder {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }
}

impl SnakeEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_chunk_size(config.chunk_size)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Encode `buffer` into a chain, returning its root.
    ///
    /// The chain is built tail-first: each new cell takes ownership of the
    /// chain built so far as its only reference.
    pub fn encode(&self, buffer: &[u8]) -> Result<Cell> {
        let chunks = split(buffer, self.chunk_size)?;

        let mut next: Option<Cell> = None;
        for chunk in chunks.iter().rev() {
            let mut builder = CellBuilder::new();
            if let Some(tail) = next.take() {
                builder.store_ref(tail)?;
            }
            builder.store_bytes(chunk)?;
            next = Some(builder.build());
        }

        tracing::trace!(
            bytes = buffer.len(),
            chunks = chunks.len(),
            "Encoded snake chain"
        );
        Ok(next.unwrap_or_else(Cell::empty))
    }
}

/// Encode with the standard 127-byte chunk size
pub fn encode(buffer: &[u8]) -> Result<Cell> {
    SnakeEncoder::new().encode(buffer)
}

/// Concatenate the payload of every cell along reference 0
pub fn decode(root: &Cell) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut current = Some(root);

    while let Some(cell) = current {
        if cell.bit_len() % 8 != 0 {
            return Err(SbtError::InvalidArgument(format!(
                "snake cell holds {} bits, not a whole number of bytes",
                cell.bit_len()
            )));
        }
        out.extend_from_slice(cell.data());
        current = cell.reference(0).map(|r| r.as_ref());
    }

    Ok(out)
}

/// Decode a chain holding UTF-8 text
pub fn decode_string(root: &Cell) -> Result<String> {
    String::from_utf8(decode(root)?)
        .map_err(|e| SbtError::InvalidArgument(format!("snake content is not UTF-8: {}", e)))
}
