//! Cell Builder
//!
//! Append-only writer: open, store fields in order, then `build()`.

use std::sync::Arc;

use crate::address::Address;
use crate::error::{Result, SbtError};

use super::{Cell, CellSlice, U256, MAX_BITS, MAX_DEPTH, MAX_REFS};

/// Builder for a single cell
#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    /// Packed bits, MSB first; bits past `bit_len` are always zero
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn ref_count(&self) -> usize {
        self.refs.len()
    }

    pub fn remaining_bits(&self) -> usize {
        MAX_BITS - self.bit_len
    }

    pub fn remaining_refs(&self) -> usize {
        MAX_REFS - self.refs.len()
    }

    fn ensure_bits(&self, count: usize) -> Result<()> {
        if count > self.remaining_bits() {
            return Err(SbtError::CapacityExceeded(format!(
                "cannot store {} more bits ({} of {} used)",
                count, self.bit_len, MAX_BITS
            )));
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        let byte = self.bit_len / 8;
        if byte == self.data.len() {
            self.data.push(0);
        }
        if bit {
            self.data[byte] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    // =========================================================================
    // Data
    // =========================================================================

    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self> {
        self.ensure_bits(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Store the first `bit_count` bits of `bytes`
    pub fn store_bits(&mut self, bytes: &[u8], bit_count: usize) -> Result<&mut Self> {
        if bit_count > bytes.len() * 8 {
            return Err(SbtError::InvalidArgument(format!(
                "{} bits requested from a {}-byte buffer",
                bit_count,
                bytes.len()
            )));
        }
        self.ensure_bits(bit_count)?;

        if self.bit_len % 8 == 0 && bit_count % 8 == 0 {
            self.data.extend_from_slice(&bytes[..bit_count / 8]);
            self.bit_len += bit_count;
            return Ok(self);
        }

        for i in 0..bit_count {
            self.push_bit((bytes[i / 8] >> (7 - i % 8)) & 1 == 1);
        }
        Ok(self)
    }

    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.store_bits(bytes, bytes.len() * 8)
    }

    /// Store an unsigned integer in exactly `bits` bits (at most 64)
    pub fn store_uint(&mut self, value: u64, bits: usize) -> Result<&mut Self> {
        if bits > 64 {
            return Err(SbtError::InvalidArgument(format!(
                "uint width {} exceeds 64 bits",
                bits
            )));
        }
        if bits < 64 && value >> bits != 0 {
            return Err(SbtError::InvalidArgument(format!(
                "value {} does not fit in {} bits",
                value, bits
            )));
        }
        self.ensure_bits(bits)?;
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(self)
    }

    /// Store a signed integer in two's complement using exactly `bits` bits
    pub fn store_int(&mut self, value: i64, bits: usize) -> Result<&mut Self> {
        if bits == 0 || bits > 64 {
            return Err(SbtError::InvalidArgument(format!(
                "int width {} must be within 1..=64",
                bits
            )));
        }
        if bits < 64 {
            let min = -(1i64 << (bits - 1));
            let max = (1i64 << (bits - 1)) - 1;
            if value < min || value > max {
                return Err(SbtError::InvalidArgument(format!(
                    "value {} does not fit in signed {} bits",
                    value, bits
                )));
            }
        }
        self.ensure_bits(bits)?;
        let raw = value as u64;
        for i in (0..bits).rev() {
            self.push_bit((raw >> i) & 1 == 1);
        }
        Ok(self)
    }

    pub fn store_u256(&mut self, value: &U256) -> Result<&mut Self> {
        self.store_bytes(value.as_bytes())
    }

    /// Store an address, or `addr_none` when absent
    pub fn store_address(&mut self, address: Option<&Address>) -> Result<&mut Self> {
        match address {
            Some(addr) => addr.store_into(self),
            None => self.store_uint(0, 2),
        }
    }

    /// Copy the unread bits of a slice (references are not copied)
    pub fn store_slice_bits(&mut self, slice: &CellSlice<'_>) -> Result<&mut Self> {
        let bits = slice.remaining_bits();
        let mut reader = slice.clone();
        self.ensure_bits(bits)?;
        for _ in 0..bits {
            let bit = reader.load_bit()?;
            self.push_bit(bit);
        }
        Ok(self)
    }

    // =========================================================================
    // References
    // =========================================================================

    pub fn store_ref(&mut self, cell: impl Into<Arc<Cell>>) -> Result<&mut Self> {
        let cell = cell.into();
        if self.refs.len() >= MAX_REFS {
            return Err(SbtError::CapacityExceeded(format!(
                "cell already holds {} references",
                MAX_REFS
            )));
        }
        if cell.depth() >= MAX_DEPTH {
            return Err(SbtError::CapacityExceeded(format!(
                "referenced cell depth {} reaches the limit of {}",
                cell.depth(),
                MAX_DEPTH
            )));
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// `Maybe ^Cell`: a presence bit, then the reference if present
    pub fn store_maybe_ref(&mut self, cell: Option<Arc<Cell>>) -> Result<&mut Self> {
        match cell {
            Some(cell) => {
                if self.refs.len() >= MAX_REFS {
                    return Err(SbtError::CapacityExceeded(format!(
                        "cell already holds {} references",
                        MAX_REFS
                    )));
                }
                self.store_bit(true)?;
                self.store_ref(cell)
            }
            None => self.store_bit(false),
        }
    }

    /// Close the builder into an immutable cell
    pub fn build(self) -> Cell {
        Cell::from_parts(self.data, self.bit_len, self.refs)
    }
}
