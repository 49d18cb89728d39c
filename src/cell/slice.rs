//! Cell Slice
//!
//! Cursor over a cell's bits and references, mirroring every builder store.

use std::sync::Arc;

use crate::address::Address;
use crate::error::{Result, SbtError};

use super::{Cell, U256};

/// Read cursor into a cell
#[derive(Debug, Clone)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    pub fn remaining_refs(&self) -> usize {
        self.cell.refs().len() - self.ref_pos
    }

    /// True when neither bits nor references are left
    pub fn is_exhausted(&self) -> bool {
        self.remaining_bits() == 0 && self.remaining_refs() == 0
    }

    fn ensure_bits(&self, count: usize) -> Result<()> {
        if count > self.remaining_bits() {
            return Err(SbtError::CellUnderflow(format!(
                "need {} bits, {} left",
                count,
                self.remaining_bits()
            )));
        }
        Ok(())
    }

    fn next_bit(&mut self) -> bool {
        let data = self.cell.data();
        let bit = (data[self.bit_pos / 8] >> (7 - self.bit_pos % 8)) & 1 == 1;
        self.bit_pos += 1;
        bit
    }

    // =========================================================================
    // Data
    // =========================================================================

    pub fn load_bit(&mut self) -> Result<bool> {
        self.ensure_bits(1)?;
        Ok(self.next_bit())
    }

    pub fn skip_bits(&mut self, count: usize) -> Result<()> {
        self.ensure_bits(count)?;
        self.bit_pos += count;
        Ok(())
    }

    pub fn load_uint(&mut self, bits: usize) -> Result<u64> {
        if bits > 64 {
            return Err(SbtError::InvalidArgument(format!(
                "uint width {} exceeds 64 bits",
                bits
            )));
        }
        self.ensure_bits(bits)?;
        let mut value = 0u64;
        for _ in 0..bits {
            value = (value << 1) | self.next_bit() as u64;
        }
        Ok(value)
    }

    pub fn load_int(&mut self, bits: usize) -> Result<i64> {
        if bits == 0 || bits > 64 {
            return Err(SbtError::InvalidArgument(format!(
                "int width {} must be within 1..=64",
                bits
            )));
        }
        let raw = self.load_uint(bits)?;
        if bits == 64 {
            return Ok(raw as i64);
        }
        // sign-extend
        let shift = 64 - bits;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Load `count` whole bytes
    pub fn load_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.ensure_bits(count * 8)?;
        if self.bit_pos % 8 == 0 {
            let start = self.bit_pos / 8;
            self.bit_pos += count * 8;
            return Ok(self.cell.data()[start..start + count].to_vec());
        }
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let mut byte = 0u8;
            for _ in 0..8 {
                byte = (byte << 1) | self.next_bit() as u8;
            }
            out.push(byte);
        }
        Ok(out)
    }

    pub fn load_u256(&mut self) -> Result<U256> {
        let bytes = self.load_bytes(32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(U256(out))
    }

    /// Load an address; `addr_none` yields `None`
    pub fn load_address(&mut self) -> Result<Option<Address>> {
        Address::load_from(self)
    }

    /// Load an address that must be present
    pub fn load_required_address(&mut self) -> Result<Address> {
        self.load_address()?
            .ok_or_else(|| SbtError::InvalidArgument("expected an address, found addr_none".to_string()))
    }

    // =========================================================================
    // References
    // =========================================================================

    pub fn load_ref(&mut self) -> Result<&'a Arc<Cell>> {
        let cell = self.cell;
        let r = cell.reference(self.ref_pos).ok_or_else(|| {
            SbtError::CellUnderflow(format!(
                "no reference at index {} ({} total)",
                self.ref_pos,
                cell.refs().len()
            ))
        })?;
        self.ref_pos += 1;
        Ok(r)
    }

    pub fn load_maybe_ref(&mut self) -> Result<Option<&'a Arc<Cell>>> {
        if self.load_bit()? {
            Ok(Some(self.load_ref()?))
        } else {
            Ok(None)
        }
    }
}
