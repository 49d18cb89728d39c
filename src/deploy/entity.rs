//! Item and collection data cells

use std::sync::Arc;

use crate::address::Address;
use crate::cell::{Cell, CellBuilder};
use crate::error::Result;

/// Initial data of a collection contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionConfig {
    pub owner: Address,
    pub next_item_index: u64,
    pub content: Arc<Cell>,
    pub item_code: Arc<Cell>,
}

impl CollectionConfig {
    pub fn to_data_cell(&self) -> Result<Cell> {
        let mut b = CellBuilder::new();
        b.store_address(Some(&self.owner))?;
        b.store_uint(self.next_item_index, 64)?;
        b.store_ref(Arc::clone(&self.content))?;
        b.store_ref(Arc::clone(&self.item_code))?;
        Ok(b.build())
    }

    pub fn from_data_cell(cell: &Cell) -> Result<Self> {
        let mut s = cell.parse();
        Ok(Self {
            owner: s.load_required_address()?,
            next_item_index: s.load_uint(64)?,
            content: Arc::clone(s.load_ref()?),
            item_code: Arc::clone(s.load_ref()?),
        })
    }
}

/// Initial data of an item contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemConfig {
    pub item_id: u64,
    pub collection: Address,
    pub owner: Address,
    pub authority: Address,
    pub content: Arc<Cell>,
    /// Unix time of revocation; 0 means not revoked
    pub revoked_at: u64,
}

impl ItemConfig {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at != 0
    }

    pub fn to_data_cell(&self) -> Result<Cell> {
        let mut b = CellBuilder::new();
        b.store_uint(self.item_id, 64)?;
        b.store_address(Some(&self.collection))?;
        b.store_address(Some(&self.owner))?;
        b.store_address(Some(&self.authority))?;
        b.store_ref(Arc::clone(&self.content))?;
        b.store_uint(self.revoked_at, 64)?;
        Ok(b.build())
    }

    pub fn from_data_cell(cell: &Cell) -> Result<Self> {
        let mut s = cell.parse();
        Ok(Self {
            item_id: s.load_uint(64)?,
            collection: s.load_required_address()?,
            owner: s.load_required_address()?,
            authority: s.load_required_address()?,
            content: Arc::clone(s.load_ref()?),
            revoked_at: s.load_uint(64)?,
        })
    }
}
