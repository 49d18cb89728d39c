//! State init and address derivation

use std::sync::Arc;

use crate::address::Address;
use crate::cell::{Cell, CellBuilder};
use crate::error::Result;

use super::{CollectionConfig, ItemConfig};

/// Code and initial data of a contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInit {
    pub code: Arc<Cell>,
    pub data: Arc<Cell>,
}

impl StateInit {
    pub fn new(code: Arc<Cell>, data: Arc<Cell>) -> Self {
        Self { code, data }
    }

    /// `split_depth:nothing special:nothing code:^Cell data:^Cell library:empty`
    pub fn to_cell(&self) -> Result<Cell> {
        let mut b = CellBuilder::new();
        b.store_bit(false)?; // split_depth
        b.store_bit(false)?; // special
        b.store_maybe_ref(Some(Arc::clone(&self.code)))?;
        b.store_maybe_ref(Some(Arc::clone(&self.data)))?;
        b.store_bit(false)?; // library
        Ok(b.build())
    }
}

/// Computes the address a state init deploys to
pub trait AddressDeriver {
    fn derive(&self, workchain: i8, init: &StateInit) -> Result<Address>;
}

/// Standard derivation: the representation hash of the state init cell
#[derive(Debug, Clone, Copy, Default)]
pub struct StateInitHasher;

impl AddressDeriver for StateInitHasher {
    fn derive(&self, workchain: i8, init: &StateInit) -> Result<Address> {
        let cell = init.to_cell()?;
        Ok(Address::new(workchain, *cell.hash()))
    }
}

/// Address plus the state init that deploys to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub address: Address,
    pub init: StateInit,
}

impl Deployment {
    pub fn new(code: Arc<Cell>, data: Cell, workchain: i8) -> Result<Self> {
        Self::with_deriver(&StateInitHasher, code, data, workchain)
    }

    pub fn with_deriver<D: AddressDeriver>(
        deriver: &D,
        code: Arc<Cell>,
        data: Cell,
        workchain: i8,
    ) -> Result<Self> {
        let init = StateInit::new(code, Arc::new(data));
        let address = deriver.derive(workchain, &init)?;
        tracing::debug!(address = %address, "Derived deployment address");
        Ok(Self { address, init })
    }

    pub fn item(config: &ItemConfig, code: Arc<Cell>, workchain: i8) -> Result<Self> {
        Self::new(code, config.to_data_cell()?, workchain)
    }

    pub fn collection(config: &CollectionConfig, code: Arc<Cell>, workchain: i8) -> Result<Self> {
        Self::new(code, config.to_data_cell()?, workchain)
    }
}
