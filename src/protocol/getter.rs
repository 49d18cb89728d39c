//! Read-only accessor definitions
//!
//! Names and argument stacks of the get-methods exposed by items and
//! collections. Result stacks are contract-defined.

use std::sync::Arc;

use crate::cell::Cell;

/// A value on a get-method argument stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEntry {
    Int(i128),
    Cell(Arc<Cell>),
}

/// Get-methods of the collection and item contracts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetMethod {
    /// Collection: full content of item `index` given its individual content
    NftContent {
        index: u64,
        individual_content: Arc<Cell>,
    },
    /// Collection: next index, content, owner
    CollectionData,
    /// Collection: address of item `index`
    NftAddressByIndex { index: u64 },
    /// Item: revocation time, 0 when not revoked
    RevokedTime,
    Student,
    Description,
}

impl GetMethod {
    pub fn name(&self) -> &'static str {
        match self {
            GetMethod::NftContent { .. } => "get_nft_content",
            GetMethod::CollectionData => "get_collection_data",
            GetMethod::NftAddressByIndex { .. } => "get_nft_address_by_index",
            GetMethod::RevokedTime => "get_revoked_time",
            GetMethod::Student => "get_student",
            GetMethod::Description => "get_description",
        }
    }

    /// Arguments in push order
    pub fn stack(&self) -> Vec<StackEntry> {
        match self {
            GetMethod::NftContent {
                index,
                individual_content,
            } => vec![
                StackEntry::Int(*index as i128),
                StackEntry::Cell(Arc::clone(individual_content)),
            ],
            GetMethod::NftAddressByIndex { index } => vec![StackEntry::Int(*index as i128)],
            GetMethod::CollectionData
            | GetMethod::RevokedTime
            | GetMethod::Student
            | GetMethod::Description => Vec::new(),
        }
    }
}
