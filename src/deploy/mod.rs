//! Deploy Module
//!
//! Initial persistent data of items and collections, and the state init /
//! address pair a wrapper needs to deploy them.
//!
//! ## Data Layouts
//! ```text
//! Collection: owner:MsgAddress next_item_index:uint64 ^content ^item_code
//! Item:       item_id:uint64 collection:MsgAddress owner:MsgAddress
//!             authority:MsgAddress ^content revoked_at:uint64
//! ```

mod entity;
mod state_init;

pub use entity::{CollectionConfig, ItemConfig};
pub use state_init::{AddressDeriver, Deployment, StateInit, StateInitHasher};
