//! Content Module
//!
//! On-chain content: named metadata fields stored in a dictionary keyed by
//! `sha256(field_name)`, each value a snake-encoded UTF-8 string.
//!
//! ## Content Cell
//! ```text
//! ┌────────────────┬──────────────────────────────────────────────┐
//! │ prefix: int8=0 │ HashmapE 256 ^Cell (maybe-ref to dict root)  │
//! └────────────────┴──────────────────────────────────────────────┘
//! ```

mod dictionary;
mod hashmap;
mod key;

pub use dictionary::{
    build_onchain_content, load_fields, load_metadata, ContentDictionary, ContentEntry,
    OnchainMetadata, OFFCHAIN_CONTENT_PREFIX, ONCHAIN_CONTENT_PREFIX,
};
pub use hashmap::{build_hashmap, parse_hashmap, BitKey};
pub use key::{key_of, key_of_bytes};
