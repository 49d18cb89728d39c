//! Snake Module
//!
//! Encodes an arbitrary byte buffer as a right-leaning chain of cells.
//!
//! ## Chain Layout
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ chunk 0      │───▶│ chunk 1      │───▶│ chunk N-1    │
//! │ (127 bytes)  │    │ (127 bytes)  │    │ (≤127 bytes) │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//! Each cell holds one chunk and at most one reference (index 0) to the
//! cell holding the next chunk.

mod chunk;
mod encoder;

pub use chunk::{split, CHUNK_SIZE};
pub use encoder::{decode, decode_string, encode, SnakeEncoder};
