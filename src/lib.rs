//! # sbtcell
//!
//! Byte layouts for soulbound item/collection contracts:
//! - Snake encoding of arbitrary-length content into chained cells
//! - On-chain content dictionaries keyed by `sha256(field_name)`
//! - Fixed-layout command messages with a closed op-code table
//! - Deployment data, state init and address derivation
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 metadata fields (name → text)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   key_of    │          │    Snake    │
//!   │  (sha256)   │          │  (chunks)   │
//!   └──────┬──────┘          └──────┬──────┘
//!          └────────────┬───────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │    Content    │
//!               │  Dictionary   │
//!               └───────┬───────┘
//!                       │ ^content
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Deploy    │          │  Protocol   │
//!   │ (data/init) │          │ (messages)  │
//!   └──────┬──────┘          └──────┬──────┘
//!          └────────────┬───────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │ Bag of Cells  │
//!               └───────────────┘
//! ```
//!
//! Everything here is pure and synchronous; values can be shared freely
//! across threads.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod cell;
pub mod boc;
pub mod address;
pub mod snake;
pub mod content;
pub mod protocol;
pub mod deploy;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SbtError, Result};
pub use config::Config;
pub use address::Address;
pub use cell::{Cell, CellBuilder, CellSlice, U256};
pub use content::{build_onchain_content, key_of, ContentDictionary};
pub use protocol::{decode_message, encode_message, Command, Message, OpCode};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of sbtcell
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
