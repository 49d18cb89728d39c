//! Protocol Module
//!
//! Defines the message bodies exchanged with items and collections.
//!
//! ## Body Format
//! ```text
//! ┌──────────┬───────────────┬─────────────────────────────┐
//! │ op (32)  │ query_id (64) │   op-specific fields        │
//! └──────────┴───────────────┴─────────────────────────────┘
//! ```
//!
//! ### Operations
//! - 0x00000001: mint
//! - 0x5fcc3d14: transfer
//! - 0x2fcb26a2: get_static_data
//! - 0x8b771735: report_static_data
//! - 0xd53276db: excesses
//! - 0x6f89f5e3: revoke
//! - 0x1f04537a: destroy
//! - 0x0dd607e3: owner_info
//! - 0xd0c3bfea: request_owner
//! - 0x0524c7ae: ownership_proof
//! - 0x04ded148: prove_ownership
//! - 0x97dc3e21: init_sbt
//! - 0xb3f3b959: take_excess
//! - 0x7587fb7c: change_description

mod codec;
mod command;
mod getter;

pub use codec::{
    decode_flag, decode_message, encode_flag, encode_message, read_message, write_message,
    HEADER_BITS, MAX_MESSAGE_SIZE,
};
pub use command::{operation_code_of, parse_hex_code, Command, Message, OpCode, OpCodeEntry};
pub use getter::{GetMethod, StackEntry};
