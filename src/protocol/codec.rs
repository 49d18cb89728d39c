//! Protocol codec
//!
//! Encoding and decoding functions for message bodies.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬───────────────┬─────────────────────────────┐
//! │ op (32)  │ query_id (64) │   op-specific fields        │
//! └──────────┴───────────────┴─────────────────────────────┘
//! ```
//!
//! ### Fields by Operation
//! - transfer, get_static_data, destroy, revoke, take_excess, excesses: none
//! - prove_ownership, request_owner: dest:MsgAddress ^forward_payload with_content:int8
//! - change_description:  ^description (snake)
//! - mint, init_sbt:      owner:MsgAddress authority:MsgAddress ^content
//! - report_static_data:  index:uint256 collection:MsgAddress
//! - ownership_proof:     item_id:uint256 owner:MsgAddress ^data revoked_at:uint64 content:(Maybe ^Cell)
//! - owner_info:          item_id:uint256 initiator:MsgAddress owner:MsgAddress ^data
//!                        revoked_at:uint64 content:(Maybe ^Cell)
//!
//! Flags are stored as a signed byte: `true` is -1, `false` is 0.

use std::io::{Read, Write};
use std::sync::Arc;

use crate::address::Address;
use crate::boc::{deserialize_boc, serialize_boc};
use crate::cell::{Cell, CellBuilder, CellSlice};
use crate::error::{Result, SbtError};
use crate::snake;

use super::{Command, Message, OpCode};

/// Header size in bits: op (32) + query id (64)
pub const HEADER_BITS: usize = 96;

/// Maximum accepted bag-of-cells size when reading from a stream (1 MB)
pub const MAX_MESSAGE_SIZE: u64 = 1024 * 1024;

const FLAG_TRUE: i64 = -1;
const FLAG_FALSE: i64 = 0;

// =============================================================================
// Message Encoding
// =============================================================================

/// Encode a message body into a cell
pub fn encode_message(message: &Message) -> Result<Cell> {
    let op = message.op();
    let mut b = CellBuilder::new();
    b.store_uint(op.code() as u64, 32)?;
    b.store_uint(message.query_id, 64)?;

    match &message.command {
        Command::Transfer
        | Command::GetStaticData
        | Command::Destroy
        | Command::Revoke
        | Command::TakeExcess
        | Command::Excesses => {}

        Command::ProveOwnership {
            destination,
            forward_payload,
            with_content,
        }
        | Command::RequestOwner {
            destination,
            forward_payload,
            with_content,
        } => {
            b.store_address(Some(destination))?;
            b.store_ref(Arc::clone(forward_payload))?;
            b.store_int(encode_flag(*with_content), 8)?;
        }

        Command::ChangeDescription { description } => {
            b.store_ref(snake::encode(description.as_bytes())?)?;
        }

        Command::Mint {
            owner,
            authority,
            content,
        }
        | Command::InitSbt {
            owner,
            authority,
            content,
        } => {
            b.store_address(Some(owner))?;
            b.store_address(Some(authority))?;
            b.store_ref(Arc::clone(content))?;
        }

        Command::ReportStaticData { index, collection } => {
            b.store_u256(index)?;
            b.store_address(collection.as_ref())?;
        }

        Command::OwnershipProof {
            item_id,
            owner,
            data,
            revoked_at,
            content,
        } => {
            b.store_u256(item_id)?;
            b.store_address(Some(owner))?;
            b.store_ref(Arc::clone(data))?;
            b.store_uint(*revoked_at, 64)?;
            b.store_maybe_ref(content.clone())?;
        }

        Command::OwnerInfo {
            item_id,
            initiator,
            owner,
            data,
            revoked_at,
            content,
        } => {
            b.store_u256(item_id)?;
            b.store_address(Some(initiator))?;
            b.store_address(Some(owner))?;
            b.store_ref(Arc::clone(data))?;
            b.store_uint(*revoked_at, 64)?;
            b.store_maybe_ref(content.clone())?;
        }
    }

    tracing::debug!(op = %op, query_id = message.query_id, "Encoded message");
    Ok(b.build())
}

/// Decode a message body from a cell
pub fn decode_message(cell: &Cell) -> Result<Message> {
    let mut s = cell.parse();
    if s.remaining_bits() < HEADER_BITS {
        return Err(SbtError::CellUnderflow(format!(
            "message header needs {} bits, body has {}",
            HEADER_BITS,
            s.remaining_bits()
        )));
    }

    let op = OpCode::from_code(s.load_uint(32)? as u32)?;
    let query_id = s.load_uint(64)?;

    let command = match op {
        OpCode::Transfer => Command::Transfer,
        OpCode::GetStaticData => Command::GetStaticData,
        OpCode::Destroy => Command::Destroy,
        OpCode::Revoke => Command::Revoke,
        OpCode::TakeExcess => Command::TakeExcess,
        OpCode::Excesses => Command::Excesses,

        OpCode::ProveOwnership => {
            let (destination, forward_payload, with_content) = decode_ownership_request(&mut s)?;
            Command::ProveOwnership {
                destination,
                forward_payload,
                with_content,
            }
        }
        OpCode::RequestOwner => {
            let (destination, forward_payload, with_content) = decode_ownership_request(&mut s)?;
            Command::RequestOwner {
                destination,
                forward_payload,
                with_content,
            }
        }

        OpCode::ChangeDescription => Command::ChangeDescription {
            description: snake::decode_string(s.load_ref()?)?,
        },

        OpCode::Mint | OpCode::InitSbt => {
            let owner = s.load_required_address()?;
            let authority = s.load_required_address()?;
            let content = Arc::clone(s.load_ref()?);
            if op == OpCode::Mint {
                Command::Mint {
                    owner,
                    authority,
                    content,
                }
            } else {
                Command::InitSbt {
                    owner,
                    authority,
                    content,
                }
            }
        }

        OpCode::ReportStaticData => Command::ReportStaticData {
            index: s.load_u256()?,
            collection: s.load_address()?,
        },

        OpCode::OwnershipProof => Command::OwnershipProof {
            item_id: s.load_u256()?,
            owner: s.load_required_address()?,
            data: Arc::clone(s.load_ref()?),
            revoked_at: s.load_uint(64)?,
            content: s.load_maybe_ref()?.cloned(),
        },

        OpCode::OwnerInfo => Command::OwnerInfo {
            item_id: s.load_u256()?,
            initiator: s.load_required_address()?,
            owner: s.load_required_address()?,
            data: Arc::clone(s.load_ref()?),
            revoked_at: s.load_uint(64)?,
            content: s.load_maybe_ref()?.cloned(),
        },
    };

    tracing::trace!(op = %op, query_id, "Decoded message");
    Ok(Message { query_id, command })
}

fn decode_ownership_request(s: &mut CellSlice<'_>) -> Result<(Address, Arc<Cell>, bool)> {
    let destination = s.load_required_address()?;
    let forward_payload = Arc::clone(s.load_ref()?);
    let with_content = decode_flag(s.load_int(8)?);
    Ok((destination, forward_payload, with_content))
}

/// Flags use the runtime's native truth value: -1 for true
pub fn encode_flag(value: bool) -> i64 {
    if value {
        FLAG_TRUE
    } else {
        FLAG_FALSE
    }
}

/// Any non-zero byte reads as true
pub fn decode_flag(value: i64) -> bool {
    value != FLAG_FALSE
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a message to a stream as a bag of cells
pub fn write_message<W: Write>(writer: &mut W, message: &Message) -> Result<()> {
    let bytes = serialize_boc(&encode_message(message)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a bag of cells from a stream until EOF and decode the message in it
pub fn read_message<R: Read>(reader: &mut R) -> Result<Message> {
    let mut bytes = Vec::new();
    reader.by_ref().take(MAX_MESSAGE_SIZE + 1).read_to_end(&mut bytes)?;

    if bytes.len() as u64 > MAX_MESSAGE_SIZE {
        return Err(SbtError::InvalidArgument(format!(
            "message too large (max {} bytes)",
            MAX_MESSAGE_SIZE
        )));
    }

    decode_message(&deserialize_boc(&bytes)?)
}
