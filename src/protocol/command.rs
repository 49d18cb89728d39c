//! Command definitions
//!
//! Operation codes and the typed message bodies they introduce.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::address::Address;
use crate::cell::{Cell, U256};
use crate::error::{Result, SbtError};

/// Operation codes understood by items and collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum OpCode {
    Mint = 0x0000_0001,
    Transfer = 0x5fcc_3d14,
    GetStaticData = 0x2fcb_26a2,
    ReportStaticData = 0x8b77_1735,
    Excesses = 0xd532_76db,
    Revoke = 0x6f89_f5e3,
    Destroy = 0x1f04_537a,
    OwnerInfo = 0x0dd6_07e3,
    RequestOwner = 0xd0c3_bfea,
    OwnershipProof = 0x0524_c7ae,
    ProveOwnership = 0x04de_d148,
    InitSbt = 0x97dc_3e21,
    TakeExcess = 0xb3f3_b959,
    ChangeDescription = 0x7587_fb7c,
}

impl OpCode {
    /// Every known operation, in table order
    pub const ALL: [OpCode; 14] = [
        OpCode::Transfer,
        OpCode::GetStaticData,
        OpCode::ReportStaticData,
        OpCode::Excesses,
        OpCode::Revoke,
        OpCode::Destroy,
        OpCode::OwnerInfo,
        OpCode::RequestOwner,
        OpCode::OwnershipProof,
        OpCode::ProveOwnership,
        OpCode::InitSbt,
        OpCode::TakeExcess,
        OpCode::ChangeDescription,
        OpCode::Mint,
    ];

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn symbol(self) -> &'static str {
        match self {
            OpCode::Mint => "mint",
            OpCode::Transfer => "transfer",
            OpCode::GetStaticData => "get_static_data",
            OpCode::ReportStaticData => "report_static_data",
            OpCode::Excesses => "excesses",
            OpCode::Revoke => "revoke",
            OpCode::Destroy => "destroy",
            OpCode::OwnerInfo => "owner_info",
            OpCode::RequestOwner => "request_owner",
            OpCode::OwnershipProof => "ownership_proof",
            OpCode::ProveOwnership => "prove_ownership",
            OpCode::InitSbt => "init_sbt",
            OpCode::TakeExcess => "take_excess",
            OpCode::ChangeDescription => "change_description",
        }
    }

    pub fn from_code(code: u32) -> Result<Self> {
        OpCode::ALL
            .into_iter()
            .find(|op| op.code() == code)
            .ok_or(SbtError::UnknownOperation(code))
    }

    pub fn from_symbol(symbol: &str) -> Result<Self> {
        OpCode::ALL
            .into_iter()
            .find(|op| op.symbol() == symbol)
            .ok_or_else(|| SbtError::InvalidArgument(format!("unknown operation '{}'", symbol)))
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:08x})", self.symbol(), self.code())
    }
}

impl FromStr for OpCode {
    type Err = SbtError;

    /// Accepts a symbol (`transfer`) or a hex literal (`0x5fcc3d14`)
    fn from_str(s: &str) -> Result<Self> {
        if s.starts_with("0x") || s.starts_with("0X") {
            OpCode::from_code(parse_hex_code(s)?)
        } else {
            OpCode::from_symbol(s)
        }
    }
}

/// Parse a `0x`-prefixed (or bare) 32-bit hex constant
pub fn parse_hex_code(text: &str) -> Result<u32> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16)
        .map_err(|e| SbtError::InvalidArgument(format!("invalid op code '{}': {}", text, e)))
}

/// Numeric code of an operation symbol
pub fn operation_code_of(symbol: &str) -> Result<u32> {
    OpCode::from_symbol(symbol).map(OpCode::code)
}

/// One row of the operation table, for listings
#[derive(Debug, Clone, Serialize)]
pub struct OpCodeEntry {
    pub symbol: &'static str,
    pub code: String,
}

impl From<OpCode> for OpCodeEntry {
    fn from(op: OpCode) -> Self {
        Self {
            symbol: op.symbol(),
            code: format!("0x{:08x}", op.code()),
        }
    }
}

// =============================================================================
// Messages
// =============================================================================

/// A message body: op code, query id, then the op's fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub query_id: u64,
    pub command: Command,
}

impl Message {
    pub fn new(query_id: u64, command: Command) -> Self {
        Self { query_id, command }
    }

    pub fn op(&self) -> OpCode {
        self.command.op()
    }
}

/// Operation-specific fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Collection: mint a new item
    Mint {
        owner: Address,
        authority: Address,
        content: Arc<Cell>,
    },

    /// Collection to item: initialize freshly deployed item
    InitSbt {
        owner: Address,
        authority: Address,
        content: Arc<Cell>,
    },

    /// Always rejected by soulbound items; kept for wire compatibility
    Transfer,

    GetStaticData,

    ReportStaticData {
        index: U256,
        collection: Option<Address>,
    },

    /// Owner asks the item to prove ownership to `destination`
    ProveOwnership {
        destination: Address,
        forward_payload: Arc<Cell>,
        with_content: bool,
    },

    /// Anyone asks the item to report its owner to `destination`
    RequestOwner {
        destination: Address,
        forward_payload: Arc<Cell>,
        with_content: bool,
    },

    OwnershipProof {
        item_id: U256,
        owner: Address,
        data: Arc<Cell>,
        revoked_at: u64,
        content: Option<Arc<Cell>>,
    },

    OwnerInfo {
        item_id: U256,
        initiator: Address,
        owner: Address,
        data: Arc<Cell>,
        revoked_at: u64,
        content: Option<Arc<Cell>>,
    },

    Destroy,
    Revoke,
    TakeExcess,
    Excesses,

    /// New description, snake-encoded on the wire
    ChangeDescription { description: String },
}

impl Command {
    /// Get the operation code
    pub fn op(&self) -> OpCode {
        match self {
            Command::Mint { .. } => OpCode::Mint,
            Command::InitSbt { .. } => OpCode::InitSbt,
            Command::Transfer => OpCode::Transfer,
            Command::GetStaticData => OpCode::GetStaticData,
            Command::ReportStaticData { .. } => OpCode::ReportStaticData,
            Command::ProveOwnership { .. } => OpCode::ProveOwnership,
            Command::RequestOwner { .. } => OpCode::RequestOwner,
            Command::OwnershipProof { .. } => OpCode::OwnershipProof,
            Command::OwnerInfo { .. } => OpCode::OwnerInfo,
            Command::Destroy => OpCode::Destroy,
            Command::Revoke => OpCode::Revoke,
            Command::TakeExcess => OpCode::TakeExcess,
            Command::Excesses => OpCode::Excesses,
            Command::ChangeDescription { .. } => OpCode::ChangeDescription,
        }
    }
}
