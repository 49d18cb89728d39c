//! Contract addresses
//!
//! Only standard internal addresses are supported:
//! ```text
//! addr_std$10 anycast:(Maybe Anycast)=0 workchain_id:int8 address:bits256
//! addr_none$00
//! ```
//! Raw text form is `<workchain>:<64 hex digits>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cell::{CellBuilder, CellSlice};
use crate::error::{Result, SbtError};

/// Bits taken by a serialized `addr_std`
pub const ADDRESS_BITS: usize = 2 + 1 + 8 + 256;

const TAG_NONE: u64 = 0b00;
const TAG_STD: u64 = 0b10;

/// A standard internal address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    pub workchain: i8,
    pub hash: [u8; 32],
}

impl Address {
    pub fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self { workchain, hash }
    }

    pub(crate) fn store_into<'b>(&self, builder: &'b mut CellBuilder) -> Result<&'b mut CellBuilder> {
        if builder.remaining_bits() < ADDRESS_BITS {
            return Err(SbtError::CapacityExceeded(format!(
                "address needs {} bits, {} left",
                ADDRESS_BITS,
                builder.remaining_bits()
            )));
        }
        builder.store_uint(TAG_STD, 2)?;
        builder.store_bit(false)?;
        builder.store_int(self.workchain as i64, 8)?;
        builder.store_bytes(&self.hash)
    }

    pub(crate) fn load_from(slice: &mut CellSlice<'_>) -> Result<Option<Self>> {
        match slice.load_uint(2)? {
            TAG_NONE => Ok(None),
            TAG_STD => {
                if slice.load_bit()? {
                    return Err(SbtError::InvalidArgument(
                        "anycast addresses are not supported".to_string(),
                    ));
                }
                let workchain = slice.load_int(8)? as i8;
                let bytes = slice.load_bytes(32)?;
                let mut hash = [0u8; 32];
                hash.copy_from_slice(&bytes);
                Ok(Some(Self { workchain, hash }))
            }
            tag => Err(SbtError::InvalidArgument(format!(
                "unsupported address tag 0b{:02b}",
                tag
            ))),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.workchain, hex::encode(self.hash))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = SbtError;

    fn from_str(s: &str) -> Result<Self> {
        let (wc, hash_hex) = s.split_once(':').ok_or_else(|| {
            SbtError::InvalidArgument(format!("address '{}' is not in <wc>:<hex> form", s))
        })?;
        let workchain = wc
            .parse::<i8>()
            .map_err(|e| SbtError::InvalidArgument(format!("bad workchain '{}': {}", wc, e)))?;
        let mut hash = [0u8; 32];
        hex::decode_to_slice(hash_hex, &mut hash)
            .map_err(|e| SbtError::InvalidArgument(format!("bad address hash: {}", e)))?;
        Ok(Self { workchain, hash })
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
