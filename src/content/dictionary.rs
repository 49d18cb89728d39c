//! Content dictionary
//!
//! Ordered mapping from field key to the snake-encoded field value.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellBuilder, U256};
use crate::error::{Result, SbtError};
use crate::snake;

use super::hashmap::{build_hashmap, parse_hashmap, BitKey};
use super::key::key_of;

/// Prefix marking content stored directly in the dictionary
pub const ONCHAIN_CONTENT_PREFIX: i64 = 0x00;

/// Prefix of the off-chain (URI) content layout, recognized but not decoded
pub const OFFCHAIN_CONTENT_PREFIX: i64 = 0x01;

const KEY_BITS: usize = 256;

/// A single dictionary value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Field name, when known; parsed dictionaries only carry keys
    pub name: Option<String>,
    /// Root of the snake chain holding the value
    pub value: Arc<Cell>,
}

/// Keyed on-chain content, iterated in ascending key order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDictionary {
    entries: BTreeMap<U256, ContentEntry>,
}

impl ContentDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(name, text)` pairs
    pub fn from_fields<I, K, V>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut dict = Self::new();
        for (name, value) in fields {
            dict.insert(name.as_ref(), value.as_ref())?;
        }
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snake-encode `text` and store it under `key_of(name)`
    pub fn insert(&mut self, name: &str, text: &str) -> Result<U256> {
        let value = snake::encode(text.as_bytes())?;
        self.insert_cell(name, Arc::new(value))
    }

    /// Store an already encoded value.
    ///
    /// Fails if the key is taken, whether by the same name or by a colliding one.
    pub fn insert_cell(&mut self, name: &str, value: Arc<Cell>) -> Result<U256> {
        let key = key_of(name);
        if let Some(existing) = self.entries.get(&key) {
            let reason = match existing.name.as_deref() {
                Some(other) if other == name => format!("field '{}' is already set", name),
                Some(other) => format!("field '{}' collides with '{}' on key {}", name, other, key),
                None => format!("field '{}' maps to an existing key {}", name, key),
            };
            return Err(SbtError::InvalidArgument(reason));
        }

        tracing::debug!(field = name, key = %key, "Inserting content field");
        self.entries.insert(
            key,
            ContentEntry {
                name: Some(name.to_string()),
                value,
            },
        );
        Ok(key)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Cell>> {
        self.get_by_key(&key_of(name))
    }

    pub fn get_by_key(&self, key: &U256) -> Option<&Arc<Cell>> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Decode a field's value as UTF-8 text
    pub fn get_text(&self, name: &str) -> Result<Option<String>> {
        self.get(name).map(|cell| snake::decode_string(cell)).transpose()
    }

    pub fn keys(&self) -> impl Iterator<Item = &U256> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&U256, &ContentEntry)> {
        self.entries.iter()
    }

    /// Serialize as `prefix:int8 = 0` followed by `HashmapE 256 ^Cell`
    pub fn to_cell(&self) -> Result<Cell> {
        let entries: Vec<(BitKey, Arc<Cell>)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key_bits(key), Arc::clone(&entry.value)))
            .collect();

        let root = build_hashmap(&entries, KEY_BITS)?;

        let mut builder = CellBuilder::new();
        builder.store_int(ONCHAIN_CONTENT_PREFIX, 8)?;
        builder.store_maybe_ref(root.map(Arc::new))?;

        tracing::debug!(fields = self.entries.len(), "Built on-chain content cell");
        Ok(builder.build())
    }

    /// Parse an on-chain content cell; names are not recoverable from keys
    pub fn from_cell(cell: &Cell) -> Result<Self> {
        let mut slice = cell.parse();
        let prefix = slice.load_int(8)?;
        if prefix != ONCHAIN_CONTENT_PREFIX {
            return Err(SbtError::InvalidArgument(format!(
                "content prefix {} is not on-chain ({})",
                prefix, ONCHAIN_CONTENT_PREFIX
            )));
        }

        let mut entries = BTreeMap::new();
        if let Some(root) = slice.load_maybe_ref()? {
            for (bits, value) in parse_hashmap(root, KEY_BITS)? {
                entries.insert(key_from_bits(&bits), ContentEntry { name: None, value });
            }
        }
        Ok(Self { entries })
    }
}

/// Build the serialized content cell for a set of text fields
pub fn build_onchain_content<I, K, V>(fields: I) -> Result<Cell>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    ContentDictionary::from_fields(fields)?.to_cell()
}

/// Typed metadata record for a diploma item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnchainMetadata {
    pub name: String,
    pub student: String,
    pub educational_stream_number: String,
    pub description: String,
    pub image: String,
}

impl OnchainMetadata {
    /// `(field name, value)` pairs in declaration order
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("name", self.name.as_str()),
            ("student", self.student.as_str()),
            ("educational_stream_number", self.educational_stream_number.as_str()),
            ("description", self.description.as_str()),
            ("image", self.image.as_str()),
        ]
    }

    pub fn to_dictionary(&self) -> Result<ContentDictionary> {
        ContentDictionary::from_fields(self.fields())
    }

    /// Build the serialized content cell
    pub fn to_cell(&self) -> Result<Cell> {
        self.to_dictionary()?.to_cell()
    }

    /// Read the record back from a parsed dictionary; every field must be present
    pub fn from_dictionary(dict: &ContentDictionary) -> Result<Self> {
        let field = |name: &str| -> Result<String> {
            dict.get_text(name)?.ok_or_else(|| {
                SbtError::InvalidArgument(format!("content is missing field '{}'", name))
            })
        };
        Ok(Self {
            name: field("name")?,
            student: field("student")?,
            educational_stream_number: field("educational_stream_number")?,
            description: field("description")?,
            image: field("image")?,
        })
    }
}

/// Read a JSON file holding an [`OnchainMetadata`] record
pub fn load_metadata(path: &Path) -> Result<OnchainMetadata> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| SbtError::Serialization(format!("{}: {}", path.display(), e)))
}

/// Read a JSON object of string fields, e.g. `{"name": "...", "image": "..."}`
pub fn load_fields(path: &Path) -> Result<BTreeMap<String, String>> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| SbtError::Serialization(format!("{}: {}", path.display(), e)))
}

fn key_bits(key: &U256) -> BitKey {
    (0..KEY_BITS).map(|i| key.bit(i)).collect()
}

fn key_from_bits(bits: &[bool]) -> U256 {
    let mut bytes = [0u8; 32];
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            bytes[i / 8] |= 0x80 >> (i % 8);
        }
    }
    U256::from_be_bytes(bytes)
}
