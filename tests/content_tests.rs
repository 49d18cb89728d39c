//! Tests for key derivation and the on-chain content dictionary
//!
//! These tests verify:
//! - Keys are SHA-256 of the field name, big-endian
//! - One entry per field, ascending key order, values as snake chains
//! - Byte-identical output for identical fields
//! - Duplicate keys are rejected rather than overwritten
//! - Known-answer hashes for the single-field and diploma layouts
//! - Loading fields and typed metadata from JSON files

use std::collections::BTreeMap;
use std::io::Write;

use sbtcell::boc::serialize_boc;
use sbtcell::content::{
    build_onchain_content, key_of, load_fields, load_metadata, ContentDictionary, OnchainMetadata,
    ONCHAIN_CONTENT_PREFIX,
};
use sbtcell::snake;
use sbtcell::{CellBuilder, SbtError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn diploma_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "TON DEV STUDY Diploma"),
        ("student", "@cornzange"),
        ("educational_stream_number", "2"),
        ("image", "http:://link.com"),
        ("description", "something you can change"),
    ]
}

fn diploma_metadata() -> OnchainMetadata {
    OnchainMetadata {
        name: "TON DEV STUDY Diploma".to_string(),
        student: "@cornzange".to_string(),
        educational_stream_number: "2".to_string(),
        description: "something you can change".to_string(),
        image: "http:://link.com".to_string(),
    }
}

// =============================================================================
// Key Tests
// =============================================================================

#[test]
fn test_key_of_is_sha256_big_endian() {
    let key = key_of("name");
    assert_eq!(
        hex::encode(key.as_bytes()),
        "82a3537ff0dbce7eec35d69edc3a189ee6f17d82f353a553f9aa96cb0be3ce89"
    );
    assert_eq!(key_of("name"), key);
    assert_ne!(key_of("Name"), key);
}

// =============================================================================
// Dictionary Tests
// =============================================================================

#[test]
fn test_single_field_scenario() {
    let cell = build_onchain_content([("name", "y")]).unwrap();

    let mut s = cell.parse();
    assert_eq!(s.load_int(8).unwrap(), ONCHAIN_CONTENT_PREFIX);
    assert!(s.load_bit().unwrap());
    assert_eq!(s.remaining_bits(), 0);
    assert_eq!(s.remaining_refs(), 1);

    let parsed = ContentDictionary::from_cell(&cell).unwrap();
    let keys: Vec<_> = parsed.keys().copied().collect();
    assert_eq!(keys, vec![key_of("name")]);
    assert_eq!(parsed.get_text("name").unwrap().as_deref(), Some("y"));
}

#[test]
fn test_empty_dictionary() {
    let cell = ContentDictionary::new().to_cell().unwrap();
    assert_eq!(cell.bit_len(), 9);
    assert!(cell.refs().is_empty());
    assert!(ContentDictionary::from_cell(&cell).unwrap().is_empty());
}

#[test]
fn test_entries_in_ascending_key_order() {
    let dict = ContentDictionary::from_fields(diploma_fields()).unwrap();
    let cell = dict.to_cell().unwrap();
    let parsed = ContentDictionary::from_cell(&cell).unwrap();

    let keys: Vec<_> = parsed.keys().copied().collect();
    let mut expected: Vec<_> = diploma_fields().iter().map(|(n, _)| key_of(n)).collect();
    expected.sort();
    assert_eq!(keys, expected);

    for (name, value) in diploma_fields() {
        assert_eq!(parsed.get_text(name).unwrap().as_deref(), Some(value));
    }
}

#[test]
fn test_output_independent_of_insertion_order() {
    let forward = build_onchain_content(diploma_fields()).unwrap();
    let reversed = build_onchain_content(diploma_fields().into_iter().rev()).unwrap();
    assert_eq!(serialize_boc(&forward), serialize_boc(&reversed));
}

#[test]
fn test_long_value_is_chained() {
    let long = "x".repeat(400);
    let dict = ContentDictionary::from_fields([("description", long.as_str())]).unwrap();
    let value = dict.get("description").unwrap();
    assert_eq!(value.refs().len(), 1);
    assert_eq!(snake::decode_string(value).unwrap(), long);
}

#[test]
fn test_duplicate_field_is_rejected() {
    let mut dict = ContentDictionary::new();
    dict.insert("name", "first").unwrap();
    let result = dict.insert("name", "second");
    assert!(matches!(result, Err(SbtError::InvalidArgument(_))));
    assert_eq!(dict.get_text("name").unwrap().as_deref(), Some("first"));
}

#[test]
fn test_missing_field() {
    let dict = ContentDictionary::from_fields(diploma_fields()).unwrap();
    assert!(dict.get("unknown").is_none());
    assert_eq!(dict.get_text("unknown").unwrap(), None);
}

#[test]
fn test_offchain_prefix_is_rejected() {
    let mut b = CellBuilder::new();
    b.store_int(1, 8).unwrap();
    b.store_bytes(b"https://example.com/meta.json").unwrap();
    let cell = b.build();
    assert!(matches!(
        ContentDictionary::from_cell(&cell),
        Err(SbtError::InvalidArgument(_))
    ));
}

// =============================================================================
// Known-Answer Tests
// =============================================================================
// Representation hashes computed by an independent TL-B serializer.

#[test]
fn test_single_field_known_hash() {
    let cell = build_onchain_content([("name", "y")]).unwrap();
    assert_eq!(
        hex::encode(cell.hash()),
        "74a4194669c3a4bbce5be3da18e642fb1cf6610001d3fbc19c86500b8f8bcd8d"
    );
}

#[test]
fn test_single_field_root_edge_uses_long_label() {
    let cell = build_onchain_content([("name", "y")]).unwrap();
    let root = cell.reference(0).unwrap();

    // hml_long: tag 10, 9-bit length 256, then the full key
    assert_eq!(root.bit_len(), 2 + 9 + 256);
    assert_eq!(root.refs().len(), 1);
    let mut s = root.parse();
    assert_eq!(s.load_uint(2).unwrap(), 0b10);
    assert_eq!(s.load_uint(9).unwrap(), 256);
    assert_eq!(s.load_u256().unwrap(), key_of("name"));
    assert!(s.is_exhausted());
}

#[test]
fn test_diploma_known_hash() {
    let cell = build_onchain_content(diploma_fields()).unwrap();
    assert_eq!(
        hex::encode(cell.hash()),
        "bd8957c2ef306a99103d89289b80ec13a1449e8510a7ea714017ccc452b5d18f"
    );
}

// =============================================================================
// Field File Tests
// =============================================================================

#[test]
fn test_load_fields_from_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meta.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, r#"{{"name": "Diploma", "image": "https://img"}}"#).unwrap();

    let fields = load_fields(&path).unwrap();
    let mut expected = BTreeMap::new();
    expected.insert("image".to_string(), "https://img".to_string());
    expected.insert("name".to_string(), "Diploma".to_string());
    assert_eq!(fields, expected);

    let dict = ContentDictionary::from_fields(&fields).unwrap();
    assert_eq!(dict.len(), 2);
}

#[test]
fn test_load_fields_rejects_non_string_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meta.json");
    std::fs::write(&path, r#"{"name": 5}"#).unwrap();
    assert!(matches!(load_fields(&path), Err(SbtError::Serialization(_))));
}

#[test]
fn test_load_fields_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        load_fields(&dir.path().join("absent.json")),
        Err(SbtError::Io(_))
    ));
}

#[test]
fn test_load_metadata_from_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("diploma.json");
    std::fs::write(
        &path,
        r#"{
            "name": "TON DEV STUDY Diploma",
            "student": "@cornzange",
            "educational_stream_number": "2",
            "description": "something you can change",
            "image": "http:://link.com"
        }"#,
    )
    .unwrap();

    let metadata = load_metadata(&path).unwrap();
    assert_eq!(metadata, diploma_metadata());
    assert_eq!(
        metadata.to_cell().unwrap(),
        build_onchain_content(diploma_fields()).unwrap()
    );
}

#[test]
fn test_load_metadata_requires_every_field() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.json");
    std::fs::write(&path, r#"{"name": "Diploma", "image": "https://img"}"#).unwrap();
    assert!(matches!(load_metadata(&path), Err(SbtError::Serialization(_))));
}

#[test]
fn test_metadata_round_trip_through_dictionary() {
    let cell = diploma_metadata().to_cell().unwrap();
    let dict = ContentDictionary::from_cell(&cell).unwrap();
    assert_eq!(OnchainMetadata::from_dictionary(&dict).unwrap(), diploma_metadata());

    let partial = ContentDictionary::from_fields([("name", "x")]).unwrap();
    assert!(matches!(
        OnchainMetadata::from_dictionary(&partial),
        Err(SbtError::InvalidArgument(_))
    ));
}
