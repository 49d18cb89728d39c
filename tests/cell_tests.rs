//! Tests for the cell model and bag-of-cells container
//!
//! These tests verify:
//! - Capacity limits on bits, references and depth
//! - Integer range checks and two's complement round-trips
//! - Representation hashes against known values
//! - Bag-of-cells serialization and corruption detection

use std::sync::Arc;

use sbtcell::boc::{deserialize_boc, from_hex, serialize_boc, to_hex};
use sbtcell::cell::{Cell, CellBuilder, MAX_BITS, MAX_REFS};
use sbtcell::{Address, SbtError, U256};

// =============================================================================
// Helper Functions
// =============================================================================

fn byte_cell(byte: u8) -> Cell {
    let mut b = CellBuilder::new();
    b.store_uint(byte as u64, 8).unwrap();
    b.build()
}

// =============================================================================
// Builder Capacity Tests
// =============================================================================

#[test]
fn test_builder_accepts_full_cell() {
    let mut b = CellBuilder::new();
    b.store_bytes(&[0xAB; 127]).unwrap();
    b.store_uint(0b1010101, 7).unwrap();
    assert_eq!(b.bit_len(), MAX_BITS);
    assert!(matches!(b.store_bit(true), Err(SbtError::CapacityExceeded(_))));
}

#[test]
fn test_builder_rejects_fifth_reference() {
    let mut b = CellBuilder::new();
    for i in 0..MAX_REFS {
        b.store_ref(byte_cell(i as u8)).unwrap();
    }
    let result = b.store_ref(Cell::empty());
    assert!(matches!(result, Err(SbtError::CapacityExceeded(_))));
}

#[test]
fn test_builder_rejects_oversized_uint() {
    let mut b = CellBuilder::new();
    let result = b.store_uint(256, 8);
    assert!(matches!(result, Err(SbtError::InvalidArgument(_))));
    assert_eq!(b.bit_len(), 0);
}

#[test]
fn test_signed_values_round_trip() {
    let mut b = CellBuilder::new();
    b.store_int(-1, 8).unwrap();
    b.store_int(-128, 8).unwrap();
    b.store_int(127, 8).unwrap();
    b.store_int(-5, 13).unwrap();
    let cell = b.build();

    assert_eq!(cell.data()[0], 0xFF);
    let mut s = cell.parse();
    assert_eq!(s.load_int(8).unwrap(), -1);
    assert_eq!(s.load_int(8).unwrap(), -128);
    assert_eq!(s.load_int(8).unwrap(), 127);
    assert_eq!(s.load_int(13).unwrap(), -5);
    assert!(s.is_exhausted());
}

#[test]
fn test_signed_value_out_of_range() {
    let mut b = CellBuilder::new();
    assert!(b.store_int(128, 8).is_err());
    assert!(b.store_int(-129, 8).is_err());
}

#[test]
fn test_unaligned_bytes_round_trip() {
    let mut b = CellBuilder::new();
    b.store_bit(true).unwrap();
    b.store_bytes(b"snake").unwrap();
    let cell = b.build();

    let mut s = cell.parse();
    assert!(s.load_bit().unwrap());
    assert_eq!(s.load_bytes(5).unwrap(), b"snake");
}

#[test]
fn test_slice_underflow() {
    let cell = byte_cell(1);
    let mut s = cell.parse();
    assert!(matches!(s.load_uint(9), Err(SbtError::CellUnderflow(_))));
    assert!(matches!(s.load_ref(), Err(SbtError::CellUnderflow(_))));
}

#[test]
fn test_depth_limit() {
    let mut cell = Cell::empty();
    for _ in 0..1024 {
        let mut b = CellBuilder::new();
        b.store_ref(cell).unwrap();
        cell = b.build();
    }
    assert_eq!(cell.depth(), 1024);

    let mut b = CellBuilder::new();
    assert!(matches!(b.store_ref(cell), Err(SbtError::CapacityExceeded(_))));
}

// =============================================================================
// Hash Tests
// =============================================================================

#[test]
fn test_empty_cell_hash() {
    assert_eq!(
        hex::encode(Cell::empty().hash()),
        "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
    );
}

#[test]
fn test_hash_covers_references() {
    let mut a = CellBuilder::new();
    a.store_ref(byte_cell(1)).unwrap();
    let mut b = CellBuilder::new();
    b.store_ref(byte_cell(2)).unwrap();
    assert_ne!(a.build(), b.build());
}

// =============================================================================
// Address Tests
// =============================================================================

#[test]
fn test_address_round_trip() {
    let raw = "-1:3333333333333333333333333333333333333333333333333333333333333333";
    let addr: Address = raw.parse().unwrap();
    assert_eq!(addr.workchain, -1);
    assert_eq!(addr.to_string(), raw);

    let mut b = CellBuilder::new();
    b.store_address(Some(&addr)).unwrap();
    b.store_address(None).unwrap();
    let cell = b.build();
    assert_eq!(cell.bit_len(), 267 + 2);

    let mut s = cell.parse();
    assert_eq!(s.load_address().unwrap(), Some(addr));
    assert_eq!(s.load_address().unwrap(), None);
}

#[test]
fn test_address_rejects_bad_text() {
    assert!("0:abcd".parse::<Address>().is_err());
    assert!("zero:00".parse::<Address>().is_err());
    assert!("no-colon".parse::<Address>().is_err());
}

#[test]
fn test_u256_ordering_is_numeric() {
    let small = U256::from(1u64);
    let large: U256 = "0x0100000000000000".parse().unwrap();
    assert!(small < large);
    assert_eq!(large.to_u64(), Some(1 << 56));
}

// =============================================================================
// Bag of Cells Tests
// =============================================================================

#[test]
fn test_empty_cell_boc_matches_reference() {
    assert_eq!(
        to_hex(&Cell::empty()),
        "b5ee9c724101010100020000004cacb9cd"
    );
}

#[test]
fn test_boc_round_trip_with_shared_cells() {
    let shared = Arc::new(byte_cell(42));
    let mut left = CellBuilder::new();
    left.store_ref(Arc::clone(&shared)).unwrap();
    let left = left.build();

    let mut root = CellBuilder::new();
    root.store_bit(true).unwrap();
    root.store_ref(left).unwrap();
    root.store_ref(Arc::clone(&shared)).unwrap();
    let root = root.build();

    let bytes = serialize_boc(&root);
    let parsed = deserialize_boc(&bytes).unwrap();
    assert_eq!(parsed, root);
    assert_eq!(parsed.bit_len(), 1);
    assert_eq!(parsed.refs().len(), 2);
    // the shared cell is stored once: root, left, shared
    assert_eq!(bytes[6], 3);
}

#[test]
fn test_boc_detects_corruption() {
    let mut bytes = serialize_boc(&byte_cell(7));
    let last = bytes.len() - 5;
    bytes[last] ^= 0xFF;
    assert!(matches!(
        deserialize_boc(&bytes),
        Err(SbtError::InvalidArgument(_))
    ));
}

#[test]
fn test_boc_rejects_bad_magic_and_truncation() {
    assert!(deserialize_boc(&[0, 1, 2, 3, 4, 5]).is_err());
    let bytes = serialize_boc(&byte_cell(7));
    assert!(deserialize_boc(&bytes[..bytes.len() - 6]).is_err());
    assert!(from_hex("not hex").is_err());
}
