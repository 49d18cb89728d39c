//! Tests for chunk splitting and snake encoding
//!
//! These tests verify:
//! - Round-trip for empty, short, exact-multiple and long buffers
//! - Chain shape: one chunk per cell, reference 0 to the next
//! - Chunk bound and determinism
//! - Known-answer hash for a two-cell chain
//! - Capacity errors for oversized chunks and over-deep chains

use sbtcell::cell::Cell;
use sbtcell::snake::{self, split, SnakeEncoder, CHUNK_SIZE};
use sbtcell::{Config, SbtError};

// =============================================================================
// Helper Functions
// =============================================================================

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

/// Payload sizes along the chain, root first
fn chain_lengths(root: &Cell) -> Vec<usize> {
    let mut lens = Vec::new();
    let mut current = Some(root);
    while let Some(cell) = current {
        assert!(cell.refs().len() <= 1);
        lens.push(cell.bit_len() / 8);
        current = cell.reference(0).map(|r| r.as_ref());
    }
    lens
}

// =============================================================================
// Splitter Tests
// =============================================================================

#[test]
fn test_split_scenario_two_chunks() {
    let data = "abc".repeat(50);
    let chunks = split(data.as_bytes(), 127).unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].len(), 127);
    assert_eq!(chunks[1].len(), 23);
    assert_eq!(chunks.concat(), data.as_bytes());
}

#[test]
fn test_split_chunk_bound() {
    let data = pattern(1000);
    let chunks = split(&data, CHUNK_SIZE).unwrap();
    let (last, full) = chunks.split_last().unwrap();
    assert!(full.iter().all(|c| c.len() == CHUNK_SIZE));
    assert!(last.len() <= CHUNK_SIZE && !last.is_empty());
}

#[test]
fn test_split_rejects_zero_chunk_size() {
    assert!(matches!(split(b"x", 0), Err(SbtError::InvalidArgument(_))));
}

// =============================================================================
// Encoder Tests
// =============================================================================

#[test]
fn test_encode_round_trip_sizes() {
    for len in [0, 1, 126, 127, 128, 254, 255, 381, 1000, 5000] {
        let data = pattern(len);
        let root = snake::encode(&data).unwrap();
        assert_eq!(snake::decode(&root).unwrap(), data, "length {}", len);
    }
}

#[test]
fn test_encode_empty_is_empty_cell() {
    let root = snake::encode(&[]).unwrap();
    assert!(root.is_empty());
    assert_eq!(root, Cell::empty());
}

#[test]
fn test_encode_single_chunk_has_no_reference() {
    let root = snake::encode(b"hi").unwrap();
    assert_eq!(root.bit_len(), 16);
    assert!(root.refs().is_empty());
    assert_eq!(root.data(), b"hi");
}

#[test]
fn test_encode_chain_shape() {
    assert_eq!(chain_lengths(&snake::encode(&pattern(127)).unwrap()), vec![127]);
    assert_eq!(chain_lengths(&snake::encode(&pattern(254)).unwrap()), vec![127, 127]);
    assert_eq!(
        chain_lengths(&snake::encode(&pattern(300)).unwrap()),
        vec![127, 127, 46]
    );
}

#[test]
fn test_encode_is_deterministic() {
    let data = pattern(777);
    let a = snake::encode(&data).unwrap();
    let b = snake::encode(&data).unwrap();
    assert_eq!(a.hash(), b.hash());
}

#[test]
fn test_decode_string_rejects_invalid_utf8() {
    let root = snake::encode(&[0xC3, 0x28]).unwrap();
    assert!(matches!(
        snake::decode_string(&root),
        Err(SbtError::InvalidArgument(_))
    ));
}

#[test]
fn test_decode_string_multibyte_across_chunks() {
    let text = "é".repeat(200);
    let root = snake::encode(text.as_bytes()).unwrap();
    assert_eq!(snake::decode_string(&root).unwrap(), text);
}

#[test]
fn test_custom_chunk_size_from_config() {
    let config = Config::builder().chunk_size(10).build().unwrap();
    let encoder = SnakeEncoder::from_config(&config);
    let root = encoder.encode(&pattern(25)).unwrap();
    assert_eq!(chain_lengths(&root), vec![10, 10, 5]);
    assert_eq!(snake::decode(&root).unwrap(), pattern(25));
}

#[test]
fn test_two_cell_chain_known_hash() {
    // 150 bytes: 127 in the root, 23 in the tail; hash from an independent TL-B serializer
    let data = "abc".repeat(50);
    let root = snake::encode(data.as_bytes()).unwrap();
    assert_eq!(chain_lengths(&root), vec![127, 23]);
    assert_eq!(root.depth(), 1);
    assert_eq!(
        hex::encode(root.hash()),
        "fdb415c5a73ef772316b482db3aff690792be60407dc3ca158dddc06227a142c"
    );
}

#[test]
fn test_oversized_chunk_is_capacity_error() {
    let encoder = SnakeEncoder::with_chunk_size(128);
    assert!(matches!(
        encoder.encode(&pattern(128)),
        Err(SbtError::CapacityExceeded(_))
    ));
}

#[test]
fn test_too_long_chain_is_capacity_error() {
    let data = pattern(CHUNK_SIZE * 1026);
    assert!(matches!(
        snake::encode(&data),
        Err(SbtError::CapacityExceeded(_))
    ));
}

#[test]
fn test_config_rejects_bad_chunk_sizes() {
    assert!(matches!(
        Config::builder().chunk_size(0).build(),
        Err(SbtError::Config(_))
    ));
    assert!(Config::builder().chunk_size(128).build().is_err());
}
