//! Chunk splitting

use crate::config::MAX_CHUNK_SIZE;
use crate::error::{Result, SbtError};

/// Bytes per snake cell
pub const CHUNK_SIZE: usize = MAX_CHUNK_SIZE;

/// Split `buffer` left-to-right into chunks of `chunk_size` bytes.
///
/// Only the last chunk may be shorter. An empty buffer yields no chunks.
pub fn split(buffer: &[u8], chunk_size: usize) -> Result<Vec<&[u8]>> {
    if chunk_size == 0 {
        return Err(SbtError::InvalidArgument(
            "chunk size must be at least 1".to_string(),
        ));
    }
    Ok(buffer.chunks(chunk_size).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_with_short_tail() {
        let data = "abc".repeat(50);
        let chunks = split(data.as_bytes(), CHUNK_SIZE).unwrap();
        let lens: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(lens, vec![127, 23]);
    }

    #[test]
    fn empty_buffer_has_no_chunks() {
        assert!(split(&[], CHUNK_SIZE).unwrap().is_empty());
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(split(b"abc", 0).is_err());
    }
}
