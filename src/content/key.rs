//! Dictionary key derivation

use sha2::{Digest, Sha256};

use crate::cell::U256;
use crate::error::{Result, SbtError};

/// Key of a content field: SHA-256 of the UTF-8 name, read big-endian
pub fn key_of(name: &str) -> U256 {
    let digest: [u8; 32] = Sha256::digest(name.as_bytes()).into();
    U256::from_be_bytes(digest)
}

/// Like [`key_of`], for names that have not been validated as UTF-8 yet
pub fn key_of_bytes(name: &[u8]) -> Result<U256> {
    let name = std::str::from_utf8(name)
        .map_err(|e| SbtError::InvalidArgument(format!("field name is not UTF-8: {}", e)))?;
    Ok(key_of(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digest() {
        assert_eq!(
            key_of("name").to_string(),
            "0x82a3537ff0dbce7eec35d69edc3a189ee6f17d82f353a553f9aa96cb0be3ce89"
        );
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(key_of_bytes(&[0xff, 0xfe]).is_err());
    }
}
