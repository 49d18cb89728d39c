//! Configuration for sbtcell
//!
//! Centralized configuration with sensible defaults.

use crate::cell::MAX_BITS;
use crate::error::{Result, SbtError};

/// Largest chunk that still fits a single cell's data bits
pub const MAX_CHUNK_SIZE: usize = MAX_BITS / 8;

/// Main configuration for encoding and message building
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Content Configuration
    // -------------------------------------------------------------------------
    /// Bytes stored per snake cell
    pub chunk_size: usize,

    // -------------------------------------------------------------------------
    // Deployment Configuration
    // -------------------------------------------------------------------------
    /// Workchain used when deriving contract addresses
    pub workchain: i8,

    // -------------------------------------------------------------------------
    // Message Configuration
    // -------------------------------------------------------------------------
    /// Query id stamped on outgoing messages
    pub query_id: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: MAX_CHUNK_SIZE,
            workchain: 0,
            query_id: 1,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the values can actually be encoded
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(SbtError::Config("chunk_size must be at least 1".to_string()));
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(SbtError::Config(format!(
                "chunk_size {} exceeds cell capacity of {} bytes",
                self.chunk_size, MAX_CHUNK_SIZE
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the snake chunk size (in bytes)
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the workchain for address derivation
    pub fn workchain(mut self, workchain: i8) -> Self {
        self.config.workchain = workchain;
        self
    }

    /// Set the query id for outgoing messages
    pub fn query_id(mut self, query_id: u64) -> Self {
        self.config.query_id = query_id;
        self
    }

    /// Finish building, rejecting unusable values
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
