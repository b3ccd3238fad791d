//! Configuration for chainkv
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, StoreError};

/// Main configuration for a KeyValueStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Table Configuration
    // -------------------------------------------------------------------------
    /// Number of buckets. Fixed for the lifetime of the table; the
    /// table never rehashes, so this bounds how short chains stay.
    pub bucket_count: usize,

    // -------------------------------------------------------------------------
    // Text Persistence Configuration
    // -------------------------------------------------------------------------
    /// Separator between key and value in the text format
    pub text_delimiter: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_count: 16,
            text_delimiter: '=',
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config can back a table
    pub fn validate(&self) -> Result<()> {
        if self.bucket_count == 0 {
            return Err(StoreError::Config(
                "bucket_count must be at least 1".to_string(),
            ));
        }

        if matches!(self.text_delimiter, '\n' | '\r') {
            return Err(StoreError::Config(format!(
                "text_delimiter {:?} collides with the line terminator",
                self.text_delimiter
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
    /// Set the number of buckets
    pub fn bucket_count(mut self, count: usize) -> Self {
        self.config.bucket_count = count;
        self
    }

    /// Set the key/value separator used by the text format
    pub fn text_delimiter(mut self, delimiter: char) -> Self {
        self.config.text_delimiter = delimiter;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
