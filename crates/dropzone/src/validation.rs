//! Descriptor validation, run before a file enters the store.

use std::collections::HashSet;

use crate::config::Config;
use crate::error::{DropzoneError, Result};
use crate::record::FileDescriptor;

/// Size ceiling plus MIME allow-list.
#[derive(Debug, Clone)]
pub struct Validator {
    max_size_bytes: u64,
    allowed_types: HashSet<String>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl Validator {
    pub fn new(max_size_bytes: u64, allowed_types: &[String]) -> Self {
        Self {
            max_size_bytes,
            allowed_types: allowed_types.iter().cloned().collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_size_bytes, &config.allowed_types)
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Checks size first, then type.
    pub fn validate(&self, descriptor: &FileDescriptor) -> Result<()> {
        if descriptor.size > self.max_size_bytes {
            return Err(DropzoneError::SizeExceeded {
                size: descriptor.size,
                limit: self.max_size_bytes,
            });
        }

        if !self.is_allowed(&descriptor.mime_type) {
            return Err(DropzoneError::UnsupportedType(descriptor.mime_type.clone()));
        }

        Ok(())
    }

    /// Exact match against the allow-list; no case folding or parameter stripping.
    pub fn is_allowed(&self, mime_type: &str) -> bool {
        self.allowed_types.contains(mime_type)
    }
}
