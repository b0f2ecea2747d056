use std::path::PathBuf;
use thiserror::Error;

use crate::record::FileStatus;

#[derive(Error, Debug)]
pub enum DropzoneError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("File size {size} bytes exceeds the {limit} byte limit")]
    SizeExceeded { size: u64, limit: u64 },

    #[error("File type {0} is not supported")]
    UnsupportedType(String),

    #[error("Store failure: {0}")]
    StoreFailure(String),

    #[error("Invalid status transition for {id}: {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: FileStatus,
        to: FileStatus,
    },

    #[error("Cannot share incomplete file: {0}")]
    IncompleteFile(String),
}

impl DropzoneError {
    pub(crate) fn file_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "File",
            id: id.to_string(),
        }
    }

    pub(crate) fn session_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "Upload session",
            id: id.to_string(),
        }
    }

    /// Returns true for errors raised by descriptor validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::SizeExceeded { .. } | Self::UnsupportedType(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

pub type Result<T> = std::result::Result<T, DropzoneError>;
