//! File records and the descriptors they are created from.

pub mod format;
pub mod links;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use format::format_file_size;
pub use links::{derive_links, DerivedLinks};

/// Metadata of a file selected by the caller, before it enters the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl FileDescriptor {
    pub fn new(name: &str, size: u64, mime_type: &str) -> Self {
        Self {
            name: name.to_string(),
            size,
            mime_type: mime_type.to_string(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Lifecycle state of a file record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Uploading,
    Completed,
    Error,
    Cancelled,
}

impl FileStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            FileStatus::Completed | FileStatus::Error | FileStatus::Cancelled
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Pending => "pending",
            FileStatus::Uploading => "uploading",
            FileStatus::Completed => "completed",
            FileStatus::Error => "error",
            FileStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One uploaded or in-progress file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub status: FileStatus,
    /// Always within `0..=100`.
    pub progress: u8,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    /// Builds a fresh `pending` record for a descriptor.
    pub fn pending(id: String, descriptor: &FileDescriptor) -> Self {
        Self {
            id,
            name: descriptor.name.clone(),
            size: descriptor.size,
            mime_type: descriptor.mime_type.clone(),
            status: FileStatus::Pending,
            progress: 0,
            url: None,
            thumbnail_url: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Partial update applied through the store. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl RecordPatch {
    pub fn status(status: FileStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn progress(status: FileStatus, progress: u8) -> Self {
        Self {
            status: Some(status),
            progress: Some(progress),
            ..Self::default()
        }
    }

    pub fn with_links(mut self, links: DerivedLinks) -> Self {
        self.url = Some(links.url);
        self.thumbnail_url = links.thumbnail_url;
        self
    }
}
