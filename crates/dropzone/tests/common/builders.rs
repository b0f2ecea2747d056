//! Builders for creating test data without repetitive boilerplate.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};

use dropzone::{FileDescriptor, FileRecord, FileStatus};

/// Builder for `FileDescriptor` instances.
pub struct DescriptorBuilder {
    name: String,
    size: u64,
    mime_type: String,
}

impl DescriptorBuilder {
    /// A 1 KiB PNG image.
    pub fn new() -> Self {
        Self {
            name: "photo.png".to_string(),
            size: 1024,
            mime_type: "image/png".to_string(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn mime_type(mut self, mime_type: &str) -> Self {
        self.mime_type = mime_type.to_string();
        self
    }

    pub fn build(self) -> FileDescriptor {
        FileDescriptor::new(&self.name, self.size, &self.mime_type)
    }
}

impl Default for DescriptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for seeded `FileRecord` instances.
pub struct RecordBuilder {
    record: FileRecord,
}

impl RecordBuilder {
    pub fn new(id: &str) -> Self {
        let mut record = FileRecord::pending(id.to_string(), &DescriptorBuilder::new().build());
        record.created_at = fixed_time();
        Self { record }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.record.name = name.to_string();
        self
    }

    pub fn mime_type(mut self, mime_type: &str) -> Self {
        self.record.mime_type = mime_type.to_string();
        self
    }

    pub fn status(mut self, status: FileStatus) -> Self {
        self.record.status = status;
        self
    }

    pub fn progress(mut self, progress: u8) -> Self {
        self.record.progress = progress;
        self
    }

    /// Shifts `createdAt` by `minutes` relative to the builder's base time.
    pub fn created_minutes_after(mut self, minutes: i64) -> Self {
        self.record.created_at = fixed_time() + Duration::minutes(minutes);
        self
    }

    pub fn build(self) -> FileRecord {
        self.record
    }
}

fn fixed_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-15T10:00:00Z")
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
