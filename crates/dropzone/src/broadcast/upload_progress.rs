//! Upload progress broadcaster for real-time status streaming.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::record::{FileRecord, FileStatus};

/// Progress event for one upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadProgressEvent {
    pub file_id: String,
    pub filename: String,
    pub status: FileStatus,
    pub progress: u8,
    /// Human-readable description of the step.
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Download URL (set on completion).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Error message (set on failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadProgressEvent {
    /// Creates an event from a record snapshot.
    pub fn from_record(record: &FileRecord, message: &str) -> Self {
        Self {
            file_id: record.id.clone(),
            filename: record.name.clone(),
            status: record.status,
            progress: record.progress,
            message: message.to_string(),
            timestamp: Utc::now(),
            url: record.url.clone(),
            error: None,
        }
    }

    /// Creates a failure event. The stored record keeps its last status.
    pub fn failed(file_id: &str, filename: &str, progress: u8, error: &str) -> Self {
        Self {
            file_id: file_id.to_string(),
            filename: filename.to_string(),
            status: FileStatus::Error,
            progress,
            message: "Upload failed".to_string(),
            timestamp: Utc::now(),
            url: None,
            error: Some(error.to_string()),
        }
    }
}

/// Broadcasts upload progress events to any number of subscribers.
#[derive(Clone)]
pub struct UploadProgressBroadcaster {
    sender: Arc<broadcast::Sender<UploadProgressEvent>>,
}

impl UploadProgressBroadcaster {
    /// Creates a new broadcaster with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sends an event to all subscribers.
    pub fn send(&self, event: UploadProgressEvent) {
        // Ignore errors - no active receivers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UploadProgressEvent> {
        self.sender.subscribe()
    }

    /// Creates a tracker bound to one upload and announces it as queued.
    pub fn start_upload(&self, record: &FileRecord) -> UploadProgressTracker {
        let tracker = UploadProgressTracker::new(&record.id, &record.name, Arc::clone(&self.sender));
        tracker.step(record, "Upload queued");
        tracker
    }
}

impl Default for UploadProgressBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Tracks progress for a single upload.
pub struct UploadProgressTracker {
    file_id: String,
    filename: String,
    sender: Arc<broadcast::Sender<UploadProgressEvent>>,
}

impl UploadProgressTracker {
    pub fn new(
        file_id: &str,
        filename: &str,
        sender: Arc<broadcast::Sender<UploadProgressEvent>>,
    ) -> Self {
        Self {
            file_id: file_id.to_string(),
            filename: filename.to_string(),
            sender,
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// Reports a record snapshot with a message.
    pub fn step(&self, record: &FileRecord, message: &str) {
        let _ = self
            .sender
            .send(UploadProgressEvent::from_record(record, message));
    }

    /// Reports the latest snapshot, picking the message from its status.
    pub fn report(&self, record: &FileRecord) {
        let message = match record.status {
            FileStatus::Pending => "Upload queued".to_string(),
            FileStatus::Uploading => format!("Uploading ({}%)", record.progress),
            FileStatus::Completed => "Upload completed".to_string(),
            FileStatus::Cancelled => "Upload cancelled".to_string(),
            FileStatus::Error => "Upload failed".to_string(),
        };
        self.step(record, &message);
    }

    pub fn failed(&self, progress: u8, error: &str) {
        let _ = self.sender.send(UploadProgressEvent::failed(
            &self.file_id,
            &self.filename,
            progress,
            error,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FileDescriptor;

    fn record(status: FileStatus, progress: u8) -> FileRecord {
        let mut record =
            FileRecord::pending("file-1".to_string(), &FileDescriptor::new("a.png", 1, "image/png"));
        record.status = status;
        record.progress = progress;
        record
    }

    #[test]
    fn test_broadcaster_send_receive() {
        let broadcaster = UploadProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();

        broadcaster.send(UploadProgressEvent::from_record(
            &record(FileStatus::Uploading, 30),
            "Testing",
        ));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.file_id, "file-1");
        assert_eq!(received.filename, "a.png");
        assert_eq!(received.status, FileStatus::Uploading);
        assert_eq!(received.progress, 30);
    }

    #[test]
    fn test_send_without_receivers() {
        let broadcaster = UploadProgressBroadcaster::default();
        broadcaster.send(UploadProgressEvent::from_record(
            &record(FileStatus::Pending, 0),
            "nobody listening",
        ));
    }

    #[test]
    fn test_start_upload_and_report() {
        let broadcaster = UploadProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();

        let tracker = broadcaster.start_upload(&record(FileStatus::Pending, 0));
        let queued = rx.try_recv().unwrap();
        assert_eq!(queued.status, FileStatus::Pending);
        assert_eq!(queued.message, "Upload queued");

        tracker.report(&record(FileStatus::Uploading, 45));
        let received = rx.try_recv().unwrap();
        assert_eq!(received.message, "Uploading (45%)");

        let mut done = record(FileStatus::Completed, 100);
        done.url = Some("https://files.dropzone.app/uploads/file-1".to_string());
        tracker.report(&done);
        let received = rx.try_recv().unwrap();
        assert_eq!(received.status, FileStatus::Completed);
        assert!(received.url.is_some());
    }

    #[test]
    fn test_failure_event() {
        let broadcaster = UploadProgressBroadcaster::new(10);
        let mut rx = broadcaster.subscribe();

        let tracker = UploadProgressTracker::new("file-9", "x.pdf", broadcaster.sender.clone());
        tracker.failed(35, "Store failure: disk on fire");

        let received = rx.try_recv().unwrap();
        assert_eq!(received.status, FileStatus::Error);
        assert_eq!(received.progress, 35);
        assert_eq!(received.error.as_deref(), Some("Store failure: disk on fire"));
    }
}
