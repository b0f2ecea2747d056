//! Broadcasting of upload events for real-time streaming.

pub mod upload_progress;

pub use upload_progress::{UploadProgressBroadcaster, UploadProgressEvent, UploadProgressTracker};
