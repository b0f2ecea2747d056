use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{DropzoneError, Result};
use crate::record::FileRecord;

/// How a simulated upload settled.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Completed(FileRecord),
    Cancelled(FileRecord),
}

impl UploadOutcome {
    pub fn record(&self) -> &FileRecord {
        match self {
            UploadOutcome::Completed(record) | UploadOutcome::Cancelled(record) => record,
        }
    }

    pub fn into_record(self) -> FileRecord {
        match self {
            UploadOutcome::Completed(record) | UploadOutcome::Cancelled(record) => record,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, UploadOutcome::Completed(_))
    }
}

/// Handle to an upload running in the background.
///
/// Dropping the handle detaches the upload; it then runs to completion.
pub struct UploadTask {
    file_id: String,
    cancel: Arc<watch::Sender<bool>>,
    handle: JoinHandle<Result<UploadOutcome>>,
}

impl UploadTask {
    pub(crate) fn new(
        file_id: String,
        cancel: watch::Sender<bool>,
        handle: JoinHandle<Result<UploadOutcome>>,
    ) -> Self {
        Self {
            file_id,
            cancel: Arc::new(cancel),
            handle,
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// Stops scheduling further progress steps. The task then marks the record
    /// `cancelled` and settles with [`UploadOutcome::Cancelled`]. No effect
    /// once the upload has completed.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Cancel signal that outlives [`Self::join`].
    pub(crate) fn canceller(&self) -> Arc<watch::Sender<bool>> {
        Arc::clone(&self.cancel)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the upload to settle.
    pub async fn join(self) -> Result<UploadOutcome> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(DropzoneError::StoreFailure(format!(
                "upload task for {} did not finish: {}",
                self.file_id, e
            ))),
        }
    }
}
