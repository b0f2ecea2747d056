//! Timer-driven upload simulation.
//!
//! Each upload creates a `pending` record, then advances its progress in random
//! increments at random intervals, persisting every step through the record
//! repository until the record is `completed`.

pub mod batch;
pub mod task;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::Instrument;

use crate::broadcast::{UploadProgressBroadcaster, UploadProgressTracker};
use crate::config::{validate_progress, Config, LinksConfig, ProgressConfig};
use crate::error::Result;
use crate::random::RandomSource;
use crate::record::{derive_links, FileDescriptor, FileRecord, FileStatus, RecordPatch};
use crate::store::RecordRepository;

pub use batch::{BatchItemFailure, BatchReport, BatchUploader};
pub use task::{UploadOutcome, UploadTask};

#[derive(Clone)]
pub struct UploadSimulator {
    records: Arc<dyn RecordRepository>,
    random: Arc<dyn RandomSource>,
    progress: ProgressConfig,
    links: LinksConfig,
    broadcaster: Option<UploadProgressBroadcaster>,
}

impl UploadSimulator {
    /// Fails with [`ConfigError::Validation`](crate::error::ConfigError) when
    /// the progress settings could never finish an upload.
    pub fn new(
        config: &Config,
        records: Arc<dyn RecordRepository>,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self> {
        validate_progress(&config.progress)?;

        Ok(Self {
            records,
            random,
            progress: config.progress.clone(),
            links: config.links.clone(),
            broadcaster: None,
        })
    }

    /// Also publishes every step on `broadcaster`.
    pub fn with_broadcaster(mut self, broadcaster: UploadProgressBroadcaster) -> Self {
        self.broadcaster = Some(broadcaster);
        self
    }

    pub fn records(&self) -> &Arc<dyn RecordRepository> {
        &self.records
    }

    /// Uploads a file and resolves with the completed record.
    ///
    /// `on_progress` receives every persisted snapshot, the last one carrying
    /// progress 100. Fails with the store's error if any step cannot be saved;
    /// the record is left in its last persisted state.
    pub async fn upload<F>(&self, descriptor: &FileDescriptor, on_progress: F) -> Result<FileRecord>
    where
        F: FnMut(&FileRecord) + Send,
    {
        let record = self.records.create(descriptor).await?;
        let (_cancel_tx, cancel_rx) = watch::channel(false);

        let outcome = self
            .drive(record, on_progress, cancel_rx)
            .instrument(tracing::info_span!("upload", file = %descriptor.name))
            .await?;
        Ok(outcome.into_record())
    }

    /// Creates the record and runs the upload as a background task.
    pub async fn spawn<F>(&self, descriptor: &FileDescriptor, on_progress: F) -> Result<UploadTask>
    where
        F: FnMut(&FileRecord) + Send + 'static,
    {
        let record = self.records.create(descriptor).await?;
        let file_id = record.id.clone();
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let simulator = self.clone();
        let span = tracing::info_span!("upload", file_id = %file_id, file = %record.name);
        let handle = tokio::spawn(
            async move { simulator.drive(record, on_progress, cancel_rx).await }.instrument(span),
        );

        Ok(UploadTask::new(file_id, cancel_tx, handle))
    }

    async fn drive<F>(
        &self,
        record: FileRecord,
        mut on_progress: F,
        mut cancel_rx: watch::Receiver<bool>,
    ) -> Result<UploadOutcome>
    where
        F: FnMut(&FileRecord) + Send,
    {
        let tracker = self.broadcaster.as_ref().map(|b| b.start_upload(&record));
        let mut accumulated = 0.0_f64;
        let mut last = record;

        loop {
            let delay = Duration::from_millis(
                self.random
                    .next_u64(self.progress.min_interval_ms, self.progress.max_interval_ms),
            );

            tokio::select! {
                biased;
                _ = cancellation(&mut cancel_rx) => {
                    return self.cancel_record(&last, tracker.as_ref()).await;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let step = self
                .random
                .next_f64(self.progress.min_step, self.progress.max_step);
            accumulated = (accumulated + step).min(100.0);
            let done = accumulated >= 100.0;

            let patch = if done {
                RecordPatch::progress(FileStatus::Completed, 100)
                    .with_links(derive_links(&last, &self.links))
            } else {
                // Truncation keeps non-final steps below 100.
                RecordPatch::progress(FileStatus::Uploading, accumulated as u8)
            };

            let updated = match self.records.update(&last.id, patch).await {
                Ok(updated) => updated,
                Err(e) => {
                    log::warn!("Upload of '{}' ({}) failed: {}", last.name, last.id, e);
                    if let Some(tracker) = &tracker {
                        tracker.failed(last.progress, &e.to_string());
                    }
                    return Err(e);
                }
            };

            log::debug!("Upload {} at {}%", updated.id, updated.progress);
            on_progress(&updated);
            if let Some(tracker) = &tracker {
                tracker.report(&updated);
            }

            if done {
                log::info!("Upload of '{}' completed ({})", updated.name, updated.id);
                return Ok(UploadOutcome::Completed(updated));
            }
            last = updated;
        }
    }

    async fn cancel_record(
        &self,
        last: &FileRecord,
        tracker: Option<&UploadProgressTracker>,
    ) -> Result<UploadOutcome> {
        let cancelled = self
            .records
            .update(&last.id, RecordPatch::status(FileStatus::Cancelled))
            .await?;

        log::info!(
            "Upload of '{}' cancelled at {}%",
            cancelled.name,
            cancelled.progress
        );
        if let Some(tracker) = tracker {
            tracker.report(&cancelled);
        }
        Ok(UploadOutcome::Cancelled(cancelled))
    }
}

/// Resolves once cancellation is requested; never if the sender is gone.
pub(crate) async fn cancellation(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}
