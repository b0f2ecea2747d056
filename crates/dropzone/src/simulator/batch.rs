//! Batch uploads: independent simulator tasks awaited together.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::watch;

use crate::error::{DropzoneError, Result};
use crate::record::{FileDescriptor, FileRecord};
use crate::simulator::{cancellation, UploadOutcome, UploadSimulator};
use crate::store::SessionStore;
use crate::validation::Validator;

/// One item of a batch that did not complete.
#[derive(Debug)]
pub struct BatchItemFailure {
    /// Position of the descriptor in the submitted batch.
    pub index: usize,
    pub name: String,
    /// `None` when the item was rejected before a record was created.
    pub file_id: Option<String>,
    pub error: DropzoneError,
}

/// Per-item outcome of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Session tracking the accepted items; `None` if nothing was accepted.
    pub session_id: Option<String>,
    pub fulfilled: Vec<FileRecord>,
    pub cancelled: Vec<FileRecord>,
    pub rejected: Vec<BatchItemFailure>,
}

impl BatchReport {
    pub fn fulfilled_count(&self) -> usize {
        self.fulfilled.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.rejected.is_empty() && self.cancelled.is_empty()
    }
}

pub struct BatchUploader {
    simulator: UploadSimulator,
    validator: Validator,
    sessions: Arc<SessionStore>,
}

impl BatchUploader {
    pub fn new(simulator: UploadSimulator, validator: Validator, sessions: Arc<SessionStore>) -> Self {
        Self {
            simulator,
            validator,
            sessions,
        }
    }

    /// Validates every descriptor, uploads the valid ones concurrently and
    /// reports each item. A failing item never fails the batch.
    pub async fn upload_batch<F>(
        &self,
        descriptors: Vec<FileDescriptor>,
        on_progress: F,
    ) -> Result<BatchReport>
    where
        F: Fn(&FileRecord) + Send + Sync + 'static,
    {
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        self.upload_batch_until(descriptors, on_progress, cancel_rx)
            .await
    }

    /// Like [`Self::upload_batch`], but once `cancel` turns `true` every
    /// upload still running is cancelled and listed in
    /// [`BatchReport::cancelled`].
    pub async fn upload_batch_until<F>(
        &self,
        descriptors: Vec<FileDescriptor>,
        on_progress: F,
        cancel: watch::Receiver<bool>,
    ) -> Result<BatchReport>
    where
        F: Fn(&FileRecord) + Send + Sync + 'static,
    {
        let on_progress = Arc::new(on_progress);
        let mut report = BatchReport::default();
        let mut tasks = Vec::new();

        for (index, descriptor) in descriptors.into_iter().enumerate() {
            if let Err(error) = self.validator.validate(&descriptor) {
                log::warn!("Rejected '{}': {}", descriptor.name, error);
                report.rejected.push(BatchItemFailure {
                    index,
                    name: descriptor.name,
                    file_id: None,
                    error,
                });
                continue;
            }

            let callback = Arc::clone(&on_progress);
            match self
                .simulator
                .spawn(&descriptor, move |record| callback(record))
                .await
            {
                Ok(task) => tasks.push((index, descriptor, task)),
                Err(error) => {
                    log::warn!("Could not start upload of '{}': {}", descriptor.name, error);
                    report.rejected.push(BatchItemFailure {
                        index,
                        name: descriptor.name,
                        file_id: None,
                        error,
                    });
                }
            }
        }

        if tasks.is_empty() {
            return Ok(report);
        }

        let file_ids = tasks.iter().map(|(_, _, t)| t.file_id().to_string()).collect();
        let total_size = tasks.iter().map(|(_, d, _)| d.size).sum();
        let session = self.sessions.create(file_ids, total_size).await;
        log::info!(
            "Started upload session {} with {} file(s)",
            session.id,
            tasks.len()
        );

        let results = join_all(tasks.into_iter().map(|(index, descriptor, task)| {
            let mut cancel = cancel.clone();
            async move {
                let file_id = task.file_id().to_string();
                let canceller = task.canceller();
                let mut join = std::pin::pin!(task.join());

                let result = tokio::select! {
                    result = &mut join => result,
                    _ = cancellation(&mut cancel) => {
                        canceller.send_replace(true);
                        join.await
                    }
                };
                (index, descriptor, file_id, result)
            }
        }))
        .await;

        for (index, descriptor, file_id, result) in results {
            match result {
                Ok(UploadOutcome::Completed(record)) => {
                    self.sessions
                        .record_uploaded(&session.id, record.size)
                        .await?;
                    report.fulfilled.push(record);
                }
                Ok(UploadOutcome::Cancelled(record)) => report.cancelled.push(record),
                Err(error) => {
                    log::warn!("Upload of '{}' failed: {}", descriptor.name, error);
                    report.rejected.push(BatchItemFailure {
                        index,
                        name: descriptor.name,
                        file_id: Some(file_id),
                        error,
                    });
                }
            }
        }

        self.sessions.complete_session(&session.id).await?;
        report.rejected.sort_by_key(|f| f.index);
        report.session_id = Some(session.id);

        log::info!(
            "Batch finished: {} uploaded, {} cancelled, {} failed",
            report.fulfilled_count(),
            report.cancelled.len(),
            report.rejected_count()
        );
        Ok(report)
    }
}
