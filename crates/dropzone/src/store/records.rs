//! Record store: the authoritative collection of file records.

use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Config, LinksConfig, RecordLatency};
use crate::error::{DropzoneError, Result};
use crate::record::{derive_links, FileDescriptor, FileRecord, FileStatus, RecordPatch};
use crate::store::{read_guard, simulate_latency, write_guard};

// ─── Query types ────────────────────────────────────────────────────────────

/// Query parameters for the upload history.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub status: Option<FileStatus>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl HistoryQuery {
    pub fn with_status(status: FileStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// One page of history, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub records: Vec<FileRecord>,
    /// Number of records matching the filter, ignoring pagination.
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

// ─── Repository seam ────────────────────────────────────────────────────────

/// CRUD over file records. The simulator and link generator only see this trait.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    async fn create(&self, descriptor: &FileDescriptor) -> Result<FileRecord>;

    async fn get_by_id(&self, id: &str) -> Result<FileRecord>;

    async fn update(&self, id: &str, patch: RecordPatch) -> Result<FileRecord>;

    async fn delete(&self, id: &str) -> Result<FileRecord>;

    /// All records in insertion order.
    async fn get_all(&self) -> Result<Vec<FileRecord>>;

    async fn history(&self, query: &HistoryQuery) -> Result<HistoryPage> {
        let mut records: Vec<FileRecord> = self
            .get_all()
            .await?
            .into_iter()
            .rev()
            .filter(|r| query.status.map_or(true, |s| r.status == s))
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = records.len();
        let offset = query.offset.unwrap_or(0);
        let records = records
            .into_iter()
            .skip(offset)
            .take(query.limit.unwrap_or(usize::MAX))
            .collect();

        Ok(HistoryPage {
            records,
            total,
            limit: query.limit,
            offset: query.offset,
        })
    }
}

// ─── RecordStore ────────────────────────────────────────────────────────────

/// In-memory record store.
///
/// Uses `std::sync::RwLock`; guards are never held across the artificial
/// latency, which is awaited before the lock is taken.
pub struct RecordStore {
    records: RwLock<Vec<FileRecord>>,
    latency: RecordLatency,
    links: LinksConfig,
}

impl RecordStore {
    pub fn new(config: &Config) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            latency: config.latency.records.clone(),
            links: config.links.clone(),
        }
    }

    /// Creates a store seeded with existing records (e.g. from a fixture).
    ///
    /// Completed records without a URL get their links derived here; links on
    /// any other record are dropped.
    pub fn with_records(config: &Config, records: Vec<FileRecord>) -> Self {
        let store = Self::new(config);
        {
            let mut guard = write_guard(&store.records, "Record store");
            for mut record in records {
                if record.status == FileStatus::Completed {
                    record.progress = 100;
                    if record.url.is_none() {
                        let links = derive_links(&record, &store.links);
                        record.url = Some(links.url);
                        record.thumbnail_url = links.thumbnail_url;
                    }
                } else {
                    record.url = None;
                    record.thumbnail_url = None;
                }
                record.progress = record.progress.min(100);
                guard.push(record);
            }
        }
        store
    }

    pub fn links(&self) -> &LinksConfig {
        &self.links
    }

    pub fn len(&self) -> usize {
        read_guard(&self.records, "Record store").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Merges a patch into a record, enforcing the lifecycle rules.
fn apply_patch(record: &mut FileRecord, patch: RecordPatch, links: &LinksConfig) -> Result<()> {
    let current = record.status;
    let next = patch.status.unwrap_or(current);

    let progress_changes = patch.progress.is_some_and(|p| p.min(100) != record.progress);
    let leaves_terminal = current.is_terminal() && (next != current || progress_changes);
    let back_to_pending = next == FileStatus::Pending && current != FileStatus::Pending;
    if leaves_terminal || back_to_pending {
        return Err(DropzoneError::InvalidTransition {
            id: record.id.clone(),
            from: current,
            to: next,
        });
    }

    record.status = next;
    if let Some(progress) = patch.progress {
        let progress = progress.min(100);
        record.progress = if next == FileStatus::Uploading {
            progress.max(record.progress)
        } else {
            progress
        };
    }
    if record.status != FileStatus::Completed {
        // Links only exist on completed records.
        if patch.url.is_some() || patch.thumbnail_url.is_some() {
            log::debug!("Ignoring links in patch for {} ({})", record.id, record.status);
        }
        return Ok(());
    }

    if patch.url.is_some() {
        record.url = patch.url;
    }
    if patch.thumbnail_url.is_some() {
        record.thumbnail_url = patch.thumbnail_url;
    }

    record.progress = 100;
    if record.url.is_none() {
        let derived = derive_links(record, links);
        record.url = Some(derived.url);
        record.thumbnail_url = derived.thumbnail_url;
    }

    Ok(())
}

#[async_trait]
impl RecordRepository for RecordStore {
    async fn create(&self, descriptor: &FileDescriptor) -> Result<FileRecord> {
        simulate_latency(self.latency.create_ms).await;

        let record = FileRecord::pending(Uuid::new_v4().to_string(), descriptor);
        write_guard(&self.records, "Record store").push(record.clone());

        log::debug!("Created record {} for '{}'", record.id, record.name);
        Ok(record)
    }

    async fn get_by_id(&self, id: &str) -> Result<FileRecord> {
        simulate_latency(self.latency.get_by_id_ms).await;

        read_guard(&self.records, "Record store")
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| DropzoneError::file_not_found(id))
    }

    async fn update(&self, id: &str, patch: RecordPatch) -> Result<FileRecord> {
        simulate_latency(self.latency.update_ms).await;

        let mut records = write_guard(&self.records, "Record store");
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DropzoneError::file_not_found(id))?;

        apply_patch(record, patch, &self.links)?;
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<FileRecord> {
        simulate_latency(self.latency.delete_ms).await;

        let mut records = write_guard(&self.records, "Record store");
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DropzoneError::file_not_found(id))?;

        let removed = records.remove(index);
        log::debug!("Deleted record {} ('{}')", removed.id, removed.name);
        Ok(removed)
    }

    async fn get_all(&self) -> Result<Vec<FileRecord>> {
        simulate_latency(self.latency.get_all_ms).await;

        Ok(read_guard(&self.records, "Record store").clone())
    }
}
