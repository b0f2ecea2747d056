//! Test harness for isolated test execution.
//!
//! Every `TestHarness` owns its own record and session stores with latency
//! switched off, so tests never share state.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use dropzone::record::RecordPatch;
use dropzone::store::HistoryPage;
use dropzone::{
    BatchUploader, Config, DropzoneError, FileDescriptor, FileRecord, HistoryQuery, RandomSource,
    RecordRepository, RecordStore, Result, ScriptedRandom, SessionStore, ShareLinkGenerator,
    StdRandom, UploadSimulator, Validator,
};

pub struct TestHarness {
    pub config: Config,
    pub records: Arc<RecordStore>,
    pub sessions: Arc<SessionStore>,
    random: Arc<dyn RandomSource>,
}

impl TestHarness {
    /// Fresh stores, no latency, seeded randomness.
    pub fn new() -> Self {
        Self::with_random(Arc::new(StdRandom::seeded(7)))
    }

    /// Every step advances by `step` after `interval_ms`.
    pub fn scripted(step: f64, interval_ms: u64) -> Self {
        let mut config = Config::without_latency();
        config.progress.max_step = 100.0;
        let random = Arc::new(ScriptedRandom::new(vec![step; 100], vec![interval_ms; 100]));
        Self::build(config, random, Vec::new())
    }

    pub fn with_random(random: Arc<dyn RandomSource>) -> Self {
        Self::with_records(random, Vec::new())
    }

    pub fn with_records(random: Arc<dyn RandomSource>, records: Vec<FileRecord>) -> Self {
        Self::build(Config::without_latency(), random, records)
    }

    fn build(config: Config, random: Arc<dyn RandomSource>, records: Vec<FileRecord>) -> Self {
        Self {
            records: Arc::new(RecordStore::with_records(&config, records)),
            sessions: Arc::new(SessionStore::new(&config)),
            config,
            random,
        }
    }

    pub fn validator(&self) -> Validator {
        Validator::from_config(&self.config)
    }

    pub fn simulator(&self) -> UploadSimulator {
        UploadSimulator::new(&self.config, self.records.clone(), self.random.clone())
            .expect("harness config is valid")
    }

    pub fn batch_uploader(&self) -> BatchUploader {
        BatchUploader::new(self.simulator(), self.validator(), self.sessions.clone())
    }

    pub fn share_links(&self) -> ShareLinkGenerator {
        ShareLinkGenerator::new(&self.config, self.records.clone(), self.random.clone())
    }

    /// Uploads `descriptor` to completion, returning every progress value seen.
    pub async fn upload_collecting(&self, descriptor: &FileDescriptor) -> (FileRecord, Vec<u8>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let record = self
            .simulator()
            .upload(descriptor, move |r| sink.lock().unwrap().push(r.progress))
            .await
            .expect("upload should complete");
        let seen = seen.lock().unwrap().clone();
        (record, seen)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Repository whose updates start failing after a fixed number of successes.
pub struct FailingStore {
    inner: RecordStore,
    successful_updates: usize,
    updates: AtomicUsize,
}

impl FailingStore {
    pub fn failing_after(successful_updates: usize) -> Self {
        Self {
            inner: RecordStore::new(&Config::without_latency()),
            successful_updates,
            updates: AtomicUsize::new(0),
        }
    }

    pub fn update_attempts(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordRepository for FailingStore {
    async fn create(&self, descriptor: &FileDescriptor) -> Result<FileRecord> {
        self.inner.create(descriptor).await
    }

    async fn get_by_id(&self, id: &str) -> Result<FileRecord> {
        self.inner.get_by_id(id).await
    }

    async fn update(&self, id: &str, patch: RecordPatch) -> Result<FileRecord> {
        let attempt = self.updates.fetch_add(1, Ordering::SeqCst);
        if attempt >= self.successful_updates {
            return Err(DropzoneError::StoreFailure("backend unavailable".to_string()));
        }
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<FileRecord> {
        self.inner.delete(id).await
    }

    async fn get_all(&self) -> Result<Vec<FileRecord>> {
        self.inner.get_all().await
    }

    async fn history(&self, query: &HistoryQuery) -> Result<HistoryPage> {
        self.inner.history(query).await
    }
}
