//! Shareable links for stored files.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{DropzoneError, Result};
use crate::random::RandomSource;
use crate::record::FileStatus;
use crate::store::RecordRepository;

pub struct ShareLinkGenerator {
    records: Arc<dyn RecordRepository>,
    random: Arc<dyn RandomSource>,
    base_url: String,
    token_length: usize,
    latency: Duration,
}

impl ShareLinkGenerator {
    pub fn new(
        config: &Config,
        records: Arc<dyn RecordRepository>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            records,
            random,
            base_url: config.links.share_base_url.trim_end_matches('/').to_string(),
            token_length: config.links.share_token_length,
            latency: config.latency.share(),
        }
    }

    /// Builds a share URL with a fresh random token.
    ///
    /// Tokens are not checked for collisions.
    pub async fn generate_shareable_link(&self, id: &str) -> Result<String> {
        self.wait().await;
        self.records.get_by_id(id).await?;
        Ok(self.build_link())
    }

    /// Like [`Self::generate_shareable_link`], but only for completed files.
    pub async fn regenerate_shareable_link(&self, id: &str) -> Result<String> {
        self.wait().await;
        let record = self.records.get_by_id(id).await?;
        if record.status != FileStatus::Completed {
            return Err(DropzoneError::IncompleteFile(record.name));
        }
        Ok(self.build_link())
    }

    fn build_link(&self) -> String {
        format!("{}/{}", self.base_url, self.random.token(self.token_length))
    }

    async fn wait(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, StdRandom};
    use crate::record::{FileDescriptor, FileRecord, RecordPatch};
    use crate::store::RecordStore;

    fn setup(random: Arc<dyn RandomSource>) -> (Arc<RecordStore>, ShareLinkGenerator) {
        let config = Config::without_latency();
        let store = Arc::new(RecordStore::new(&config));
        let generator = ShareLinkGenerator::new(&config, store.clone(), random);
        (store, generator)
    }

    #[tokio::test]
    async fn test_generate_link() {
        let (store, generator) = setup(Arc::new(StdRandom::seeded(11)));
        let record = store
            .create(&FileDescriptor::new("a.txt", 1, "text/plain"))
            .await
            .unwrap();

        let link = generator.generate_shareable_link(&record.id).await.unwrap();
        let token = link.strip_prefix("https://dropzone.app/share/").unwrap();
        assert_eq!(token.len(), 8);
    }

    #[tokio::test]
    async fn test_scripted_token() {
        let random = Arc::new(ScriptedRandom::new(vec![], vec![1, 2, 3, 4, 5, 6, 7, 8]));
        let (store, generator) = setup(random);
        let record = store
            .create(&FileDescriptor::new("a.txt", 1, "text/plain"))
            .await
            .unwrap();

        let link = generator.generate_shareable_link(&record.id).await.unwrap();
        assert_eq!(link, "https://dropzone.app/share/12345678");
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_latency_is_one_lookup() {
        let config = Config::default();
        let store = Arc::new(RecordStore::with_records(
            &config,
            vec![FileRecord::pending(
                "f1".to_string(),
                &FileDescriptor::new("a.txt", 1, "text/plain"),
            )],
        ));
        let generator = ShareLinkGenerator::new(&config, store, Arc::new(StdRandom::seeded(2)));

        let start = tokio::time::Instant::now();
        generator.generate_shareable_link("f1").await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(400), "{:?}", elapsed);
    }

    #[tokio::test]
    async fn test_generate_link_missing() {
        let (_store, generator) = setup(Arc::new(StdRandom::seeded(1)));
        let err = generator.generate_shareable_link("nope").await.unwrap_err();
        assert!(matches!(err, DropzoneError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_regenerate_requires_completed() {
        let (store, generator) = setup(Arc::new(StdRandom::seeded(5)));
        let record = store
            .create(&FileDescriptor::new("a.png", 1, "image/png"))
            .await
            .unwrap();

        let err = generator
            .regenerate_shareable_link(&record.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DropzoneError::IncompleteFile(ref name) if name == "a.png"));

        store
            .update(&record.id, RecordPatch::status(FileStatus::Completed))
            .await
            .unwrap();
        let link = generator.regenerate_shareable_link(&record.id).await.unwrap();
        assert!(link.starts_with("https://dropzone.app/share/"));
    }
}
