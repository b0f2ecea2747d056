use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 100 MiB upload ceiling.
pub const DEFAULT_MAX_SIZE_BYTES: u64 = 100 * 1024 * 1024;

pub const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/zip",
    "video/mp4",
    "audio/mpeg",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

fn default_max_size_bytes() -> u64 {
    DEFAULT_MAX_SIZE_BYTES
}

fn default_allowed_types() -> Vec<String> {
    DEFAULT_ALLOWED_TYPES.iter().map(|t| t.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            allowed_types: default_allowed_types(),
            latency: LatencyConfig::default(),
            progress: ProgressConfig::default(),
            links: LinksConfig::default(),
        }
    }
}

impl Config {
    /// Default config with every artificial delay removed.
    pub fn without_latency() -> Self {
        Self {
            latency: LatencyConfig::none(),
            ..Self::default()
        }
    }
}

/// Artificial round-trip delays, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyConfig {
    #[serde(default)]
    pub records: RecordLatency,
    #[serde(default)]
    pub sessions: SessionLatency,
    /// Extra delay for share links, on top of the record lookup.
    #[serde(default)]
    pub share_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            records: RecordLatency::default(),
            sessions: SessionLatency::default(),
            share_ms: 0,
        }
    }
}

impl LatencyConfig {
    pub fn none() -> Self {
        Self {
            records: RecordLatency::none(),
            sessions: SessionLatency::none(),
            share_ms: 0,
        }
    }

    pub fn share(&self) -> Duration {
        Duration::from_millis(self.share_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordLatency {
    pub get_all_ms: u64,
    pub get_by_id_ms: u64,
    pub create_ms: u64,
    pub update_ms: u64,
    pub delete_ms: u64,
}

impl Default for RecordLatency {
    fn default() -> Self {
        Self {
            get_all_ms: 300,
            get_by_id_ms: 200,
            create_ms: 400,
            update_ms: 250,
            delete_ms: 200,
        }
    }
}

impl RecordLatency {
    pub fn none() -> Self {
        Self {
            get_all_ms: 0,
            get_by_id_ms: 0,
            create_ms: 0,
            update_ms: 0,
            delete_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionLatency {
    pub get_all_ms: u64,
    pub get_by_id_ms: u64,
    pub create_ms: u64,
    pub update_ms: u64,
    pub delete_ms: u64,
    pub complete_ms: u64,
}

impl Default for SessionLatency {
    fn default() -> Self {
        Self {
            get_all_ms: 300,
            get_by_id_ms: 200,
            create_ms: 200,
            update_ms: 150,
            delete_ms: 200,
            complete_ms: 100,
        }
    }
}

impl SessionLatency {
    pub fn none() -> Self {
        Self {
            get_all_ms: 0,
            get_by_id_ms: 0,
            create_ms: 0,
            update_ms: 0,
            delete_ms: 0,
            complete_ms: 0,
        }
    }
}

/// Shape of the simulated progress trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressConfig {
    /// Lower bound (inclusive) of a single progress increment.
    pub min_step: f64,
    /// Upper bound (exclusive) of a single progress increment.
    pub max_step: f64,
    pub min_interval_ms: u64,
    pub max_interval_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            min_step: 5.0,
            max_step: 20.0,
            min_interval_ms: 200,
            max_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinksConfig {
    pub file_base_url: String,
    pub thumbnail_base_url: String,
    pub share_base_url: String,
    pub share_token_length: usize,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            file_base_url: "https://files.dropzone.app/uploads".to_string(),
            thumbnail_base_url: "https://files.dropzone.app/thumbnails".to_string(),
            share_base_url: "https://dropzone.app/share".to_string(),
            share_token_length: 8,
        }
    }
}
