use serde::{Deserialize, Serialize};

use crate::config::LinksConfig;
use crate::record::FileRecord;

/// Download and thumbnail URLs for a completed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedLinks {
    pub url: String,
    pub thumbnail_url: Option<String>,
}

/// Computes the synthetic links of a record. Thumbnails exist only for images.
pub fn derive_links(record: &FileRecord, links: &LinksConfig) -> DerivedLinks {
    let url = format!("{}/{}", links.file_base_url.trim_end_matches('/'), record.id);
    let thumbnail_url = record.is_image().then(|| {
        format!(
            "{}/{}.jpg",
            links.thumbnail_base_url.trim_end_matches('/'),
            record.id
        )
    });

    DerivedLinks { url, thumbnail_url }
}
