//! Upload sessions: groups of files uploaded together.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{Config, SessionLatency};
use crate::error::{DropzoneError, Result};
use crate::store::{read_guard, simulate_latency, write_guard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    pub id: String,
    /// Ids of the file records in this session.
    pub files: Vec<String>,
    pub total_size: u64,
    pub uploaded_size: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
}

pub struct SessionStore {
    sessions: RwLock<Vec<UploadSession>>,
    latency: SessionLatency,
}

impl SessionStore {
    pub fn new(config: &Config) -> Self {
        Self {
            sessions: RwLock::new(Vec::new()),
            latency: config.latency.sessions.clone(),
        }
    }

    pub async fn get_all(&self) -> Vec<UploadSession> {
        simulate_latency(self.latency.get_all_ms).await;
        read_guard(&self.sessions, "Session store").clone()
    }

    pub async fn get_by_id(&self, id: &str) -> Result<UploadSession> {
        simulate_latency(self.latency.get_by_id_ms).await;

        read_guard(&self.sessions, "Session store")
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| DropzoneError::session_not_found(id))
    }

    pub async fn create(&self, files: Vec<String>, total_size: u64) -> UploadSession {
        simulate_latency(self.latency.create_ms).await;

        let session = UploadSession {
            id: Uuid::new_v4().to_string(),
            files,
            total_size,
            uploaded_size: 0,
            start_time: Utc::now(),
            end_time: None,
            status: SessionStatus::Active,
        };
        write_guard(&self.sessions, "Session store").push(session.clone());
        session
    }

    pub async fn update(&self, id: &str, patch: SessionPatch) -> Result<UploadSession> {
        simulate_latency(self.latency.update_ms).await;

        let mut sessions = write_guard(&self.sessions, "Session store");
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DropzoneError::session_not_found(id))?;

        if let Some(files) = patch.files {
            session.files = files;
        }
        if let Some(total_size) = patch.total_size {
            session.total_size = total_size;
        }
        if let Some(uploaded_size) = patch.uploaded_size {
            session.uploaded_size = uploaded_size;
        }
        if patch.end_time.is_some() {
            session.end_time = patch.end_time;
        }
        if let Some(status) = patch.status {
            session.status = status;
        }

        Ok(session.clone())
    }

    /// Adds `bytes` to the uploaded total of a session.
    pub async fn record_uploaded(&self, id: &str, bytes: u64) -> Result<UploadSession> {
        simulate_latency(self.latency.update_ms).await;

        let mut sessions = write_guard(&self.sessions, "Session store");
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DropzoneError::session_not_found(id))?;
        session.uploaded_size = session.uploaded_size.saturating_add(bytes);
        Ok(session.clone())
    }

    pub async fn delete(&self, id: &str) -> Result<UploadSession> {
        simulate_latency(self.latency.delete_ms).await;

        let mut sessions = write_guard(&self.sessions, "Session store");
        let index = sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DropzoneError::session_not_found(id))?;
        Ok(sessions.remove(index))
    }

    pub async fn complete_session(&self, id: &str) -> Result<UploadSession> {
        simulate_latency(self.latency.complete_ms).await;

        self.update(
            id,
            SessionPatch {
                end_time: Some(Utc::now()),
                status: Some(SessionStatus::Completed),
                ..SessionPatch::default()
            },
        )
        .await
    }
}
