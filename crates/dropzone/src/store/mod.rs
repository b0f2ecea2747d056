//! In-memory stores for file records and upload sessions.

pub mod fixture;
pub mod records;
pub mod sessions;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

pub use records::{HistoryPage, HistoryQuery, RecordRepository, RecordStore};
pub use sessions::{SessionPatch, SessionStatus, SessionStore, UploadSession};

/// Emulates a network round-trip.
pub(crate) async fn simulate_latency(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

pub(crate) fn read_guard<'a, T>(lock: &'a RwLock<T>, name: &str) -> RwLockReadGuard<'a, T> {
    match lock.read() {
        Ok(g) => g,
        Err(poisoned) => {
            log::warn!("{} lock was poisoned, recovering", name);
            poisoned.into_inner()
        }
    }
}

pub(crate) fn write_guard<'a, T>(lock: &'a RwLock<T>, name: &str) -> RwLockWriteGuard<'a, T> {
    match lock.write() {
        Ok(g) => g,
        Err(poisoned) => {
            log::warn!("{} lock was poisoned, recovering", name);
            poisoned.into_inner()
        }
    }
}
