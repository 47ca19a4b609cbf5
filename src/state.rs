use crate::models::AppData;
use crate::notify::ChangeNotifier;
use crate::progress::ProgressError;
use crate::tracker::{SnapshotCache, Tracked};
use chrono::{DateTime, Utc};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared service state. Lock `data` before `snapshots` when taking both.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub snapshots: Arc<Mutex<SnapshotCache>>,
    pub notifier: ChangeNotifier,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, notifier: ChangeNotifier) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            snapshots: Arc::new(Mutex::new(SnapshotCache::default())),
            notifier,
        }
    }

    pub async fn track(&self, user_id: &str, now: DateTime<Utc>) -> Result<Tracked, ProgressError> {
        let data = self.data.lock().await;
        let mut snapshots = self.snapshots.lock().await;
        snapshots.current(&*data, user_id, now)
    }

    /// Like `track`, but also consumes the pending badge unlocks.
    pub async fn track_badges(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Tracked, ProgressError> {
        let data = self.data.lock().await;
        let mut snapshots = self.snapshots.lock().await;
        let mut tracked = snapshots.current(&*data, user_id, now)?;
        tracked.snapshot.newly_unlocked = snapshots.acknowledge_unlocks(user_id);
        Ok(tracked)
    }
}
