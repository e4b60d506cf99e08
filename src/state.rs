use crate::models::{AppData, MoodEntry};
use crate::storage::MoodRepository;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    /// Held across the cooldown check and the append of a submission.
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Snapshot of one user's entries; the lock is released before returning.
    pub async fn entries_for(&self, user_id: &str) -> Vec<MoodEntry> {
        self.data.lock().await.for_user(user_id)
    }
}
