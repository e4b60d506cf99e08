use crate::errors::AppError;
use crate::models::{AppData, MoodEntry};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, warn};

/// Ordered, append-only source of mood entries.
pub trait MoodRepository {
    fn list(&self) -> &[MoodEntry];
    fn append(&mut self, entry: MoodEntry);

    /// Entries owned by `user_id`, in insertion order.
    fn for_user(&self, user_id: &str) -> Vec<MoodEntry> {
        self.list()
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl MoodRepository for AppData {
    fn list(&self) -> &[MoodEntry] {
        &self.entries
    }

    fn append(&mut self, entry: MoodEntry) {
        self.entries.push(entry);
    }
}

/// Loads the entry store. A missing file starts empty; an unreadable one is
/// moved aside to `<path>.corrupt` before starting empty so it is never
/// overwritten by the next submission.
pub async fn load_data(path: &Path) -> AppData {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return AppData::default(),
        Err(err) => {
            error!(path = %path.display(), "failed to read mood store: {err}");
            return AppData::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(data) => data,
        Err(err) => {
            let backup = sibling(path, "corrupt");
            error!(path = %path.display(), backup = %backup.display(), "failed to parse mood store: {err}");
            if let Err(err) = fs::rename(path, &backup).await {
                warn!(path = %path.display(), "could not move corrupt mood store aside: {err}");
            }
            AppData::default()
        }
    }
}

/// Writes to `<path>.tmp` and renames over `path`, so a crash mid-write
/// leaves the previous store intact.
pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    let tmp = sibling(path, "tmp");
    fs::write(&tmp, payload).await.map_err(AppError::internal)?;
    if let Err(err) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(AppError::internal(err));
    }
    Ok(())
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
