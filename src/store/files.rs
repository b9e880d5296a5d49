//! Durable per-event file storage.
//!
//! Each captured event is persisted exactly once as `webhook_<id>.json`
//! inside the data directory, pretty-printed. Records are never evicted or
//! rewritten by this service; they outlive the in-memory window.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::{CaptureError, Result};
use crate::event::Event;

/// Metadata for one durable record on disk.
#[derive(Debug, Clone, Serialize)]
pub struct RecordInfo {
    /// File name, which doubles as the record key.
    pub filename: String,
    /// Absolute or relative path of the record file.
    pub path: String,
    /// File size in bytes.
    pub size: u64,
    /// Creation time as reported by the filesystem.
    pub created: DateTime<Utc>,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// File-backed store of durable event records.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating the data directory if absent.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            std::fs::create_dir_all(&dir)
                .map_err(|e| CaptureError::internal(format!("cannot create {}", dir.display())).with_source(e))?;
            debug!(dir = %dir.display(), "Created storage directory");
        }
        Ok(Self { dir })
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist one event under its id-derived file name.
    pub async fn save(&self, event: &Event) -> Result<String> {
        let name = event.file_name();
        let bytes = serde_json::to_vec_pretty(event)?;

        tokio::fs::write(self.dir.join(&name), bytes)
            .await
            .map_err(|e| CaptureError::storage_write(&name, e))?;

        Ok(name)
    }

    /// Read and deserialize one record by file name.
    ///
    /// A missing file is [`RecordNotFound`](crate::error::ErrorCode); a file
    /// that exists but fails to parse is the distinct
    /// [`CorruptRecord`](crate::error::ErrorCode) condition.
    pub async fn read(&self, name: &str) -> Result<Event> {
        let path = self.safe_path(name)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CaptureError::record_not_found(name));
            }
            Err(e) => {
                return Err(CaptureError::internal(format!("cannot read {}", name)).with_source(e))
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| CaptureError::corrupt_record(name, e))
    }

    /// Enumerate all `.json` records, newest-modified first.
    pub async fn list(&self) -> Result<Vec<RecordInfo>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(CaptureError::enumeration)?;

        let mut records = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(CaptureError::enumeration)?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let metadata = entry.metadata().await.map_err(CaptureError::enumeration)?;
            let modified = metadata.modified().map(to_utc).unwrap_or_else(|_| Utc::now());
            // not all filesystems report a birth time
            let created = metadata.created().map(to_utc).unwrap_or(modified);

            records.push(RecordInfo {
                filename: entry.file_name().to_string_lossy().into_owned(),
                path: path.display().to_string(),
                size: metadata.len(),
                created,
                modified,
            });
        }

        records.sort_by(|a, b| b.modified.cmp(&a.modified));
        Ok(records)
    }

    /// Resolve a record name inside the data directory, rejecting anything
    /// that could escape it.
    fn safe_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(CaptureError::invalid_input("Invalid file name"));
        }
        Ok(self.dir.join(name))
    }
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    time.into()
}
