//! File-backed history store.
//!
//! The whole history lives in memory as a `Vec` (most recent first) and is
//! rewritten to disk on every append via a temp-file-then-rename so a
//! crash mid-write never corrupts the store. Readers get cheap clones;
//! entries are never mutated after they are written.

use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use crate::entry::HistoryEntry;
use neoai_core::types::JobId;

/// Errors from the history store.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("History I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append-only store of terminal job outcomes.
pub struct HistoryStore {
    path: PathBuf,
    entries: RwLock<Vec<HistoryEntry>>,
}

impl HistoryStore {
    /// Open the store, loading any existing entries.
    ///
    /// A missing file is an empty history. A file that fails to parse is
    /// logged and treated as empty rather than blocking startup; the next
    /// append rewrites it.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let path = path.into();
        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<HistoryEntry>>(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "History file unreadable, starting empty",
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(path = %path.display(), count = entries.len(), "History store opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Append a terminal record and flush the store to disk.
    ///
    /// New entries go to the front so the on-disk array stays ordered
    /// most-recent-first.
    pub async fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let mut entries = self.entries.write().await;
        entries.insert(0, entry);
        self.flush(&entries).await?;
        tracing::debug!(count = entries.len(), "History entry appended");
        Ok(())
    }

    /// All entries, most recent first.
    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.read().await.clone()
    }

    /// Look up a single entry by job id.
    pub async fn find(&self, id: JobId) -> Option<HistoryEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the full array to a sibling temp file, then rename over
    /// the store file (atomic on the same filesystem).
    async fn flush(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_vec_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}
