use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create staging file next to {path}: {source}")]
    Create { path: PathBuf, source: io::Error },
    #[error("failed to write report to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to move report into place at {path}: {source}")]
    Persist { path: PathBuf, source: io::Error },
    #[error("report writer task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Sole owner of the snapshot report file.
///
/// Cloning is cheap and every clone refers to the same file. Replacements
/// are staged in a temporary file and renamed over the report, so a reader
/// sees either the previous report or the new one, never a mix. Writers are
/// serialised; the last replace to take the lock wins.
#[derive(Debug, Clone)]
pub struct ReportStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Replace the whole report with `contents`.
    ///
    /// On error the previous report is left as it was.
    pub async fn replace(&self, contents: String) -> Result<(), StoreError> {
        let _guard = self.inner.write_lock.lock().await;
        let path = self.inner.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, contents.as_bytes())).await?
    }

    /// Current report text. A missing or unreadable file reads as empty.
    pub async fn read(&self) -> String {
        match tokio::fs::read(self.path()).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path().display(), "No report written yet");
                String::new()
            }
            Err(e) => {
                warn!(path = %self.path().display(), error = %e, "Failed to read report");
                String::new()
            }
        }
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(|source| StoreError::Create {
        path: path.to_owned(),
        source,
    })?;

    staged
        .write_all(contents)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|source| StoreError::Write {
            path: path.to_owned(),
            source,
        })?;

    // A failed persist drops the staged file, which deletes it.
    staged.persist(path).map_err(|e| StoreError::Persist {
        path: path.to_owned(),
        source: e.error,
    })?;

    Ok(())
}
