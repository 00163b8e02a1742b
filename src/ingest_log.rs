//! Appends every accepted ingest payload to a JSON-lines file so the raw
//! values the station sent can be inspected later.
//!
//! Errors are logged and swallowed. The log is diagnostic only and must never
//! fail an ingest.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::{debug, warn};

use crate::api::dto::SensorForm;

#[derive(Debug, Serialize)]
struct Entry<'a> {
    received_at: DateTime<Utc>,
    #[serde(flatten)]
    form: &'a SensorForm,
}

#[derive(Debug, Clone)]
pub struct IngestLog {
    path: PathBuf,
}

impl IngestLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one line: `{"received_at": ..., <submitted fields>}`.
    pub async fn append(&self, form: &SensorForm) {
        let entry = Entry {
            received_at: Utc::now(),
            form,
        };

        let mut line = match serde_json::to_vec(&entry) {
            Ok(line) => line,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ingest_log: failed to encode entry");
                return;
            }
        };
        line.push(b'\n');

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await;

        let result = match file {
            Ok(mut file) => file.write_all(&line).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "ingest_log: failed to append entry");
        } else {
            debug!(path = %self.path.display(), bytes = line.len(), "ingest_log: appended");
        }
    }
}
