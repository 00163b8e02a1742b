use tracing::{error, info};

use crate::{
    api::dto::SensorForm,
    ingest_log::IngestLog,
    report::{self, ReportClock},
    report_store::{ReportStore, StoreError},
};

pub struct IngestService {
    clock: ReportClock,
    store: ReportStore,
    log: Option<IngestLog>,
}

impl IngestService {
    pub fn new(clock: ReportClock, store: ReportStore, log: Option<IngestLog>) -> Self {
        Self { clock, store, log }
    }

    /// Formats one station reading into the snapshot report and replaces the
    /// stored report with it. Fields are taken as sent; a missing field
    /// leaves an empty slot.
    pub async fn ingest(&self, form: &SensorForm) -> Result<(), StoreError> {
        if let Some(log) = &self.log {
            log.append(form).await;
        }

        let report = report::compose(form, &self.clock);
        let bytes = report.len();

        match self.store.replace(report).await {
            Ok(()) => {
                info!(path = %self.store.path().display(), bytes, "Snapshot report replaced");
                Ok(())
            }
            Err(e) => {
                error!(path = %self.store.path().display(), error = %e, "Failed to store snapshot report");
                Err(e)
            }
        }
    }
}
