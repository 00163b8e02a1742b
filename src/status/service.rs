use askama::Template;
use tracing::error;

use crate::report_store::ReportStore;

/// Seconds between automatic reloads of the status page.
pub const REFRESH_SECS: u32 = 30;

/// Fixed text around the report.
#[derive(Debug, Clone)]
pub struct PageSettings {
    /// Place name, e.g. `"Sydney"`.
    pub label: String,
    /// IANA name of the zone the report's local times are in.
    pub zone: String,
    pub location: String,
    pub site_name: String,
    /// Describes the zone's UTC offset, e.g. `"Sydney time is UTC+10, ..."`.
    pub offset_note: String,
    /// Describes the daylight saving schedule.
    pub dst_note: String,
}

#[derive(Debug, Template)]
#[template(path = "status.html")]
struct StatusPage<'a> {
    report: &'a str,
    refresh_secs: u32,
    label: &'a str,
    zone: &'a str,
    location: &'a str,
    site_name: &'a str,
    offset_note: &'a str,
    dst_note: &'a str,
}

pub struct StatusService {
    store: ReportStore,
    settings: PageSettings,
}

impl StatusService {
    pub fn new(store: ReportStore, settings: PageSettings) -> Self {
        Self { store, settings }
    }

    /// Build the status page around the current report. Never fails: a
    /// missing report gives an empty data section.
    pub async fn render(&self) -> String {
        let report = self.store.read().await;

        let page = StatusPage {
            report: &report,
            refresh_secs: REFRESH_SECS,
            label: &self.settings.label,
            zone: &self.settings.zone,
            location: &self.settings.location,
            site_name: &self.settings.site_name,
            offset_note: &self.settings.offset_note,
            dst_note: &self.settings.dst_note,
        };

        match page.render() {
            Ok(html) => html,
            Err(e) => {
                error!(error = %e, "Status page render error");
                "<html><body><p>Error rendering status page</p></body></html>".to_owned()
            }
        }
    }
}
