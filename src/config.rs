use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono_tz::Tz;

const DEFAULT_OFFSET_NOTE: &str = "Sydney time is UTC+10, or UTC+11 during DST.";
const DEFAULT_DST_NOTE: &str =
    "DST runs from first Sunday of October @ 02:00 until first Sunday of April @ 03:00.";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// File holding the latest snapshot report.
    pub report_path: PathBuf,
    /// Zone used for every local timestamp in the report.
    pub local_timezone: Tz,
    /// Place name shown in the `<label> time:` line and the page title.
    pub local_label: String,
    /// Optional append-only capture of raw ingest payloads.
    pub ingest_log_path: Option<PathBuf>,
    pub site_location: String,
    pub site_name: String,
    /// Page note on the local zone's UTC offset.
    pub offset_note: String,
    /// Page note on when daylight saving starts and ends.
    pub dst_note: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            report_path: optional("REPORT_PATH", "temp_humidity.txt").into(),
            local_timezone: parse_timezone(&optional("LOCAL_TIMEZONE", "Australia/Sydney"))
                .context("LOCAL_TIMEZONE must be an IANA zone name")?,
            local_label: optional("LOCAL_LABEL", "Sydney"),
            ingest_log_path: std::env::var("INGEST_LOG_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            site_location: optional("SITE_LOCATION", "North West Sydney, NSW, Australia"),
            site_name: optional("SITE_NAME", "Garage/Nerd Grotto"),
            offset_note: optional("OFFSET_NOTE", DEFAULT_OFFSET_NOTE),
            dst_note: optional("DST_NOTE", DEFAULT_DST_NOTE),
        })
    }
}

/// Parse an IANA zone name such as `"Australia/Sydney"`.
pub fn parse_timezone(raw: &str) -> Result<Tz> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("unknown time zone {raw:?}: {e}"))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
