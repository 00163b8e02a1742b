use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// `H:i:s j-M-Y (D)`, e.g. `09:13:20 15-Nov-2023 (Wed)`.
const DISPLAY_FORMAT: &str = "%H:%M:%S %-d-%b-%Y (%a)";

/// Renders the epoch timestamps sent by the sensor.
///
/// The sensor sends every timestamp as a decimal string. Anything that does
/// not describe a representable instant renders as empty text.
#[derive(Debug, Clone)]
pub struct ReportClock {
    zone: Tz,
    label: String,
}

impl ReportClock {
    pub fn new(zone: Tz, label: impl Into<String>) -> Self {
        Self {
            zone,
            label: label.into(),
        }
    }

    /// Place name for the local time line, e.g. `"Sydney"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn local(&self, raw: &str) -> String {
        format_in(&self.zone, raw)
    }

    pub fn utc(&self, raw: &str) -> String {
        format_in(&Utc, raw)
    }
}

fn format_in<Z: TimeZone>(zone: &Z, raw: &str) -> String
where
    Z::Offset: std::fmt::Display,
{
    parse_epoch(raw)
        .map(|instant| instant.with_timezone(zone).format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// Integer strings are whole seconds; decimal strings are truncated toward zero.
fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let secs = match raw.parse::<i64>() {
        Ok(secs) => secs,
        Err(_) => {
            let secs = raw.parse::<f64>().ok().filter(|v| v.is_finite())?.trunc();
            if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
                return None;
            }
            secs as i64
        }
    };
    DateTime::from_timestamp(secs, 0)
}
