pub mod timestamp;

use std::fmt::Write;

pub use timestamp::ReportClock;

use crate::api::dto::{text, SensorForm};

/// Width of the label column, `"Approx. Dew Point: "` being the longest.
const LABEL_WIDTH: usize = 19;

/// Compose the snapshot report for one ingest.
///
/// The layout is fixed: every line is always present and a missing field
/// leaves its slot empty. The same form and clock always produce the same
/// text.
pub fn compose(form: &SensorForm, clock: &ReportClock) -> String {
    let mut r = Composer {
        out: String::with_capacity(1024),
        clock,
    };

    let time_label = format!("{} time:", clock.label());
    r.line(&time_label, &clock.local(text(&form.time_stamp)));
    r.line("UTC time:", &clock.utc(text(&form.time_stamp)));
    r.gap();

    r.line("Sunrise today:", text(&form.sunrise));
    r.line("Sunset today:", text(&form.sunset));
    r.line("Sunrise tomorrow:", text(&form.sunrise_tomorrow));
    r.line("Sunset tomorrow:", text(&form.sunset_tomorrow));
    r.gap();

    let temperature = format!("{}°C, {}°F", text(&form.temperature), text(&form.temp_far));
    r.line("Temperature:", &temperature);
    r.extreme("Max. Temperature:", &form.max_temp, "°C", &form.max_temp_timestamp);
    r.extreme("Min. Temperature:", &form.min_temp, "°C", &form.min_temp_timestamp);
    r.gap();

    r.line("Humidity:", &format!("{}%", text(&form.humidity)));
    r.extreme("Max. Humidity:", &form.max_humidity, "%", &form.max_humidity_timestamp);
    r.extreme("Min. Humidity:", &form.min_humidity, "%", &form.min_humidity_timestamp);
    r.gap();

    let dew_point = format!("{}°C {}", text(&form.dew_point), text(&form.dew_point_feeling));
    r.line("Approx. Dew Point:", &dew_point);
    r.extreme("Max. Dew Point:", &form.max_dew_point, "°C", &form.max_dew_point_timestamp);
    r.extreme("Min. Dew Point:", &form.min_dew_point, "°C", &form.min_dew_point_timestamp);
    r.gap();

    r.line("Pressure:", &format!("{}hPa", text(&form.pressure)));
    r.extreme("Max. Pressure:", &form.max_pressure, "hPa", &form.max_pressure_timestamp);
    r.extreme("Min. Pressure:", &form.min_pressure, "hPa", &form.min_pressure_timestamp);
    r.gap();

    r.line("Ambient Light:", &format!("{}/1023", text(&form.ldr)));
    r.line("Arduino Restart:", &clock.local(text(&form.uptime)));

    r.out
}

struct Composer<'a> {
    out: String,
    clock: &'a ReportClock,
}

impl Composer<'_> {
    fn line(&mut self, label: &str, value: &str) {
        // Writing into a String cannot fail.
        let _ = writeln!(self.out, "{label:<LABEL_WIDTH$}{value}");
    }

    /// `<value><unit> @ <local time of the extreme>`
    fn extreme(&mut self, label: &str, value: &Option<String>, unit: &str, at: &Option<String>) {
        let at = self.clock.local(text(at));
        let value = format!("{}{unit} @ {at}", text(value));
        self.line(label, &value);
    }

    fn gap(&mut self) {
        self.out.push('\n');
    }
}
