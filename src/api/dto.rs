use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Form body posted by the weather station.
///
/// Every field is optional. The station is trusted: values are kept as the
/// raw strings it sent and are never range-checked. A field that was not
/// sent renders as empty text in the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SensorForm {
    /// Degrees Celsius. Its presence marks a request as an ingest.
    pub temperature: Option<String>,
    /// Degrees Fahrenheit
    pub temp_far: Option<String>,
    /// Epoch seconds of the reading
    pub time_stamp: Option<String>,
    /// Relative humidity percentage
    pub humidity: Option<String>,
    /// hPa
    pub pressure: Option<String>,
    /// Raw light sensor value, 0..=1023
    pub ldr: Option<String>,
    pub max_temp: Option<String>,
    pub min_temp: Option<String>,
    pub max_temp_timestamp: Option<String>,
    pub min_temp_timestamp: Option<String>,
    pub min_humidity: Option<String>,
    pub max_humidity: Option<String>,
    pub max_humidity_timestamp: Option<String>,
    pub min_humidity_timestamp: Option<String>,
    pub min_pressure: Option<String>,
    pub max_pressure: Option<String>,
    pub max_pressure_timestamp: Option<String>,
    pub min_pressure_timestamp: Option<String>,
    /// Epoch seconds of the last station restart
    pub uptime: Option<String>,
    pub dew_point: Option<String>,
    pub max_dew_point: Option<String>,
    pub min_dew_point: Option<String>,
    pub max_dew_point_timestamp: Option<String>,
    pub min_dew_point_timestamp: Option<String>,
    /// Qualitative label such as `"Comfortable"`
    pub dew_point_feeling: Option<String>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub sunrise_tomorrow: Option<String>,
    pub sunset_tomorrow: Option<String>,
}

impl SensorForm {
    /// A body carrying `temperature`, even an empty one, is an ingest.
    pub fn is_ingest(&self) -> bool {
        self.temperature.is_some()
    }
}

/// Builds the form from raw body pairs. A repeated key keeps its last value
/// and unknown keys are ignored.
impl FromIterator<(String, String)> for SensorForm {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "temperature" => &mut form.temperature,
                "tempFar" => &mut form.temp_far,
                "timeStamp" => &mut form.time_stamp,
                "humidity" => &mut form.humidity,
                "pressure" => &mut form.pressure,
                "ldr" => &mut form.ldr,
                "maxTemp" => &mut form.max_temp,
                "minTemp" => &mut form.min_temp,
                "maxTempTimestamp" => &mut form.max_temp_timestamp,
                "minTempTimestamp" => &mut form.min_temp_timestamp,
                "minHumidity" => &mut form.min_humidity,
                "maxHumidity" => &mut form.max_humidity,
                "maxHumidityTimestamp" => &mut form.max_humidity_timestamp,
                "minHumidityTimestamp" => &mut form.min_humidity_timestamp,
                "minPressure" => &mut form.min_pressure,
                "maxPressure" => &mut form.max_pressure,
                "maxPressureTimestamp" => &mut form.max_pressure_timestamp,
                "minPressureTimestamp" => &mut form.min_pressure_timestamp,
                "uptime" => &mut form.uptime,
                "dewPoint" => &mut form.dew_point,
                "maxDewPoint" => &mut form.max_dew_point,
                "minDewPoint" => &mut form.min_dew_point,
                "maxDewPointTimestamp" => &mut form.max_dew_point_timestamp,
                "minDewPointTimestamp" => &mut form.min_dew_point_timestamp,
                "dewPointFeeling" => &mut form.dew_point_feeling,
                "sunrise" => &mut form.sunrise,
                "sunset" => &mut form.sunset,
                "sunriseTomorrow" => &mut form.sunrise_tomorrow,
                "sunsetTomorrow" => &mut form.sunset_tomorrow,
                _ => continue,
            };
            *slot = Some(value);
        }
        form
    }
}

/// Field lookup that turns a missing value into empty text.
pub fn text(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or_default()
}
