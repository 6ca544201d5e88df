//! Defines the canonical [`Reading`] record produced by the station firmware and
//! stored row-for-row in the hosted history table.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single timestamped weather observation.
///
/// The schema is the union of every field the station firmware has ever
/// reported. Only the timestamp is mandatory; each sensor field is optional so
/// that a device with a missing or failed sensor still produces a valid
/// reading. Deserialization fails if `time` is absent or unparseable, which is
/// how malformed payloads are rejected at the fetch boundary.
///
/// # Examples
///
/// ```
/// use weatherdeck::Reading;
///
/// let json = r#"{"temperature": 21.5, "humidity": 60, "time": "2024-01-01T00:00:00Z"}"#;
/// let reading: Reading = serde_json::from_str(json).unwrap();
/// assert_eq!(reading.temperature, Some(21.5));
/// assert_eq!(reading.pressure, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Observation instant. Always present and orderable.
    #[serde(deserialize_with = "deserialize_time")]
    pub time: DateTime<Utc>,
    /// Air temperature in degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// Barometric pressure in hPa.
    pub pressure: Option<f64>,
    /// UV index (unitless).
    pub uv_index: Option<f64>,
    /// Precipitation in millimeters.
    pub precipitation: Option<f64>,
    /// Station altitude in meters, derived from pressure by the firmware.
    pub altitude: Option<f64>,
    /// Compass wind direction (e.g. "NW"), reported as text by the firmware.
    pub wind_direction: Option<String>,
    /// Wind speed in km/h.
    pub wind_speed: Option<f64>,
}

impl Reading {
    /// Creates a reading with the given timestamp and no sensor values.
    pub fn empty(time: DateTime<Utc>) -> Self {
        Self {
            time,
            temperature: None,
            humidity: None,
            pressure: None,
            uv_index: None,
            precipitation: None,
            altitude: None,
            wind_direction: None,
            wind_speed: None,
        }
    }
}

/// Accepts both RFC 3339 timestamps (the firmware) and offset-less
/// `timestamp` column values as returned by the hosted store.
fn deserialize_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
        .map_err(serde::de::Error::custom)
}
