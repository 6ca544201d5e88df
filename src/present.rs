//! Maps readings and aggregates into display triples for the dashboard cards.

use crate::aggregate::AggregateSet;
use crate::types::reading::Reading;
use std::fmt;

/// The value slot of a display triple.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{n}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// One `(label, value, unit)` triple, the unit of display on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: MetricValue,
    pub unit: &'static str,
}

impl Metric {
    fn number(label: &'static str, value: f64, unit: &'static str) -> Self {
        Self {
            label,
            value: MetricValue::Number(value),
            unit,
        }
    }

    fn text(label: &'static str, value: String, unit: &'static str) -> Self {
        Self {
            label,
            value: MetricValue::Text(value),
            unit,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}: {}", self.label, self.value)
        } else {
            write!(f, "{}: {} {}", self.label, self.value, self.unit)
        }
    }
}

/// Maps a reading into its card triples, in fixed card order.
///
/// Fields the reading does not carry are omitted from the output rather than
/// rendered blank, so a station without a rain gauge simply shows no
/// precipitation card.
///
/// # Examples
///
/// ```
/// use weatherdeck::{reading_metrics, Reading};
/// use chrono::Utc;
///
/// let mut reading = Reading::empty(Utc::now());
/// reading.temperature = Some(21.5);
///
/// let metrics = reading_metrics(&reading);
/// assert_eq!(metrics.len(), 1);
/// assert_eq!(metrics[0].label, "Temperature");
/// assert_eq!(metrics[0].unit, "°C");
/// ```
pub fn reading_metrics(reading: &Reading) -> Vec<Metric> {
    let mut metrics = Vec::new();
    if let Some(v) = reading.temperature {
        metrics.push(Metric::number("Temperature", v, "°C"));
    }
    if let Some(v) = reading.humidity {
        metrics.push(Metric::number("Humidity", v, "%"));
    }
    if let Some(v) = reading.pressure {
        metrics.push(Metric::number("Pressure", v, "hPa"));
    }
    if let Some(v) = reading.uv_index {
        metrics.push(Metric::number("UV Index", v, ""));
    }
    if let Some(v) = reading.precipitation {
        metrics.push(Metric::number("Precipitation", v, "mm"));
    }
    if let Some(v) = reading.altitude {
        metrics.push(Metric::number("Altitude", v, "m"));
    }
    if let Some(v) = &reading.wind_direction {
        metrics.push(Metric::text("Wind Direction", v.clone(), ""));
    }
    if let Some(v) = reading.wind_speed {
        metrics.push(Metric::number("Wind Speed", v, "km/h"));
    }
    metrics
}

/// Maps an aggregate into the averages panel triples.
///
/// Means are totals over the queried set, so every triple is always present;
/// a field no reading carried shows its defined zero mean.
pub fn aggregate_metrics(aggregate: &AggregateSet) -> Vec<Metric> {
    vec![
        Metric::number("Temperature", aggregate.temperature, "°C"),
        Metric::number("Humidity", aggregate.humidity, "%"),
        Metric::number("Pressure", aggregate.pressure, "hPa"),
        Metric::number("Precipitation", aggregate.precipitation, "mm"),
        Metric::number("UV Index", aggregate.uv_index, ""),
    ]
}
