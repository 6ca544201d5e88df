//! Client-side aggregation over a queried set of readings.

use crate::types::reading::Reading;
use serde::Serialize;

/// Per-field arithmetic means over one range-query result.
///
/// An `AggregateSet` is ephemeral: it is recomputed from scratch for every
/// query response and replaced by the next one. Each mean is rounded to two
/// decimal places. An empty input set yields the all-zero aggregate with
/// `sample_count == 0`.
///
/// Fields missing from a reading are excluded from that field's mean entirely:
/// they contribute to neither the sum nor the divisor. A field reported by no
/// reading in the set averages to `0.0`.
///
/// # Examples
///
/// ```
/// use weatherdeck::{AggregateSet, Reading};
/// use chrono::Utc;
///
/// let mut a = Reading::empty(Utc::now());
/// a.temperature = Some(10.0);
/// let mut b = Reading::empty(Utc::now());
/// b.temperature = Some(20.0);
///
/// let agg = AggregateSet::from_readings(&[a, b]);
/// assert_eq!(agg.temperature, 15.0);
/// assert_eq!(agg.sample_count, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregateSet {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub uv_index: f64,
    pub precipitation: f64,
    pub altitude: f64,
    pub wind_speed: f64,
    /// Number of readings the aggregate was computed from.
    pub sample_count: usize,
}

impl AggregateSet {
    /// Computes the per-field means for `readings`.
    pub fn from_readings(readings: &[Reading]) -> Self {
        Self {
            temperature: mean_of(readings, |r| r.temperature),
            humidity: mean_of(readings, |r| r.humidity),
            pressure: mean_of(readings, |r| r.pressure),
            uv_index: mean_of(readings, |r| r.uv_index),
            precipitation: mean_of(readings, |r| r.precipitation),
            altitude: mean_of(readings, |r| r.altitude),
            wind_speed: mean_of(readings, |r| r.wind_speed),
            sample_count: readings.len(),
        }
    }
}

fn mean_of(readings: &[Reading], field: impl Fn(&Reading) -> Option<f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for reading in readings {
        if let Some(value) = field(reading) {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        round2(sum / count as f64)
    }
}

/// Rounds to two decimal places, the precision shown on the dashboard cards.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
