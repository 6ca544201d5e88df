//! Runtime configuration for the station endpoint, the hosted store, and the
//! poll cadence.
//!
//! All values load from the environment in one place so no other module reads
//! `env::var` directly. Programmatic construction goes through the
//! [`Config::builder`] instead.
//!
//! # Environment Variables
//! - `STATION_URL` (**required**) – base URL of the station device
//! - `STORE_URL` (**required**) – base URL of the hosted store
//! - `STORE_API_KEY` (**required**) – store credential
//! - `STORE_TABLE` (optional) – history table name (default: `hourly_conditions`)
//! - `POLL_INTERVAL_SECS` (optional) – poll cadence, clamped to 1–600 (default: 60)
//! - `STATION_TZ_OFFSET` (optional) – `±HH:MM` local offset for day widening (default: `+00:00`)
//! - `HISTORY_CACHE_CAP` (optional) – readings kept in the local cache (default: 50)

use bon::bon;
use chrono::FixedOffset;
use log::info;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default history table, matching the store schema the firmware writes to.
pub const DEFAULT_STORE_TABLE: &str = "hourly_conditions";

/// Fastest poll cadence seen across dashboard revisions.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Slowest poll cadence seen across dashboard revisions.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_secs(600);

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_HISTORY_CACHE_CAP: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    MissingVar(&'static str),

    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Immutable configuration snapshot for one [`crate::WeatherDeck`] instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the station device (e.g. `http://192.168.5.85`).
    pub station_url: String,
    /// Base URL of the hosted store (e.g. `https://abc.supabase.co`).
    pub store_url: String,
    /// Store API key, sent as both `apikey` and bearer token.
    pub store_api_key: String,
    /// History table to query.
    pub store_table: String,
    /// Poll cadence, always within `[MIN_POLL_INTERVAL, MAX_POLL_INTERVAL]`.
    pub poll_interval: Duration,
    /// The station's local UTC offset, used to widen single-day queries.
    pub tz_offset: FixedOffset,
    /// Maximum readings kept in the local history cache.
    pub history_cache_cap: usize,
}

#[bon]
impl Config {
    /// Builds a configuration programmatically.
    ///
    /// Only the three endpoint/credential values are required; everything else
    /// takes the documented default. The poll interval is clamped to the
    /// supported band.
    ///
    /// # Examples
    ///
    /// ```
    /// use weatherdeck::Config;
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .station_url("http://192.168.5.85")
    ///     .store_url("https://example.supabase.co")
    ///     .store_api_key("service-key")
    ///     .poll_interval(Duration::from_secs(5))
    ///     .build();
    /// assert_eq!(config.store_table, "hourly_conditions");
    /// ```
    #[builder]
    pub fn new(
        #[builder(into)] station_url: String,
        #[builder(into)] store_url: String,
        #[builder(into)] store_api_key: String,
        #[builder(into)] store_table: Option<String>,
        poll_interval: Option<Duration>,
        tz_offset: Option<FixedOffset>,
        history_cache_cap: Option<usize>,
    ) -> Self {
        Self {
            station_url: trim_base_url(station_url),
            store_url: trim_base_url(store_url),
            store_api_key,
            store_table: store_table.unwrap_or_else(|| DEFAULT_STORE_TABLE.to_string()),
            poll_interval: clamp_poll_interval(poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL)),
            tz_offset: tz_offset.unwrap_or_else(utc_offset),
            history_cache_cap: history_cache_cap.unwrap_or(DEFAULT_HISTORY_CACHE_CAP),
        }
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Loads configuration through an arbitrary lookup, so tests don't have to
    /// mutate process-global environment variables.
    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let station_url = require(&lookup, "STATION_URL")?;
        let store_url = require(&lookup, "STORE_URL")?;
        let store_api_key = require(&lookup, "STORE_API_KEY")?;

        let poll_interval = match lookup("POLL_INTERVAL_SECS") {
            None => DEFAULT_POLL_INTERVAL,
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidVar {
                    var: "POLL_INTERVAL_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                clamp_poll_interval(Duration::from_secs(secs))
            }
        };

        let tz_offset = match lookup("STATION_TZ_OFFSET") {
            None => utc_offset(),
            Some(raw) => parse_offset(&raw).ok_or_else(|| ConfigError::InvalidVar {
                var: "STATION_TZ_OFFSET",
                value: raw.clone(),
                reason: "expected ±HH:MM".to_string(),
            })?,
        };

        let history_cache_cap = match lookup("HISTORY_CACHE_CAP") {
            None => DEFAULT_HISTORY_CACHE_CAP,
            Some(raw) => raw.parse::<usize>().map_err(|e| ConfigError::InvalidVar {
                var: "HISTORY_CACHE_CAP",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
        };

        Ok(Self {
            station_url: trim_base_url(station_url),
            store_url: trim_base_url(store_url),
            store_api_key,
            store_table: lookup("STORE_TABLE").unwrap_or_else(|| DEFAULT_STORE_TABLE.to_string()),
            poll_interval,
            tz_offset,
            history_cache_cap,
        })
    }

    /// Logs the loaded configuration with the store key masked.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  STATION_URL       : {}", self.station_url);
        info!("  STORE_URL         : {}", self.store_url);
        info!("  STORE_API_KEY     : {}", mask_key(&self.store_api_key));
        info!("  STORE_TABLE       : {}", self.store_table);
        info!("  POLL_INTERVAL_SECS: {}", self.poll_interval.as_secs());
        info!("  STATION_TZ_OFFSET : {}", self.tz_offset);
        info!("  HISTORY_CACHE_CAP : {}", self.history_cache_cap);
    }
}

fn require(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<String, ConfigError> {
    lookup(var)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(var))
}

fn clamp_poll_interval(interval: Duration) -> Duration {
    interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL)
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap_or_else(|| unreachable!("zero offset is always valid"))
}

/// Parses a `±HH:MM` offset string.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => (1, raw),
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours = hours.parse::<i32>().ok()?;
    let minutes = minutes.parse::<i32>().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn mask_key(key: &str) -> String {
    // Count characters, not bytes, so a multibyte key never splits mid-char.
    if key.chars().count() <= 4 {
        "****".to_string()
    } else {
        let prefix: String = key.chars().take(4).collect();
        format!("{prefix}****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, String> {
        HashMap::from([
            ("STATION_URL", "http://192.168.5.85/".to_string()),
            ("STORE_URL", "https://example.supabase.co".to_string()),
            ("STORE_API_KEY", "abcdef123456".to_string()),
        ])
    }

    fn load(vars: &HashMap<&'static str, String>) -> Result<Config, ConfigError> {
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn loads_with_defaults() {
        let config = load(&base_vars()).unwrap();
        assert_eq!(config.station_url, "http://192.168.5.85"); // trailing slash trimmed
        assert_eq!(config.store_table, DEFAULT_STORE_TABLE);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.tz_offset.local_minus_utc(), 0);
        assert_eq!(config.history_cache_cap, 50);
    }

    #[test]
    fn missing_station_url_errors() {
        let mut vars = base_vars();
        vars.remove("STATION_URL");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::MissingVar("STATION_URL"))
        ));
    }

    #[test]
    fn empty_required_value_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert("STORE_API_KEY", String::new());
        assert!(matches!(
            load(&vars),
            Err(ConfigError::MissingVar("STORE_API_KEY"))
        ));
    }

    #[test]
    fn poll_interval_is_clamped_to_supported_band() {
        let mut vars = base_vars();
        vars.insert("POLL_INTERVAL_SECS", "0".to_string());
        assert_eq!(load(&vars).unwrap().poll_interval, MIN_POLL_INTERVAL);

        vars.insert("POLL_INTERVAL_SECS", "4000".to_string());
        assert_eq!(load(&vars).unwrap().poll_interval, MAX_POLL_INTERVAL);

        vars.insert("POLL_INTERVAL_SECS", "30".to_string());
        assert_eq!(load(&vars).unwrap().poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn bad_poll_interval_errors() {
        let mut vars = base_vars();
        vars.insert("POLL_INTERVAL_SECS", "soon".to_string());
        assert!(matches!(load(&vars), Err(ConfigError::InvalidVar { .. })));
    }

    #[test]
    fn offset_parsing() {
        assert_eq!(parse_offset("+01:00").unwrap().local_minus_utc(), 3600);
        assert_eq!(parse_offset("-05:30").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert_eq!(parse_offset("00:00").unwrap().local_minus_utc(), 0);
        assert!(parse_offset("25:00").is_none());
        assert!(parse_offset("bogus").is_none());
    }

    #[test]
    fn tz_offset_env_round_trip() {
        let mut vars = base_vars();
        vars.insert("STATION_TZ_OFFSET", "+01:00".to_string());
        assert_eq!(load(&vars).unwrap().tz_offset.local_minus_utc(), 3600);
    }

    #[test]
    fn builder_applies_same_defaults() {
        let config = Config::builder()
            .station_url("http://station.local/")
            .store_url("https://example.supabase.co")
            .store_api_key("key")
            .poll_interval(Duration::from_secs(7200))
            .build();
        assert_eq!(config.station_url, "http://station.local");
        assert_eq!(config.poll_interval, MAX_POLL_INTERVAL);
        assert_eq!(config.store_table, DEFAULT_STORE_TABLE);
    }

    #[test]
    fn key_masking_keeps_only_a_prefix() {
        assert_eq!(mask_key("abcdef123456"), "abcd****");
        assert_eq!(mask_key("abc"), "****");
    }

    #[test]
    fn key_masking_handles_multibyte_keys() {
        assert_eq!(mask_key("aaa日本"), "aaa日****");
        assert_eq!(mask_key("日本"), "****");
    }
}
