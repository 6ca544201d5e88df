//! This module provides the main entry point for the weather-station
//! dashboard client. It ties the device client, the hosted store client, and
//! the local history cache together behind one struct, so a consumer can
//! fetch the current reading, query a history range, or compute range
//! averages without wiring the pieces up by hand.

use crate::aggregate::AggregateSet;
use crate::config::Config;
use crate::error::WeatherDeckError;
use crate::history::cache::HistoryCache;
use crate::poller::Poller;
use crate::station::client::StationClient;
use crate::store::client::{SortOrder, StoreClient};
use crate::types::period::QueryPeriod;
use crate::types::reading::Reading;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use log::warn;
use std::path::PathBuf;

/// The main client for one weather-station setup.
///
/// A `WeatherDeck` owns a [`StationClient`] for the device, a [`StoreClient`]
/// for the hosted history table, and a [`HistoryCache`] for the last-seen
/// list. Construction resolves and creates the cache directory; everything
/// else is plain sequential function application — fetch, optionally
/// aggregate, present.
///
/// # Examples
///
/// ```no_run
/// # use weatherdeck::{WeatherDeck, WeatherDeckError, reading_metrics};
/// # async fn run() -> Result<(), WeatherDeckError> {
/// // Reads STATION_URL, STORE_URL, STORE_API_KEY (and friends) from the env.
/// let deck = WeatherDeck::new().await?;
///
/// let reading = deck.current().await?;
/// for metric in reading_metrics(&reading) {
///     println!("{metric}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct WeatherDeck {
    config: Config,
    station: StationClient,
    store: StoreClient,
    cache: HistoryCache,
}

#[bon]
impl WeatherDeck {
    /// Creates a client from environment configuration and the default cache
    /// directory (e.g. `~/.cache/weatherdeck_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`WeatherDeckError::Config`] when a required variable is
    /// missing or invalid, and [`WeatherDeckError::CacheDirResolution`] /
    /// [`WeatherDeckError::CacheDirCreation`] when the cache directory cannot
    /// be set up.
    pub async fn new() -> Result<Self, WeatherDeckError> {
        let config = Config::from_env()?;
        Self::with_config(config).await
    }

    /// Creates a client from an explicit [`Config`], using the default cache
    /// directory.
    pub async fn with_config(config: Config) -> Result<Self, WeatherDeckError> {
        let cache_folder = get_cache_dir().map_err(WeatherDeckError::CacheDirResolution)?;
        Self::with_cache_folder(config, cache_folder).await
    }

    /// Creates a client with full control over the cache location.
    ///
    /// The directory is created if it does not exist.
    pub async fn with_cache_folder(
        config: Config,
        cache_folder: PathBuf,
    ) -> Result<Self, WeatherDeckError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| WeatherDeckError::CacheDirCreation(cache_folder.clone(), e))?;

        let station = StationClient::new(config.station_url.clone());
        let store = StoreClient::builder()
            .base_url(config.store_url.clone())
            .api_key(config.store_api_key.clone())
            .table(config.store_table.clone())
            .tz_offset(config.tz_offset)
            .build();
        let cache = HistoryCache::new(&cache_folder, config.history_cache_cap);

        Ok(Self {
            config,
            station,
            store,
            cache,
        })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Direct access to the device client.
    pub fn station(&self) -> &StationClient {
        &self.station
    }

    /// Direct access to the store client.
    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    /// Fetches the current reading from the device.
    pub async fn current(&self) -> Result<Reading, WeatherDeckError> {
        Ok(self.station.current().await?)
    }

    /// Fetches the device's recent-history list and opportunistically updates
    /// the local cache with it. A cache write failure is logged and ignored;
    /// the fetched list is still returned.
    pub async fn station_history(&self) -> Result<Vec<Reading>, WeatherDeckError> {
        let history = self.station.history().await?;
        if let Err(e) = self.cache.store(&history).await {
            warn!("Failed to update history cache: {}", e);
        }
        Ok(history)
    }

    /// The last history list this client (or a previous run) observed,
    /// newest first. Empty when nothing has been cached yet.
    pub async fn cached_history(&self) -> Result<Vec<Reading>, WeatherDeckError> {
        Ok(self.cache.load().await?)
    }

    /// Fetches all stored readings inside `period` from the hosted store.
    ///
    /// This method uses a builder pattern; see
    /// [`StoreClient::select_range`](crate::StoreClient) for the period,
    /// ordering, and limit semantics.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use weatherdeck::{WeatherDeck, WeatherDeckError, SortOrder};
    /// # async fn run(deck: WeatherDeck) -> Result<(), WeatherDeckError> {
    /// let rows = deck
    ///     .select_range("2024-03-10")
    ///     .order(SortOrder::Ascending)
    ///     .call()
    ///     .await?;
    /// println!("{} readings on 2024-03-10", rows.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder(start_fn = select_range)]
    #[doc(hidden)]
    pub async fn build_select_range<P: QueryPeriod>(
        &self,
        #[builder(start_fn)] period: P,
        order: Option<SortOrder>,
        limit: Option<u32>,
    ) -> Result<Vec<Reading>, WeatherDeckError> {
        Ok(self
            .store
            .select_range(period)
            .maybe_order(order)
            .maybe_limit(limit)
            .call()
            .await?)
    }

    /// Queries `period` and reduces the result to per-field means.
    ///
    /// The aggregate is recomputed from scratch on every call; an empty query
    /// result yields the defined all-zero aggregate.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use weatherdeck::{WeatherDeck, WeatherDeckError, aggregate_metrics};
    /// # use chrono::NaiveDate;
    /// # async fn run(deck: WeatherDeck) -> Result<(), WeatherDeckError> {
    /// let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    /// let averages = deck.averages(day).await?;
    /// for metric in aggregate_metrics(&averages) {
    ///     println!("{metric}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn averages<P: QueryPeriod>(
        &self,
        period: P,
    ) -> Result<AggregateSet, WeatherDeckError> {
        let readings = self.store.select_range(period).call().await?;
        Ok(AggregateSet::from_readings(&readings))
    }

    /// Spawns a background [`Poller`] against the device using the configured
    /// poll interval.
    pub fn poller(&self) -> Poller {
        Poller::spawn(self.station.clone(), self.config.poll_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::{reading_metrics, MetricValue};
    use chrono::FixedOffset;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn deck_for(station: &MockServer, store: &MockServer) -> (WeatherDeck, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::builder()
            .station_url(station.uri())
            .store_url(store.uri())
            .store_api_key("test-key")
            .poll_interval(Duration::from_secs(1))
            .tz_offset(FixedOffset::east_opt(0).unwrap())
            .build();
        let deck = WeatherDeck::with_cache_folder(config, dir.path().to_path_buf())
            .await
            .unwrap();
        (deck, dir)
    }

    #[tokio::test]
    async fn current_reading_flows_through_to_display_triples() {
        let station = MockServer::start().await;
        let store = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"temperature": 21.5, "humidity": 60, "time": "2024-01-01T00:00:00Z"}"#,
                "application/json",
            ))
            .mount(&station)
            .await;

        let (deck, _dir) = deck_for(&station, &store).await;
        let reading = deck.current().await.unwrap();
        let metrics = reading_metrics(&reading);

        assert!(metrics.iter().any(|m| {
            m.label == "Temperature" && m.value == MetricValue::Number(21.5) && m.unit == "°C"
        }));
        assert!(metrics.iter().any(|m| {
            m.label == "Humidity" && m.value == MetricValue::Number(60.0) && m.unit == "%"
        }));
        assert_eq!(metrics.len(), 2);
    }

    #[tokio::test]
    async fn averages_reduce_a_range_query() {
        let station = MockServer::start().await;
        let store = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/hourly_conditions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[
                    {"temperature": 10.0, "humidity": 40, "time": "2024-03-10T06:00:00Z"},
                    {"temperature": 20.0, "humidity": 60, "time": "2024-03-10T18:00:00Z"}
                ]"#,
                "application/json",
            ))
            .mount(&store)
            .await;

        let (deck, _dir) = deck_for(&station, &store).await;
        let averages = deck.averages("2024-03-10").await.unwrap();

        assert_eq!(averages.temperature, 15.0);
        assert_eq!(averages.humidity, 50.0);
        assert_eq!(averages.sample_count, 2);
        assert_eq!(averages.pressure, 0.0);
    }

    #[tokio::test]
    async fn averages_of_an_empty_day_are_all_zero() {
        let station = MockServer::start().await;
        let store = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/hourly_conditions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .mount(&store)
            .await;

        let (deck, _dir) = deck_for(&station, &store).await;
        let averages = deck.averages("2024-03-10").await.unwrap();
        assert_eq!(averages, AggregateSet::default());
    }

    #[tokio::test]
    async fn station_history_populates_the_cache() {
        let station = MockServer::start().await;
        let store = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/history"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"[
                    {"temperature": 20.0, "time": "2024-01-01T00:00:00Z"},
                    {"temperature": 21.0, "time": "2024-01-01T01:00:00Z"}
                ]"#,
                "application/json",
            ))
            .mount(&station)
            .await;

        let (deck, _dir) = deck_for(&station, &store).await;
        assert!(deck.cached_history().await.unwrap().is_empty());

        let fetched = deck.station_history().await.unwrap();
        assert_eq!(fetched.len(), 2);

        let cached = deck.cached_history().await.unwrap();
        assert_eq!(cached.len(), 2);
        assert_eq!(cached[0].temperature, Some(21.0)); // newest first
    }

    #[tokio::test]
    async fn select_range_forwards_order_and_limit() {
        let station = MockServer::start().await;
        let store = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/hourly_conditions"))
            .and(wiremock::matchers::query_param_contains("order", "time.desc"))
            .and(wiremock::matchers::query_param_contains("limit", "24"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
            .expect(1)
            .mount(&store)
            .await;

        let (deck, _dir) = deck_for(&station, &store).await;
        deck.select_range("2024-03-10")
            .order(SortOrder::Descending)
            .limit(24)
            .call()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_error() {
        let station = MockServer::start().await;
        let store = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&store)
            .await;

        let (deck, _dir) = deck_for(&station, &store).await;
        assert!(matches!(
            deck.averages("2024-03-10").await,
            Err(WeatherDeckError::Store(_))
        ));
    }
}
