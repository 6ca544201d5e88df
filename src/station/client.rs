//! HTTP client for the weather-station device itself.
//!
//! The firmware exposes two endpoints: the base URL returns the current
//! reading as a single JSON object, and `/history` returns the device's
//! recent-readings ring buffer as a JSON array.

use crate::station::error::StationError;
use crate::types::reading::Reading;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Client for one station device.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Examples
///
/// ```no_run
/// # use weatherdeck::{StationClient, StationError};
/// # async fn run() -> Result<(), StationError> {
/// let station = StationClient::new("http://192.168.5.85");
/// let reading = station.current().await?;
/// println!("Temperature: {:?}", reading.temperature);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StationClient {
    base_url: String,
    client: Client,
}

impl StationClient {
    /// Creates a client for the device at `base_url`. A trailing slash is
    /// tolerated and removed.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// The configured device base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the current reading from the device.
    ///
    /// # Errors
    ///
    /// * [`StationError::Network`] when the request cannot be sent or the
    ///   connection drops.
    /// * [`StationError::HttpStatus`] on a non-2xx response.
    /// * [`StationError::Parse`] when the body is not a valid reading
    ///   (including a missing `time` field).
    pub async fn current(&self) -> Result<Reading, StationError> {
        self.get_json(self.base_url.clone()).await
    }

    /// Fetches the device's recent-history list. An empty array is valid.
    pub async fn history(&self) -> Result<Vec<Reading>, StationError> {
        self.get_json(format!("{}/history", self.base_url)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, StationError> {
        debug!("Requesting station data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StationError::Network(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Station returned an error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    StationError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    StationError::Network(url, e)
                });
            }
        };

        response
            .json::<T>()
            .await
            .map_err(|e| StationError::Parse { url, source: e })
    }
}
