//! HTTP client for the hosted history store.
//!
//! The store speaks the PostgREST dialect (the dashboard's hosted database):
//! rows are selected from a fixed table with inclusive `gte.`/`lte.` filters
//! on the `time` column, authenticated by an API key sent as both `apikey`
//! header and bearer token.

use crate::store::error::StoreError;
use crate::types::period::{QueryPeriod, TimeRange};
use crate::types::reading::Reading;
use bon::bon;
use chrono::{FixedOffset, SecondsFormat};
use log::{debug, warn};
use reqwest::Client;

/// Requested sort direction on the `time` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn query_param(self) -> &'static str {
        match self {
            SortOrder::Ascending => "time.asc",
            SortOrder::Descending => "time.desc",
        }
    }
}

/// Client for the hosted readings table.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct StoreClient {
    base_url: String,
    api_key: String,
    table: String,
    tz_offset: FixedOffset,
    client: Client,
}

#[bon]
impl StoreClient {
    /// Creates a store client.
    ///
    /// `tz_offset` is the station's local offset, used when a period has to be
    /// widened to calendar-day boundaries.
    ///
    /// # Examples
    ///
    /// ```
    /// use weatherdeck::StoreClient;
    /// use chrono::FixedOffset;
    ///
    /// let store = StoreClient::builder()
    ///     .base_url("https://example.supabase.co")
    ///     .api_key("service-key")
    ///     .table("hourly_conditions")
    ///     .tz_offset(FixedOffset::east_opt(0).unwrap())
    ///     .build();
    /// ```
    #[builder]
    pub fn new(
        #[builder(into)] base_url: String,
        #[builder(into)] api_key: String,
        #[builder(into)] table: String,
        tz_offset: FixedOffset,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            table,
            tz_offset,
            client: Client::new(),
        }
    }

    /// Fetches all readings whose timestamp falls inside `period`, inclusive
    /// on both ends.
    ///
    /// This method uses a builder pattern: start it with the period, then
    /// optionally order or limit the result before `.call().await`.
    ///
    /// * `.order(SortOrder)`: Optional. Ask the store to sort by `time`.
    ///   Without it the store's default order is returned, which the contract
    ///   leaves unspecified.
    /// * `.limit(u32)`: Optional. Cap the number of rows returned.
    ///
    /// A period whose start lies after its end matches nothing and returns an
    /// empty vector without touching the network. An empty result is valid,
    /// not an error.
    ///
    /// # Errors
    ///
    /// * [`StoreError::InvalidPeriod`] when the period cannot be resolved to a
    ///   window (e.g. an unparseable date string).
    /// * [`StoreError::Network`] / [`StoreError::HttpStatus`] /
    ///   [`StoreError::Parse`] for transport, status, and body failures.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use weatherdeck::{StoreClient, StoreError, SortOrder};
    /// # use chrono::{FixedOffset, NaiveDate};
    /// # async fn run(store: StoreClient) -> Result<(), StoreError> {
    /// let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    /// let rows = store
    ///     .select_range(day)
    ///     .order(SortOrder::Ascending)
    ///     .limit(500)
    ///     .call()
    ///     .await?;
    /// println!("{} rows", rows.len());
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
    ) -> Result<Vec<Reading>, StoreError> {
        let range = period
            .time_range(self.tz_offset)
            .ok_or(StoreError::InvalidPeriod)?;

        if range.is_inverted() {
            debug!(
                "Query window {} > {} matches nothing, skipping request",
                range.start, range.end
            );
            return Ok(Vec::new());
        }

        self.fetch_rows(range, order, limit).await
    }

    async fn fetch_rows(
        &self,
        range: TimeRange,
        order: Option<SortOrder>,
        limit: Option<u32>,
    ) -> Result<Vec<Reading>, StoreError> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);

        let mut params = vec![
            ("select".to_string(), "*".to_string()),
            (
                "time".to_string(),
                format!("gte.{}", range.start.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
            (
                "time".to_string(),
                format!("lte.{}", range.end.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
        ];
        if let Some(order) = order {
            params.push(("order".to_string(), order.query_param().to_string()));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        debug!("Querying store rows from {} in {:?}", url, range);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StoreError::Network(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Store query failed for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    StoreError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    StoreError::Network(url, e)
                });
            }
        };

        response
            .json::<Vec<Reading>>()
            .await
            .map_err(|e| StoreError::Parse { url, source: e })
    }
}
