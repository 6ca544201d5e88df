mod aggregate;
mod config;
mod deck;
mod error;
mod history;
mod poller;
mod present;
mod station;
mod store;
mod types;
mod utils;

pub use error::WeatherDeckError;
pub use deck::WeatherDeck;

pub use aggregate::AggregateSet;
pub use config::{Config, ConfigError};
pub use poller::{PollSnapshot, Poller};
pub use present::{aggregate_metrics, reading_metrics, Metric, MetricValue};

pub use types::period::{Month, QueryPeriod, TimeRange, Year};
pub use types::reading::Reading;

pub use history::cache::HistoryCache;
pub use history::error::HistoryCacheError;
pub use station::client::StationClient;
pub use station::error::StationError;
pub use store::client::{SortOrder, StoreClient};
pub use store::error::StoreError;
