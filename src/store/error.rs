use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Period does not describe a valid query window")]
    InvalidPeriod,

    #[error("Network request failed for {0}")]
    Network(String, #[source] reqwest::Error),

    #[error("Store query failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode store rows from {url}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
