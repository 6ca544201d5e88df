use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("Network request failed for {0}")]
    Network(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode reading from {url}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
