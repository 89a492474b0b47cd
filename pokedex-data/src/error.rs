//! Error types produced by the ingestion pipeline.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Transport-level errors encountered while talking to the catalogue API.
///
/// Every variant is treated as transient by the worker pool: the item is
/// retried once before being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description reported by the client.
        message: String,
    },
    /// The request never produced a response.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Error description reported by the client.
        message: String,
        /// Whether the request deadline expired.
        timed_out: bool,
    },
    /// The response body did not match the expected resource shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Fully qualified request URL.
        url: String,
        /// Decoder error message.
        message: String,
    },
}

impl TransportError {
    /// URL of the request that failed.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Http { url, .. } | Self::Network { url, .. } | Self::Decode { url, .. } => url,
        }
    }
}

/// Errors that abort an ingestion run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// The options failed validation before any request was made.
    #[error("invalid ingest options: {reason}")]
    InvalidOptions {
        /// Which constraint was violated.
        reason: &'static str,
    },
    /// The index listing could not be fetched.
    #[error("failed to fetch the catalogue index: {source}")]
    FetchIndex {
        /// Transport failure reported by the source.
        #[source]
        source: TransportError,
    },
    /// The records could not be encoded as JSON.
    #[error("failed to serialise dataset: {source}")]
    SerialiseDataset {
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Writing the dataset file failed.
    #[error("failed to write dataset to {path:?}: {source}")]
    WriteDataset {
        /// Destination file.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}
