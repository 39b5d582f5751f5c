//! Error types for offline-fetch
//!
//! These errors stay inside the crate's fetch/read boundary: the public
//! operations fold them into a [`FetchOutcome`](crate::outcome::FetchOutcome)
//! and surface them only through its diagnostics.

use thiserror::Error;

/// Errors raised by the on-disk cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// The cache name cannot be used as a single file name
    #[error("Invalid cache name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// Filesystem operation failed
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cached bytes could not be encoded or decoded as JSON
    #[error("Cache codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Errors raised while building a fetcher from configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No per-user cache directory exists on this platform (e.g. no home directory)
    #[error("Could not determine a cache directory; pass one explicitly")]
    NoCacheDir,

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors for parsing textual HTTP options (methods, encodings)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown HTTP method: '{0}'")]
    UnknownMethod(String),

    #[error("Unknown parameter encoding: '{0}'. Valid encodings: default, query, form, json")]
    UnknownEncoding(String),
}
