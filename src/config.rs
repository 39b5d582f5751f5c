//! Fetcher configuration
//!
//! Nothing here is persisted or read from the environment; callers (and the
//! CLI) fill in a `FetcherConfig` explicitly.

use std::path::PathBuf;
use std::time::Duration;

/// User agent sent by the default transport
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings for building an [`OfflineFallbackFetcher`](crate::OfflineFallbackFetcher)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Cache directory; the platform's per-user cache directory when `None`
    pub cache_dir: Option<PathBuf>,
    /// Overall request timeout; reqwest's default (none) when `None`
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
