//! Online/offline fetcher
//!
//! `OfflineFallbackFetcher` performs a request and, when it yields a body,
//! hands it straight back; a 200 response is also written to the cache. When
//! the request yields nothing usable, the last cached body for the same name
//! is served instead. Failures never escape: each call resolves to exactly
//! one [`FetchOutcome`].

use serde_json::Value;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheName, CacheStore};
use crate::config::FetcherConfig;
use crate::error::ConfigError;
use crate::http::{HttpRequest, HttpTransport, ReqwestTransport};
use crate::outcome::{Diagnostic, FetchOutcome, STATUS_OK};

/// Fetches JSON over HTTP with a per-name disk cache as the offline fallback
#[derive(Clone)]
pub struct OfflineFallbackFetcher {
    transport: Arc<dyn HttpTransport>,
    cache: CacheStore,
}

impl std::fmt::Debug for OfflineFallbackFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineFallbackFetcher")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl OfflineFallbackFetcher {
    /// Creates a fetcher from an HTTP transport and a cache store
    pub fn new(transport: impl HttpTransport + 'static, cache: CacheStore) -> Self {
        Self {
            transport: Arc::new(transport),
            cache,
        }
    }

    /// Creates a fetcher sharing an existing transport
    pub fn with_shared_transport(transport: Arc<dyn HttpTransport>, cache: CacheStore) -> Self {
        Self { transport, cache }
    }

    /// Creates a fetcher with the reqwest transport and the configured cache directory
    ///
    /// # Returns
    /// * `Err(ConfigError::NoCacheDir)` if no directory was given and the platform has none
    /// * `Err(ConfigError::HttpClient)` if the HTTP client cannot be built
    pub fn from_config(config: &FetcherConfig) -> Result<Self, ConfigError> {
        let cache = match config.cache_dir {
            Some(ref dir) => CacheStore::with_dir(dir.clone()),
            None => CacheStore::new().ok_or(ConfigError::NoCacheDir)?,
        };
        let transport = ReqwestTransport::with_options(config.timeout, &config.user_agent)?;
        Ok(Self::new(transport, cache))
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Performs `request`, falling back to the cache for `name` if it yields no body
    ///
    /// # Behavior
    /// - Body present: returns `(status, body, Online)`; the body is cached
    ///   only when the status is exactly 200, and a failed write is not reported
    ///   except through diagnostics
    /// - No body, cache readable: returns `(200, cached, Offline)`
    /// - No body, cache missing or corrupt: returns `(None, null, Offline)`
    ///
    /// Cache I/O runs on Tokio's blocking pool, the same as [`read_cache`](Self::read_cache).
    pub async fn fetch_with_fallback(&self, request: HttpRequest, name: &CacheName) -> FetchOutcome {
        let url = request.url.clone();
        let response = self.transport.perform(request).await;

        match response.body {
            Some(body) => {
                let mut diagnostics = Vec::new();
                if response.status == Some(STATUS_OK) {
                    diagnostics.extend(self.store(name, body.clone()).await);
                }
                FetchOutcome::online(response.status, body).with_diagnostics(diagnostics)
            }
            None => {
                debug!(%url, cache = %name, status = ?response.status, "No usable response, trying cache");
                let cache = self.cache.clone();
                let task_name = name.clone();
                let loaded = tokio::task::spawn_blocking(move || {
                    let mut diagnostics = Vec::new();
                    let body = load(&cache, &task_name, &mut diagnostics);
                    (body, diagnostics)
                })
                .await;

                let mut diagnostics = vec![Diagnostic::RequestFailed {
                    status: response.status,
                }];
                let body = match loaded {
                    Ok((body, load_diagnostics)) => {
                        diagnostics.extend(load_diagnostics);
                        body
                    }
                    Err(e) => {
                        warn!(cache = %name, error = %e, "Cache read task failed");
                        diagnostics.push(Diagnostic::CacheUnreadable(e.to_string()));
                        None
                    }
                };
                let outcome = match body {
                    Some(body) => FetchOutcome::cached(body),
                    None => FetchOutcome::empty(),
                };
                outcome.with_diagnostics(diagnostics)
            }
        }
    }

    /// Reads the cached body for `name` without touching the network
    ///
    /// The filesystem work runs on Tokio's blocking pool. The modification
    /// time and the content are read independently, so either may be present
    /// without the other.
    pub async fn read_cache(&self, name: &CacheName) -> FetchOutcome {
        let cache = self.cache.clone();
        let name = name.clone();

        match tokio::task::spawn_blocking(move || read_local(&cache, &name)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Cache read task failed");
                FetchOutcome::empty().with_diagnostics(vec![Diagnostic::CacheUnreadable(e.to_string())])
            }
        }
    }

    /// Spawns [`fetch_with_fallback`](Self::fetch_with_fallback) and calls
    /// `completion` exactly once with its outcome
    ///
    /// Must be called from within a Tokio runtime. The returned handle
    /// resolves after `completion` has run.
    pub fn fetch_with_fallback_then<F>(
        &self,
        request: HttpRequest,
        name: CacheName,
        completion: F,
    ) -> JoinHandle<()>
    where
        F: FnOnce(FetchOutcome) + Send + 'static,
    {
        let fetcher = self.clone();
        tokio::spawn(async move {
            let outcome = fetcher.fetch_with_fallback(request, &name).await;
            completion(outcome);
        })
    }

    /// Spawns [`read_cache`](Self::read_cache) and calls `completion` exactly
    /// once with its outcome
    ///
    /// Must be called from within a Tokio runtime.
    pub fn read_cache_then<F>(&self, name: CacheName, completion: F) -> JoinHandle<()>
    where
        F: FnOnce(FetchOutcome) + Send + 'static,
    {
        let fetcher = self.clone();
        tokio::spawn(async move {
            let outcome = fetcher.read_cache(&name).await;
            completion(outcome);
        })
    }

    async fn store(&self, name: &CacheName, body: Value) -> Option<Diagnostic> {
        let cache = self.cache.clone();
        let task_name = name.clone();
        let written = tokio::task::spawn_blocking(move || cache.write(&task_name, &body)).await;

        let error = match written {
            Ok(Ok(())) => {
                debug!(cache = %name, "Cached response");
                return None;
            }
            Ok(Err(e)) => e.to_string(),
            Err(e) => e.to_string(),
        };

        warn!(cache = %name, error = %error, "Failed to cache response");
        Some(Diagnostic::CacheWriteFailed(error))
    }
}

fn load(cache: &CacheStore, name: &CacheName, diagnostics: &mut Vec<Diagnostic>) -> Option<Value> {
    match cache.read(name) {
        Ok(Some(body)) => {
            debug!(cache = %name, "Serving cached body");
            Some(body)
        }
        Ok(None) => {
            debug!(cache = %name, "No cache entry");
            diagnostics.push(Diagnostic::CacheMissing);
            None
        }
        Err(e) => {
            warn!(cache = %name, error = %e, "Cache entry unreadable");
            diagnostics.push(Diagnostic::CacheUnreadable(e.to_string()));
            None
        }
    }
}

fn read_local(cache: &CacheStore, name: &CacheName) -> FetchOutcome {
    let mut diagnostics = Vec::new();

    let modified_at = match cache.modified_at(name) {
        Ok(time) => Some(time),
        Err(e) => {
            diagnostics.push(Diagnostic::ModifiedTimeUnavailable(e.to_string()));
            None
        }
    };

    let outcome = match load(cache, name, &mut diagnostics) {
        Some(body) => FetchOutcome::cached(body),
        None => FetchOutcome::empty(),
    };

    outcome
        .with_modified_at(modified_at)
        .with_diagnostics(diagnostics)
}
