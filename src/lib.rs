//! offline-fetch library
//!
//! Fetch JSON over HTTP, keep the last good response on disk under a
//! caller-chosen name, and serve that copy when the network fails.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod outcome;

pub use cache::{CacheName, CacheStore};
pub use config::FetcherConfig;
pub use fetcher::OfflineFallbackFetcher;
pub use http::{HttpRequest, HttpResponse, HttpTransport, Method, ParameterEncoding, ReqwestTransport};
pub use outcome::{Diagnostic, FetchOutcome, Source};
