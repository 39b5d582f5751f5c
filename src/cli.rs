//! Command-line interface parsing for offline-fetch
//!
//! This module handles parsing of CLI arguments using clap: a `fetch`
//! subcommand that goes to the network with cache fallback, and a `read`
//! subcommand that only looks at the cache.

use clap::{ArgAction, Args, Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::cache::CacheName;
use crate::config::FetcherConfig;
use crate::http::{HttpRequest, Method, ParameterEncoding, Parameters};

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    /// A `--param` value is not `KEY=VALUE`
    #[error("Invalid parameter: '{0}'. Expected KEY=VALUE")]
    InvalidParam(String),

    /// A `--header` value is not `NAME:VALUE`
    #[error("Invalid header: '{0}'. Expected NAME:VALUE")]
    InvalidHeader(String),
}

/// offline-fetch - Fetch JSON with an offline disk cache fallback
#[derive(Parser, Debug)]
#[command(name = "offline-fetch")]
#[command(about = "Fetch JSON over HTTP, falling back to the last cached response when offline")]
#[command(version)]
pub struct Cli {
    /// Cache directory (defaults to the per-user cache directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a URL, caching 200 responses and serving the cache on failure
    Fetch(FetchArgs),

    /// Print the cached response without touching the network
    Read {
        /// Cache entry name
        #[arg(long)]
        name: CacheName,
    },
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// URL to request
    pub url: String,

    /// Cache entry name
    #[arg(long)]
    pub name: CacheName,

    /// HTTP method
    #[arg(long, default_value = "GET")]
    pub method: Method,

    /// Request parameter, repeatable
    ///
    /// Examples:
    ///   --param city=Vancouver --param days=3
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Request header, repeatable
    #[arg(long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Parameter encoding: default, query, form or json
    #[arg(long, default_value = "default")]
    pub encoding: ParameterEncoding,
}

/// Parses a `KEY=VALUE` request parameter
pub fn parse_param(s: &str) -> Result<(String, String), CliError> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(CliError::InvalidParam(s.to_string())),
    }
}

/// Parses a `NAME:VALUE` header, trimming whitespace around the value
pub fn parse_header(s: &str) -> Result<(String, String), CliError> {
    match s.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(CliError::InvalidHeader(s.to_string())),
    }
}

impl FetchArgs {
    /// Builds the HTTP request described by these arguments
    pub fn to_request(&self) -> HttpRequest {
        let mut request = HttpRequest::new(self.method, self.url.clone()).with_encoding(self.encoding);

        if !self.params.is_empty() {
            let params: Parameters = self
                .params
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            request = request.with_parameters(params);
        }

        for (name, value) in &self.headers {
            request = request.with_header(name.clone(), value.clone());
        }

        request
    }
}

impl Cli {
    /// Fetcher settings derived from the global flags
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            cache_dir: self.cache_dir.clone(),
            timeout: self.timeout.map(Duration::from_secs),
            ..FetcherConfig::default()
        }
    }

    /// Default log filter for the verbosity level
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "offline_fetch=warn",
            1 => "offline_fetch=debug",
            _ => "offline_fetch=trace",
        }
    }
}
