//! reqwest-backed HTTP transport

use futures::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::params::{flatten_pairs, Placement};
use super::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::error::ConfigError;

/// Sends requests with a shared [`reqwest::Client`]
///
/// Response status is reported as-is and never validated; a body counts as
/// usable only if it is non-empty and parses as JSON.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with reqwest's default client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with a custom HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Create a transport with an overall request timeout and user agent
    pub fn with_options(timeout: Option<Duration>, user_agent: &str) -> Result<Self, ConfigError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?))
    }

    fn build(&self, request: &HttpRequest) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(ref params) = request.parameters {
            builder = match request.encoding.placement(request.method) {
                Placement::Query => builder.query(&flatten_pairs(params)),
                Placement::Form => builder.form(&flatten_pairs(params)),
                Placement::Json => builder.json(params),
            };
        }

        builder
    }

    async fn execute(&self, request: HttpRequest) -> HttpResponse {
        debug!(method = %request.method, url = %request.url, "Dispatching request");

        let response = match self.build(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %request.url, error = %e, "Request failed");
                return HttpResponse::failed(e.status().map(|s| s.as_u16()));
            }
        };

        let status = response.status().as_u16();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(url = %request.url, status, error = %e, "Failed to read response body");
                return HttpResponse::failed(Some(status));
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!(url = %request.url, status, "Response body is empty");
            return HttpResponse::failed(Some(status));
        }

        match serde_json::from_slice(&bytes) {
            Ok(body) => HttpResponse::json(status, body),
            Err(e) => {
                debug!(url = %request.url, status, error = %e, "Response body is not JSON");
                HttpResponse::failed(Some(status))
            }
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn perform(&self, request: HttpRequest) -> BoxFuture<'_, HttpResponse> {
        Box::pin(self.execute(request))
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}
