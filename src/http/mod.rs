//! HTTP collaborator used by the fetcher
//!
//! The fetcher only needs "perform a request, get back a status and a decoded
//! JSON body, or nothing". [`HttpTransport`] is that seam; [`ReqwestTransport`]
//! is the production implementation and tests substitute their own.

mod params;
mod transport;

pub use params::{flatten_pairs, ParameterEncoding, Parameters};
pub use transport::ReqwestTransport;

use futures::future::BoxFuture;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// HTTP request methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Whether default-encoded parameters go into the URL for this method
    pub fn encodes_in_url(self) -> bool {
        matches!(self, Method::Get | Method::Head | Method::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl FromStr for Method {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(ParseError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to hand to an [`HttpTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    pub parameters: Option<Parameters>,
    pub encoding: ParameterEncoding,
    /// Header name/value pairs, applied in order
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Creates a request with no parameters and no headers
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            parameters: None,
            encoding: ParameterEncoding::Default,
            headers: Vec::new(),
        }
    }

    /// Creates a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_encoding(mut self, encoding: ParameterEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// What came back from a request
///
/// `body` is `None` whenever no usable JSON body was obtained: the request
/// failed at the transport level, or the payload was empty or not JSON.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HttpResponse {
    pub status: Option<u16>,
    pub body: Option<Value>,
}

impl HttpResponse {
    /// A response carrying a decoded body
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status: Some(status),
            body: Some(body),
        }
    }

    /// A request that produced nothing usable
    pub fn failed(status: Option<u16>) -> Self {
        Self { status, body: None }
    }
}

/// Performs HTTP requests and decodes their bodies as JSON
///
/// Implementations never fail: every problem is reported as an
/// [`HttpResponse`] without a body.
pub trait HttpTransport: Send + Sync {
    fn perform(&self, request: HttpRequest) -> BoxFuture<'_, HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_case_insensitive() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Post".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn test_parse_method_invalid() {
        let err = "FETCH".parse::<Method>().unwrap_err();
        assert_eq!(err, ParseError::UnknownMethod("FETCH".to_string()));
    }

    #[test]
    fn test_request_builder_defaults() {
        let request = HttpRequest::get("https://example.com/weather");

        assert_eq!(request.method, Method::Get);
        assert_eq!(request.encoding, ParameterEncoding::Default);
        assert!(request.parameters.is_none());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_request_builder_accumulates_headers() {
        let request = HttpRequest::new(Method::Post, "https://example.com")
            .with_header("Accept", "application/json")
            .with_header("X-Trace", "1");

        assert_eq!(
            request.headers,
            vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("X-Trace".to_string(), "1".to_string()),
            ]
        );
    }
}
