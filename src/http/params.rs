//! Request parameters and how they are encoded

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::Method;
use crate::error::ParseError;

/// Request parameters, as a JSON object
pub type Parameters = Map<String, Value>;

/// Where and how request parameters are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterEncoding {
    /// Query string for GET, HEAD and DELETE; form body for everything else
    #[default]
    Default,
    /// Always appended to the URL query string
    QueryString,
    /// Always sent as an `application/x-www-form-urlencoded` body
    FormBody,
    /// Sent as a JSON body
    Json,
}

/// Concrete placement once the method is known
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Query,
    Form,
    Json,
}

impl ParameterEncoding {
    pub(crate) fn placement(self, method: Method) -> Placement {
        match self {
            ParameterEncoding::Default if method.encodes_in_url() => Placement::Query,
            ParameterEncoding::Default | ParameterEncoding::FormBody => Placement::Form,
            ParameterEncoding::QueryString => Placement::Query,
            ParameterEncoding::Json => Placement::Json,
        }
    }
}

impl FromStr for ParameterEncoding {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ParameterEncoding::Default),
            "query" | "querystring" => Ok(ParameterEncoding::QueryString),
            "form" | "formbody" => Ok(ParameterEncoding::FormBody),
            "json" => Ok(ParameterEncoding::Json),
            _ => Err(ParseError::UnknownEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for ParameterEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterEncoding::Default => "default",
            ParameterEncoding::QueryString => "query",
            ParameterEncoding::FormBody => "form",
            ParameterEncoding::Json => "json",
        };
        f.write_str(s)
    }
}

/// Flattens parameters into `key=value` pairs for URL or form encoding
///
/// Nested values use bracket notation: arrays become `key[]`, objects
/// become `key[sub]`. Null encodes as an empty value.
pub fn flatten_pairs(params: &Parameters) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        push_pairs(key.clone(), value, &mut pairs);
    }
    pairs
}

fn push_pairs(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => pairs.push((key, String::new())),
        Value::Bool(b) => pairs.push((key, b.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for item in items {
                push_pairs(format!("{}[]", key), item, pairs);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                push_pairs(format!("{}[{}]", key, sub), item, pairs);
            }
        }
    }
}
