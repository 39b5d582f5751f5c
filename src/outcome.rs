//! Results delivered by the fetcher
//!
//! Every call produces exactly one [`FetchOutcome`], including calls where
//! neither the network nor the cache had anything to offer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// HTTP 200, also reported for bodies served from the cache
pub const STATUS_OK: u16 = 200;

/// Where an outcome's body came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// A live network response
    Online,
    /// The local cache, or nothing at all
    Offline,
}

/// Something that went wrong while producing an outcome
///
/// None of these change the outcome itself; they exist so callers can tell
/// "never cached" apart from "cache write failed" when they care to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The request produced no usable body
    RequestFailed { status: Option<u16> },
    /// There is no cache entry for the name
    CacheMissing,
    /// The cache entry exists but could not be read or decoded
    CacheUnreadable(String),
    /// A successful response could not be persisted
    CacheWriteFailed(String),
    /// The cache entry's modification time could not be read
    ModifiedTimeUnavailable(String),
}

/// The single result of a fetch or cache read
///
/// Equality compares the delivered fields and ignores diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    /// HTTP status, synthesized as 200 for bodies served from the cache
    pub status: Option<u16>,
    /// Decoded body, `Value::Null` when nothing was available
    pub body: Value,
    pub source: Source,
    /// Cache file modification time (direct cache reads only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    diagnostics: Vec<Diagnostic>,
}

impl FetchOutcome {
    pub(crate) fn online(status: Option<u16>, body: Value) -> Self {
        Self {
            status,
            body,
            source: Source::Online,
            modified_at: None,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn cached(body: Value) -> Self {
        Self {
            status: Some(STATUS_OK),
            body,
            source: Source::Offline,
            modified_at: None,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            status: None,
            body: Value::Null,
            source: Source::Offline,
            modified_at: None,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn with_modified_at(mut self, modified_at: Option<DateTime<Utc>>) -> Self {
        self.modified_at = modified_at;
        self
    }

    pub(crate) fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn is_online(&self) -> bool {
        self.source == Source::Online
    }

    /// Whether a body was delivered from either the network or the cache
    pub fn has_body(&self) -> bool {
        self.is_online() || self.status.is_some()
    }

    /// Problems encountered while producing this outcome, in order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl PartialEq for FetchOutcome {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status
            && self.body == other.body
            && self.source == other.source
            && self.modified_at == other.modified_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_outcome_is_offline_null() {
        let outcome = FetchOutcome::empty();

        assert_eq!(outcome.status, None);
        assert_eq!(outcome.body, Value::Null);
        assert_eq!(outcome.source, Source::Offline);
        assert!(!outcome.has_body());
    }

    #[test]
    fn test_cached_outcome_synthesizes_ok() {
        let outcome = FetchOutcome::cached(json!({"temp": 72}));

        assert_eq!(outcome.status, Some(STATUS_OK));
        assert!(!outcome.is_online());
        assert!(outcome.has_body());
    }

    #[test]
    fn test_online_null_body_still_has_body() {
        // A live response of JSON `null` is a real body
        let outcome = FetchOutcome::online(Some(200), Value::Null);
        assert!(outcome.has_body());
    }

    #[test]
    fn test_equality_ignores_diagnostics() {
        let plain = FetchOutcome::empty();
        let noisy = FetchOutcome::empty().with_diagnostics(vec![Diagnostic::CacheMissing]);
        assert_eq!(plain, noisy);
    }

    #[test]
    fn test_serializes_without_diagnostics() {
        let outcome = FetchOutcome::empty().with_diagnostics(vec![Diagnostic::CacheMissing]);

        let json = serde_json::to_value(&outcome).expect("Should serialize");

        assert_eq!(
            json,
            json!({"status": null, "body": null, "source": "offline"})
        );
    }

    #[test]
    fn test_serializes_modified_at_when_present() {
        let stamp = DateTime::parse_from_rfc3339("2024-07-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let outcome = FetchOutcome::cached(json!(1)).with_modified_at(Some(stamp));

        let json = serde_json::to_value(&outcome).expect("Should serialize");

        assert_eq!(json["modified_at"], json!("2024-07-15T12:00:00Z"));
        assert_eq!(json["status"], json!(200));
    }
}
