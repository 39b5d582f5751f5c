//! Validated cache entry names

use std::fmt;

use crate::error::CacheError;

/// Caller-chosen identifier for a cache entry
///
/// A `CacheName` is used verbatim as a single file name inside the cache
/// directory, so construction rejects anything that could escape it or
/// clash with the store's temporary files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheName(String);

impl CacheName {
    /// Validates `name` for use as a cache file name
    ///
    /// # Arguments
    /// * `name` - The caller-chosen entry name (e.g., "weather")
    ///
    /// # Returns
    /// * `Ok(CacheName)` if the name is a plain file name
    /// * `Err(CacheError::InvalidName)` if it is empty, starts with `.`,
    ///   or contains a path separator or NUL byte
    pub fn new(name: impl Into<String>) -> Result<Self, CacheError> {
        let name = name.into();

        let reason = if name.is_empty() {
            Some("name must not be empty")
        } else if name.starts_with('.') {
            Some("name must not start with '.'")
        } else if name.contains(['/', '\\']) {
            Some("name must not contain path separators")
        } else if name.contains('\0') {
            Some("name must not contain NUL bytes")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CacheError::InvalidName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for CacheName {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
