//! Cache module for storing decoded response bodies to disk
//!
//! One file per cache name under a single directory, holding the JSON
//! encoding of the last successful response. There is no index and no
//! expiry: an entry exists exactly when its file does, and its age is the
//! file's modification time.

mod manager;
mod name;

pub use manager::CacheStore;
pub use name::CacheName;
