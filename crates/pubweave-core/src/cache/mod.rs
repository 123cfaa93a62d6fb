//! Response cache for outbound metadata requests
//!
//! Every network-touching step goes through a [`ResponseCache`] keyed by
//! the canonical request shape. Identifiers and their canonical metadata
//! do not change, so entries are effectively permanent: a hit is served
//! without any network call and without consuming rate-limit budget.
//!
//! The cache is passed into the dispatcher and fallback resolver as an
//! explicit capability, never reached as global state, so tests can
//! substitute [`MemoryCache`].

mod memory;
mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

use crate::error::CacheError;

/// Canonical identity of an outbound request: service, method, path, and
/// sorted query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub service: String,
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RequestKey {
    /// Key for a GET request. Query pairs are sorted so parameter order
    /// in the caller never splits cache entries.
    pub fn get(service: &str, path: &str, query: &[(&str, &str)]) -> Self {
        let mut query: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        query.sort();
        Self {
            service: service.to_string(),
            method: "GET".to_string(),
            path: path.to_string(),
            query,
        }
    }

    /// Stable string form used as the storage key.
    pub fn canonical(&self) -> String {
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        if query.is_empty() {
            format!("{} {} {}", self.service, self.method, self.path)
        } else {
            format!("{} {} {}?{}", self.service, self.method, self.path, query)
        }
    }
}

/// Key-value store of raw response bodies.
///
/// `put` is idempotent: re-putting an identical body is a no-op, a
/// differing body overwrites (last-writer-wins; not expected to occur
/// given immutable upstream data, but must not corrupt the store).
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &RequestKey) -> Result<Option<String>, CacheError>;
    fn put(&self, key: &RequestKey, body: &str) -> Result<(), CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_sorts_query() {
        let a = RequestKey::get("svc", "/path/", &[("b", "2"), ("a", "1")]);
        let b = RequestKey::get("svc", "/path/", &[("a", "1"), ("b", "2")]);
        assert_eq!(a.canonical(), b.canonical());
        assert_eq!(a.canonical(), "svc GET /path/?a=1&b=2");
    }

    #[test]
    fn test_canonical_without_query() {
        let key = RequestKey::get("doi-org", "/10.1234/x", &[]);
        assert_eq!(key.canonical(), "doi-org GET /10.1234/x");
    }

    #[test]
    fn test_distinct_services_distinct_keys() {
        let a = RequestKey::get("svc-a", "/p", &[]);
        let b = RequestKey::get("svc-b", "/p", &[]);
        assert_ne!(a.canonical(), b.canonical());
    }
}
