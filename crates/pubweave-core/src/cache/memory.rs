//! In-memory cache for isolated tests

use std::collections::HashMap;
use std::sync::Mutex;

use super::{RequestKey, ResponseCache};
use crate::error::CacheError;

/// HashMap-backed cache. Not durable; intended for unit tests and dry
/// runs.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries (test helper).
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseCache for MemoryCache {
    fn get(&self, key: &RequestKey) -> Result<Option<String>, CacheError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CacheError::Storage("memory cache lock poisoned".to_string()))?;
        Ok(entries.get(&key.canonical()).cloned())
    }

    fn put(&self, key: &RequestKey, body: &str) -> Result<(), CacheError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError::Storage("memory cache lock poisoned".to_string()))?;
        entries.insert(key.canonical(), body.to_string());
        Ok(())
    }
}
