//! Process-lifetime fetch cache.
//!
//! Deduplicates repeated fetches of the same URL within one process. The
//! cache is an explicit object owned by the fetcher, never a global, and is
//! not persisted across invocations.

use std::collections::HashMap;
use std::sync::Mutex;

/// URL → previously fetched content. Empty-string outcomes are cached too,
/// so a known-empty page is not refetched.
#[derive(Debug, Default)]
pub struct FetchCache {
    entries: Mutex<HashMap<String, String>>,
}

impl FetchCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached content for `url`, if any.
    pub fn get(&self, url: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("fetch cache lock poisoned")
            .get(url)
            .cloned()
    }

    /// Record `content` as the fetch outcome for `url`.
    pub fn insert(&self, url: &str, content: String) {
        self.entries
            .lock()
            .expect("fetch cache lock poisoned")
            .insert(url.to_string(), content);
    }

    /// Number of cached URLs.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("fetch cache lock poisoned").len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
