//! Suggestion Cache
//!
//! Maps the SHA-256 of an image's bytes to the suggestions returned for it.
//! Entries older than the TTL are treated as absent and removed on lookup.

use std::time::Duration;

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::debug;

use crate::constants::cache::SUGGESTION_TTL_SECS;
use crate::types::SuggestionSet;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: SuggestionSet,
    stored_at: Instant,
}

/// Lowercase hex SHA-256 digest of `bytes`
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Content-addressed, in-memory suggestion cache
#[derive(Debug)]
pub struct SuggestionCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(SUGGESTION_TTL_SECS))
    }
}

impl SuggestionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up suggestions for the given image bytes
    pub fn get(&self, bytes: &[u8]) -> Option<SuggestionSet> {
        self.get_by_key(&content_hash(bytes))
    }

    /// Look up by precomputed content hash, evicting the entry if expired
    pub fn get_by_key(&self, key: &str) -> Option<SuggestionSet> {
        let ttl = self.ttl;
        if self
            .entries
            .remove_if(key, |_, entry| entry.stored_at.elapsed() > ttl)
            .is_some()
        {
            debug!(key, "Evicted expired suggestion cache entry");
            return None;
        }

        self.entries.get(key).map(|entry| entry.data.clone())
    }

    /// Store suggestions for the given image bytes, replacing any previous entry
    pub fn insert(&self, bytes: &[u8], data: SuggestionSet) -> String {
        let key = content_hash(bytes);
        self.insert_by_key(key.clone(), data);
        key
    }

    pub fn insert_by_key(&self, key: String, data: SuggestionSet) {
        self.entries.insert(
            key,
            CacheEntry {
                data,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet looked up
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
