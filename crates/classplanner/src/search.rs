//! Per-session cache of the latest search results.
//!
//! A search replaces the session's cached offerings; a selection reads one
//! back by index. Sessions never see each other's results.

use crate::error::{Result, ScheduleError};
use crate::types::Offering;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

/// Session token used when the caller sends none.
pub const ANONYMOUS_SESSION: &str = "anonymous";

/// A session key derived from a caller-supplied token.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SessionKey(String);

impl SessionKey {
    /// Creates a session key from a raw session token or cookie value.
    ///
    /// The token is hashed so it is never kept in memory as-is.
    pub fn from_token(token: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let result = hasher.finalize();
        // first 16 bytes as hex
        let hash = result[..16].iter().map(|b| format!("{:02x}", b)).collect();
        Self(hash)
    }

    pub fn anonymous() -> Self {
        Self::from_token(ANONYMOUS_SESSION)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}...", &self.0[..8.min(self.0.len())])
    }
}

#[derive(Clone)]
struct CachedResults {
    offerings: Vec<Offering>,
    cached_at: Instant,
}

impl CachedResults {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() < ttl
    }
}

/// Thread-safe search results cache keyed by session.
pub struct SearchCache {
    entries: DashMap<SessionKey, CachedResults>,
    ttl: Duration,
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Creates a cache whose entries live for 30 minutes.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(30 * 60))
    }

    /// Drops the session's previous results. Called at the start of a search
    /// so a failed search leaves nothing selectable.
    pub fn clear_session(&self, key: &SessionKey) {
        self.entries.remove(key);
    }

    /// Stores `offerings` as the session's current results.
    pub fn replace(&self, key: SessionKey, offerings: Vec<Offering>) {
        self.entries.insert(
            key,
            CachedResults {
                offerings,
                cached_at: Instant::now(),
            },
        );
    }

    /// Gets the session's current results; empty if none or expired.
    pub fn results(&self, key: &SessionKey) -> Vec<Offering> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl) => entry.offerings.clone(),
            Some(entry) => {
                drop(entry);
                self.entries.remove(key);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// Gets one offering from the session's current results.
    ///
    /// # Errors
    /// * `IndexOutOfRange` if `index` is not addressable in the current
    ///   results (including when there are none).
    pub fn select(&self, key: &SessionKey, index: usize) -> Result<Offering> {
        let results = self.results(key);
        results
            .get(index)
            .cloned()
            .ok_or(ScheduleError::IndexOutOfRange {
                index,
                len: results.len(),
            })
    }

    /// Removes expired entries from the cache.
    pub fn cleanup_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.is_fresh(ttl));
    }

    pub fn stats(&self) -> CacheStats {
        let mut total = 0;
        let mut expired = 0;

        for entry in self.entries.iter() {
            total += 1;
            if !entry.is_fresh(self.ttl) {
                expired += 1;
            }
        }

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DaySet, TimeWindow};
    use chrono::NaiveTime;

    fn offerings(n: usize) -> Vec<Offering> {
        (0..n)
            .map(|index| Offering {
                id: None,
                subject: "CS".to_string(),
                course_number: "0445".to_string(),
                lecture: TimeWindow {
                    start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                    end: NaiveTime::from_hms_opt(11, 15, 0).unwrap(),
                    days: DaySet::parse("MoWe").unwrap(),
                },
                recitation: None,
                index,
            })
            .collect()
    }

    #[test]
    fn test_session_key_hashing() {
        let key1 = SessionKey::from_token("session123");
        let key2 = SessionKey::from_token("session123");
        let key3 = SessionKey::from_token("session456");

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
        assert_eq!(key1.as_str().len(), 32);
        assert!(!key1.as_str().contains("session"));
    }

    #[test]
    fn test_select_in_and_out_of_range() {
        let cache = SearchCache::with_default_ttl();
        let key = SessionKey::from_token("abc");
        cache.replace(key.clone(), offerings(3));

        assert_eq!(cache.select(&key, 2).unwrap().index, 2);
        let err = cache.select(&key, 5).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::IndexOutOfRange { index: 5, len: 3 }
        ));
    }

    #[test]
    fn test_sessions_are_isolated() {
        let cache = SearchCache::with_default_ttl();
        let alice = SessionKey::from_token("alice");
        let bob = SessionKey::from_token("bob");
        cache.replace(alice.clone(), offerings(3));
        cache.replace(bob.clone(), offerings(1));

        assert_eq!(cache.results(&alice).len(), 3);
        assert!(cache.select(&bob, 2).is_err());
    }

    #[test]
    fn test_new_search_replaces_results() {
        let cache = SearchCache::with_default_ttl();
        let key = SessionKey::anonymous();
        cache.replace(key.clone(), offerings(4));
        cache.clear_session(&key);
        assert!(cache.results(&key).is_empty());
        cache.replace(key.clone(), offerings(2));
        assert!(matches!(
            cache.select(&key, 3),
            Err(ScheduleError::IndexOutOfRange { index: 3, len: 2 })
        ));
    }

    #[test]
    fn test_expired_results_are_not_selectable() {
        let cache = SearchCache::new(Duration::ZERO);
        let key = SessionKey::anonymous();
        cache.replace(key.clone(), offerings(2));

        assert_eq!(cache.stats().expired_entries, 1);
        assert!(cache.select(&key, 0).is_err());
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn test_cleanup_expired() {
        let cache = SearchCache::new(Duration::ZERO);
        cache.replace(SessionKey::from_token("a"), offerings(1));
        cache.replace(SessionKey::from_token("b"), offerings(1));
        cache.cleanup_expired();
        assert_eq!(cache.stats().total_entries, 0);
    }
}
