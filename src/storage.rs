use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::core::leaderboard::Leaderboard;

/// Leaderboard paired with the instant it was fetched from the store.
#[derive(Debug)]
pub struct CachedLeaderboard {
    pub fetched_at: Instant,
    pub leaderboard: Leaderboard,
}

type SharedLeaderboard = Arc<Mutex<Option<CachedLeaderboard>>>;

/// Process-wide leaderboard cache, shared between the background refresher
/// and every in-flight request. The snapshot is only ever replaced wholesale
/// under the lock, so readers see either the previous board or the new one.
#[derive(Clone)]
pub struct MemoryCache {
    data: SharedLeaderboard,
    ttl: Duration,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> MemoryCache {
        MemoryCache {
            data: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    /// The cached board, if one exists and is younger than the TTL.
    pub fn fresh(&self) -> Option<Leaderboard> {
        let data = self.data.lock().unwrap();
        data.as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.leaderboard.clone())
    }

    /// Replaces the snapshot and stamps it with the current time.
    pub fn store(&self, leaderboard: Leaderboard) {
        let mut data = self.data.lock().unwrap();
        *data = Some(CachedLeaderboard {
            fetched_at: Instant::now(),
            leaderboard,
        });
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        let data = self.data.lock().unwrap();
        data.as_ref().map(|cached| cached.fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_is_never_fresh() {
        let cache = MemoryCache::new(Duration::from_secs(10));
        assert!(cache.fresh().is_none());
        assert!(cache.last_refresh().is_none());
    }

    #[test]
    fn stored_board_is_fresh_within_ttl() {
        let cache = MemoryCache::new(Duration::from_secs(10));
        cache.store(Leaderboard::new());
        assert!(cache.fresh().is_some());
        assert!(cache.last_refresh().is_some());
    }

    #[test]
    fn stored_board_expires_after_ttl() {
        let cache = MemoryCache::new(Duration::ZERO);
        cache.store(Leaderboard::new());
        // Zero TTL: stale immediately, but the snapshot itself is kept.
        assert!(cache.fresh().is_none());
        assert!(cache.last_refresh().is_some());
    }

    #[test]
    fn store_replaces_snapshot_and_timestamp() {
        let cache = MemoryCache::new(Duration::from_secs(10));
        cache.store(Leaderboard::new());
        let first = cache.last_refresh().unwrap();
        cache.store(Leaderboard::new());
        let second = cache.last_refresh().unwrap();
        assert!(second >= first);
    }
}
