use analysis_core::{PeerCacheEntry, PeerLookup, PeerStore};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

pub const PEER_CACHE_TTL_SECS: i64 = 3600;
pub const PEER_CACHE_MAX_ENTRIES: usize = 1024;

/// Process-wide peer store keyed by ticker.
///
/// Bounded: when full, an insert first drops expired entries and then, if
/// still full, the oldest entry.
pub struct InMemoryPeerStore {
    entries: DashMap<String, PeerCacheEntry>,
    ttl: Duration,
    max_entries: usize,
}

impl InMemoryPeerStore {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.is_fresh(now, ttl));

        while self.entries.len() >= self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|e| e.value().timestamp)
                .map(|e| e.key().clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl Default for InMemoryPeerStore {
    fn default() -> Self {
        Self::new(Duration::seconds(PEER_CACHE_TTL_SECS), PEER_CACHE_MAX_ENTRIES)
    }
}

impl PeerStore for InMemoryPeerStore {
    fn get(&self, ticker: &str) -> Option<PeerCacheEntry> {
        self.entries.get(ticker).map(|e| e.value().clone())
    }

    fn put(&self, ticker: &str, peers: Vec<String>, timestamp: DateTime<Utc>) {
        if !self.entries.contains_key(ticker) && self.entries.len() >= self.max_entries {
            self.make_room(timestamp);
        }
        self.entries.insert(
            ticker.to_string(),
            PeerCacheEntry {
                ticker: ticker.to_string(),
                timestamp,
                peers,
            },
        );
    }
}

/// TTL memoization in front of the similar-securities lookup.
///
/// Entries expire `ttl` after insertion regardless of reads. Lookup failures
/// are logged and answered with an empty list; they are never cached.
/// Concurrent misses for one ticker may both hit the lookup; the later write
/// wins.
pub struct PeerCache {
    lookup: Arc<dyn PeerLookup>,
    store: Arc<dyn PeerStore>,
    ttl: Duration,
}

impl PeerCache {
    pub fn new(lookup: Arc<dyn PeerLookup>) -> Self {
        Self::with_store(lookup, Arc::new(InMemoryPeerStore::default()), Duration::seconds(PEER_CACHE_TTL_SECS))
    }

    pub fn with_store(lookup: Arc<dyn PeerLookup>, store: Arc<dyn PeerStore>, ttl: Duration) -> Self {
        Self { lookup, store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get_peers(&self, ticker: &str) -> Vec<String> {
        self.get_peers_at(ticker, Utc::now()).await
    }

    /// `get_peers` evaluated at an explicit instant
    pub async fn get_peers_at(&self, ticker: &str, now: DateTime<Utc>) -> Vec<String> {
        let cache_key = ticker.to_uppercase();

        if let Some(entry) = self.store.get(&cache_key) {
            if entry.is_fresh(now, self.ttl) {
                tracing::debug!("Peer cache hit for {}", cache_key);
                return entry.peers;
            }
        }

        tracing::debug!("Peer cache miss for {}", cache_key);
        match self.lookup.similar_tickers(&cache_key).await {
            Ok(peers) => {
                self.store.put(&cache_key, peers.clone(), now);
                peers
            }
            Err(e) => {
                tracing::warn!("Peer lookup failed for {}: {}", cache_key, e);
                vec![]
            }
        }
    }
}
