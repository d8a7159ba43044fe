//! Cached card fetching.
//!
//! [`ContentClient`] sits between request handlers and a [`CardSource`]. Each
//! successful fetch is kept for a fixed TTL, so requests inside the window
//! are served from memory.
//!
//! # Single flight
//!
//! Concurrent misses for the same list are de-duplicated: fetches take a
//! per-list async lock and re-check the cache once they hold it, so only the
//! first caller reaches the provider. Forced refreshes still always fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use husky_cache::{Cache, MemoryCache, NullCache};
use tracing::debug;

use crate::error::ContentFetchError;
use crate::source::CardSource;
use crate::types::Card;

/// Default time-to-live for fetched lists.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Shared, immutable batch of cards.
pub type Cards = Arc<[Card]>;

/// Card fetching with a TTL cache in front of the provider.
pub struct ContentClient {
    source: Arc<dyn CardSource>,
    cache: Box<dyn Cache<Cards>>,
    ttl: Duration,
    /// Per-list fetch locks.
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ContentClient {
    /// Create a client that caches fetched lists for [`DEFAULT_TTL`].
    #[must_use]
    pub fn new(source: Arc<dyn CardSource>) -> Self {
        Self::with_cache(source, Box::new(MemoryCache::new()))
    }

    /// Create a client that never serves from cache (development mode).
    #[must_use]
    pub fn volatile(source: Arc<dyn CardSource>) -> Self {
        Self::with_cache(source, Box::new(NullCache))
    }

    /// Create a client with an explicit cache implementation.
    #[must_use]
    pub fn with_cache(source: Arc<dyn CardSource>, cache: Box<dyn Cache<Cards>>) -> Self {
        Self {
            source,
            cache,
            ttl: DEFAULT_TTL,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Override the time-to-live of new cache entries.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Fetch the cards of `list_id`.
    ///
    /// - An empty `list_id` yields no cards without touching cache or provider.
    /// - A live cache entry is returned unless `skip_cache` is set.
    /// - Otherwise the provider is called and its result cached for the TTL,
    ///   measured from the call.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`ContentFetchError`] unchanged. Failures are
    /// not cached and no stale entry is served in their place.
    pub async fn fetch_cards(
        &self,
        list_id: &str,
        skip_cache: bool,
    ) -> Result<Cards, ContentFetchError> {
        if list_id.is_empty() {
            return Ok(Arc::from(Vec::new()));
        }

        if !skip_cache && let Some(cards) = self.cache.get(list_id) {
            return Ok(cards);
        }

        let flight = self.flight_lock(list_id);
        let _guard = flight.lock().await;

        // Another request may have filled the cache while we waited
        if !skip_cache && let Some(cards) = self.cache.get(list_id) {
            debug!(list_id, "served by concurrent fetch");
            return Ok(cards);
        }

        let cards: Cards = self.source.list_cards(list_id).await?.into();
        self.cache.put(list_id, Arc::clone(&cards), self.ttl);
        debug!(list_id, count = cards.len(), "cached card list");

        Ok(cards)
    }

    /// Get the fetch lock for a list, creating it on first use.
    fn flight_lock(&self, list_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap();
        Arc::clone(in_flight.entry(list_id.to_owned()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(ContentClient: Send, Sync);

    /// Source that counts calls and names cards after the call number.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        delay: Option<Duration>,
        fail: bool,
    }

    impl CountingSource {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CardSource for CountingSource {
        async fn list_cards(&self, list_id: &str) -> Result<Vec<Card>, ContentFetchError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ContentFetchError::HttpResponse {
                    status: 503,
                    body: "unavailable".to_owned(),
                });
            }
            Ok(vec![Card {
                id: format!("{list_id}-{call}"),
                name: format!("{list_id} call {call}"),
                ..Card::default()
            }])
        }
    }

    fn client(source: &Arc<CountingSource>) -> ContentClient {
        ContentClient::new(Arc::clone(source) as Arc<dyn CardSource>)
    }

    #[tokio::test]
    async fn test_second_fetch_within_ttl_hits_cache() {
        let source = Arc::new(CountingSource::default());
        let client = client(&source);

        let first = client.fetch_cards("list", false).await.unwrap();
        let second = client.fetch_cards("list", false).await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(first[0].name, "list call 1");
        assert_eq!(second[0].name, "list call 1");
    }

    #[tokio::test]
    async fn test_fetch_after_ttl_calls_provider_again() {
        let source = Arc::new(CountingSource::default());
        let client = client(&source).with_ttl(Duration::ZERO);

        client.fetch_cards("list", false).await.unwrap();
        let second = client.fetch_cards("list", false).await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(second[0].name, "list call 2");
    }

    #[tokio::test]
    async fn test_empty_list_id_never_calls_provider() {
        let source = Arc::new(CountingSource::default());
        let client = client(&source);

        let cached = client.fetch_cards("", false).await.unwrap();
        let forced = client.fetch_cards("", true).await.unwrap();

        assert!(cached.is_empty());
        assert!(forced.is_empty());
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_skip_cache_always_calls_and_refreshes_entry() {
        let source = Arc::new(CountingSource::default());
        let client = client(&source);

        client.fetch_cards("list", false).await.unwrap();
        let forced = client.fetch_cards("list", true).await.unwrap();
        let after = client.fetch_cards("list", false).await.unwrap();

        assert_eq!(source.calls(), 2);
        assert_eq!(forced[0].name, "list call 2");
        // The forced fetch replaced the cached entry
        assert_eq!(after[0].name, "list call 2");
    }

    #[tokio::test]
    async fn test_lists_are_cached_independently() {
        let source = Arc::new(CountingSource::default());
        let client = client(&source);

        client.fetch_cards("a", false).await.unwrap();
        client.fetch_cards("b", false).await.unwrap();
        client.fetch_cards("a", false).await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_volatile_client_never_serves_from_cache() {
        let source = Arc::new(CountingSource::default());
        let client = ContentClient::volatile(Arc::clone(&source) as Arc<dyn CardSource>);

        client.fetch_cards("list", false).await.unwrap();
        client.fetch_cards("list", false).await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_propagates_and_is_not_cached() {
        let source = Arc::new(CountingSource {
            fail: true,
            ..CountingSource::default()
        });
        let client = client(&source);

        let err = client.fetch_cards("list", false).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error: 503 - unavailable");

        assert!(client.fetch_cards("list", false).await.is_err());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_fetch_once() {
        let source = Arc::new(CountingSource {
            delay: Some(Duration::from_millis(20)),
            ..CountingSource::default()
        });
        let client = Arc::new(client(&source));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let client = Arc::clone(&client);
                tokio::spawn(async move { client.fetch_cards("list", false).await })
            })
            .collect();

        for handle in handles {
            let cards = handle.await.unwrap().unwrap();
            assert_eq!(cards[0].name, "list call 1");
        }
        assert_eq!(source.calls(), 1);
    }
}
