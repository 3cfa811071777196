//! Short-TTL market cache
//!
//! The cache is best-effort and never authoritative: a successful fetch
//! replaces the whole contents atomically, and staleness is decided by the
//! caller-supplied clock so the logic is testable without sleeping.
//! Fetch order is retained so cached and fresh reads agree on ordering,
//! which keeps first-encountered tie-breaks stable across the TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::types::Market;

/// Markets in fetch order with an id index, valid until the TTL elapses
#[derive(Debug)]
pub struct MarketCache {
    ttl: Duration,
    markets: Vec<Market>,
    index: HashMap<String, usize>,
    refreshed_at: Option<Instant>,
}

impl MarketCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            markets: Vec::new(),
            index: HashMap::new(),
            refreshed_at: None,
        }
    }

    /// Whether the cached set is still within its TTL at `now`
    pub fn is_fresh(&self, now: Instant) -> bool {
        match self.refreshed_at {
            Some(at) => !self.markets.is_empty() && now.duration_since(at) < self.ttl,
            None => false,
        }
    }

    /// Replace the whole cache with a freshly fetched set
    pub fn replace(&mut self, markets: Vec<Market>, now: Instant) {
        self.index = markets
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        self.markets = markets;
        self.refreshed_at = Some(now);
    }

    /// Insert a single market fetched by id without bumping freshness
    pub fn insert(&mut self, market: Market) {
        match self.index.get(&market.id) {
            Some(&i) => self.markets[i] = market,
            None => {
                self.index.insert(market.id.clone(), self.markets.len());
                self.markets.push(market);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Market> {
        self.index.get(id).map(|&i| &self.markets[i])
    }

    /// All cached markets in fetch order
    pub fn all(&self) -> Vec<Market> {
        self.markets.clone()
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn market(id: &str) -> Market {
        Market {
            id: id.to_string(),
            question: "BTC Up or Down - 15 minute".to_string(),
            description: String::new(),
            end_date: String::new(),
            active: true,
            volume: dec!(0),
            liquidity: dec!(0),
            asset: None,
            slug: String::new(),
        }
    }

    #[test]
    fn test_empty_cache_is_stale() {
        let cache = MarketCache::new(Duration::from_secs(300));
        assert!(!cache.is_fresh(Instant::now()));
    }

    #[test]
    fn test_fresh_within_ttl_stale_after() {
        let mut cache = MarketCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.replace(vec![market("a")], t0);

        assert!(cache.is_fresh(t0 + Duration::from_secs(299)));
        assert!(!cache.is_fresh(t0 + Duration::from_secs(300)));
        assert!(!cache.is_fresh(t0 + Duration::from_secs(301)));
    }

    #[test]
    fn test_replace_drops_previous_entries() {
        let mut cache = MarketCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.replace(vec![market("a"), market("b")], t0);
        cache.replace(vec![market("c")], t0);

        assert_eq!(cache.len(), 1);
        assert!(cache.get("a").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_all_preserves_fetch_order() {
        let mut cache = MarketCache::new(Duration::from_secs(300));
        let fetched: Vec<Market> = ["z", "a", "m", "b"].iter().map(|id| market(id)).collect();
        cache.replace(fetched.clone(), Instant::now());

        let all = cache.all();
        let ids: Vec<&str> = all.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m", "b"]);
    }

    #[test]
    fn test_insert_does_not_refresh_ttl() {
        let mut cache = MarketCache::new(Duration::from_secs(300));
        cache.insert(market("a"));
        assert!(cache.get("a").is_some());
        // An insert alone never makes the set fresh
        assert!(!cache.is_fresh(Instant::now()));
    }

    #[test]
    fn test_insert_replaces_existing_in_place() {
        let mut cache = MarketCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.replace(vec![market("a"), market("b")], t0);

        let mut updated = market("a");
        updated.question = "updated".to_string();
        cache.insert(updated);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().question, "updated");
        let ids: Vec<String> = cache.all().iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_replace_with_empty_set_is_stale() {
        let mut cache = MarketCache::new(Duration::from_secs(300));
        let t0 = Instant::now();
        cache.replace(vec![], t0);
        assert!(!cache.is_fresh(t0 + Duration::from_secs(1)));
    }
}
