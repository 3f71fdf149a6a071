//! Freshness policy over the persisted search-cache slice.
//!
//! The store keeps pages forever; this layer decides whether an entry may
//! still satisfy a request. Entries are never proactively evicted — they go
//! stale in place and are overwritten by the next fetch for the same key.

use chrono::{DateTime, Duration, Utc};

use crate::api::types::Dog;
use crate::store::{CachedPage, StateStore};

/// Keyed page cache with a fixed freshness window.
#[derive(Clone)]
pub struct SearchCache {
  store: StateStore,
  /// How long a cached page may satisfy requests
  freshness_window: Duration,
}

impl SearchCache {
  pub fn new(store: StateStore) -> Self {
    Self {
      store,
      freshness_window: Duration::minutes(5),
    }
  }

  #[cfg(test)]
  pub fn with_freshness_window(mut self, window: Duration) -> Self {
    self.freshness_window = window;
    self
  }

  /// A page is fresh strictly within the window: an entry aged exactly the
  /// window length is already stale.
  fn is_fresh(&self, cached_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - cached_at < self.freshness_window
  }

  /// Return the cached page for the key if one exists and is still fresh.
  ///
  /// Store read failures degrade to a cache miss; a broken cache must never
  /// break search.
  pub fn lookup(&self, key: &str) -> Option<CachedPage> {
    let page = match self.store.get_page(key) {
      Ok(page) => page?,
      Err(err) => {
        tracing::warn!(key, error = %err, "cache read failed, treating as miss");
        return None;
      }
    };

    if self.is_fresh(page.cached_at, Utc::now()) {
      Some(page)
    } else {
      None
    }
  }

  /// Store a hydrated page under its key with a fresh timestamp,
  /// unconditionally overwriting any prior entry.
  pub fn store_page(&self, key: &str, dogs: &[Dog], total: u32) {
    let page = CachedPage {
      dogs: dogs.to_vec(),
      total,
      cached_at: Utc::now(),
    };

    if let Err(err) = self.store.put_page(key, &page) {
      tracing::warn!(key, error = %err, "failed to persist search page");
    }
  }

  /// Drop every cached page.
  pub fn clear(&self) {
    if let Err(err) = self.store.clear_pages() {
      tracing::warn!(error = %err, "failed to clear search cache");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dog(id: &str) -> Dog {
    Dog {
      id: id.to_string(),
      name: "Rex".to_string(),
      breed: "Poodle".to_string(),
      age: 3,
      zip_code: "10001".to_string(),
      img: "https://img/1".to_string(),
    }
  }

  fn cache() -> SearchCache {
    SearchCache::new(StateStore::open_in_memory().unwrap())
  }

  #[test]
  fn test_freshness_boundary() {
    let cache = cache();
    let now = Utc::now();

    // 4:59 old is still valid
    assert!(cache.is_fresh(now - Duration::seconds(299), now));
    // exactly 5:00 old is stale
    assert!(!cache.is_fresh(now - Duration::seconds(300), now));
    assert!(!cache.is_fresh(now - Duration::seconds(301), now));
  }

  #[test]
  fn test_lookup_round_trip() {
    let cache = cache();
    cache.store_page("key", &[dog("a"), dog("b")], 2);

    let page = cache.lookup("key").unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.dogs.len(), 2);
    assert!(cache.lookup("other").is_none());
  }

  #[test]
  fn test_stale_entry_is_a_miss() {
    let cache = cache().with_freshness_window(Duration::zero());
    cache.store_page("key", &[dog("a")], 1);
    assert!(cache.lookup("key").is_none());
  }

  #[test]
  fn test_refetch_overwrites_stale_entry() {
    let cache = cache();
    cache.store_page("key", &[dog("a")], 1);
    cache.store_page("key", &[dog("b"), dog("c")], 2);

    let page = cache.lookup("key").unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.dogs[0].id, "b");
  }
}
