//! The search pipeline: cache key -> cache check -> identifier search ->
//! hydration -> cache store.
//!
//! Failure policy: a failed search step collapses to zero results and a
//! failed hydration clears the page, in both cases without touching the
//! cache. Only authentication expiry propagates, so the app can force a
//! re-login.

use std::collections::HashMap;

use crate::api::types::Dog;
use crate::api::{ApiClient, ApiError};
use crate::search::cache::SearchCache;
use crate::search::filters::FilterState;

/// Result of one search invocation, ready for display.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
  pub dogs: Vec<Dog>,
  pub total: u32,
  pub from_cache: bool,
}

impl SearchOutcome {
  fn empty() -> Self {
    Self {
      dogs: Vec::new(),
      total: 0,
      from_cache: false,
    }
  }
}

#[derive(Clone)]
pub struct SearchOrchestrator {
  client: ApiClient,
  cache: SearchCache,
  page_size: u32,
}

impl SearchOrchestrator {
  pub fn new(client: ApiClient, cache: SearchCache, page_size: u32) -> Self {
    Self {
      client,
      cache,
      page_size,
    }
  }

  /// Run the pipeline for the given filter state.
  ///
  /// `Err` is reserved for authentication expiry; every other failure is
  /// absorbed into an empty outcome so the UI shows "no results" rather
  /// than an error state.
  pub async fn execute(&self, filters: &FilterState) -> Result<SearchOutcome, ApiError> {
    let key = filters.cache_key();

    if let Some(page) = self.cache.lookup(&key) {
      tracing::debug!(key, "serving search page from cache");
      return Ok(SearchOutcome {
        dogs: page.dogs,
        total: page.total,
        from_cache: true,
      });
    }

    let query = filters.to_query(self.page_size);
    let response = match self.client.search_dogs(&query).await {
      Ok(response) => response,
      Err(err) if err.is_auth_expired() => return Err(err),
      Err(err) => {
        tracing::warn!(key, error = %err, "search failed, showing empty results");
        return Ok(SearchOutcome::empty());
      }
    };

    if response.result_ids.is_empty() {
      return Ok(SearchOutcome {
        dogs: Vec::new(),
        total: response.total,
        from_cache: false,
      });
    }

    let dogs = match self.client.fetch_dogs(&response.result_ids).await {
      Ok(dogs) => dogs,
      Err(err) if err.is_auth_expired() => return Err(err),
      Err(err) => {
        // Not retried here; the client already applied its transport retries.
        tracing::warn!(key, error = %err, "hydration failed, clearing results");
        return Ok(SearchOutcome {
          dogs: Vec::new(),
          total: response.total,
          from_cache: false,
        });
      }
    };

    let dogs = order_by_ids(&response.result_ids, dogs);
    self.cache.store_page(&key, &dogs, response.total);

    Ok(SearchOutcome {
      dogs,
      total: response.total,
      from_cache: false,
    })
  }

  /// Drop all cached pages (the `:refresh` command).
  pub fn clear_cache(&self) {
    self.cache.clear();
  }
}

/// Reorder hydrated records into the order the search step returned.
fn order_by_ids(ids: &[String], mut dogs: Vec<Dog>) -> Vec<Dog> {
  let index: HashMap<&str, usize> = ids
    .iter()
    .enumerate()
    .map(|(position, id)| (id.as_str(), position))
    .collect();

  dogs.sort_by_key(|dog| index.get(dog.id.as_str()).copied().unwrap_or(usize::MAX));
  dogs
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;
  use crate::api::RetryPolicy;
  use crate::config::{ApiConfig, Config};
  use crate::store::StateStore;

  fn dog(id: &str, name: &str) -> Dog {
    Dog {
      id: id.to_string(),
      name: name.to_string(),
      breed: "Poodle".to_string(),
      age: 3,
      zip_code: "10001".to_string(),
      img: "https://img/1".to_string(),
    }
  }

  /// Client pointed at a host that refuses connections, with retries
  /// effectively disabled so failure paths resolve quickly.
  fn offline_orchestrator() -> (SearchOrchestrator, SearchCache) {
    let config = Config {
      api: ApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
      },
      ..Config::default()
    };
    let client = ApiClient::new(&config)
      .unwrap()
      .with_retry_policy(RetryPolicy {
        max_retries: 0,
        base_delay: Duration::from_millis(1),
      });
    let cache = SearchCache::new(StateStore::open_in_memory().unwrap());
    (
      SearchOrchestrator::new(client, cache.clone(), 20),
      cache,
    )
  }

  #[tokio::test]
  async fn test_fresh_cache_hit_skips_network() {
    let (orchestrator, cache) = offline_orchestrator();
    let filters = FilterState {
      breeds: vec!["Poodle".to_string()],
      age_min: 2,
      age_max: 5,
      ..FilterState::default()
    };
    cache.store_page(&filters.cache_key(), &[dog("a", "Ace"), dog("b", "Bella")], 2);

    // The client is unreachable, so success proves no network call happened.
    let outcome = orchestrator.execute(&filters).await.unwrap();
    assert!(outcome.from_cache);
    assert_eq!(outcome.total, 2);
    let ids: Vec<_> = outcome.dogs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
  }

  #[tokio::test]
  async fn test_search_failure_collapses_to_empty() {
    let (orchestrator, _cache) = offline_orchestrator();
    let outcome = orchestrator.execute(&FilterState::default()).await.unwrap();
    assert!(outcome.dogs.is_empty());
    assert_eq!(outcome.total, 0);
    assert!(!outcome.from_cache);
  }

  #[test]
  fn test_hydration_preserves_search_order() {
    let ids = vec!["c".to_string(), "a".to_string(), "b".to_string()];
    let fetched = vec![dog("a", "Ace"), dog("b", "Bella"), dog("c", "Cleo")];

    let ordered = order_by_ids(&ids, fetched);
    let result: Vec<_> = ordered.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(result, vec!["c", "a", "b"]);
  }
}
