use std::time::Duration;

use color_eyre::{eyre::eyre, Result};
use url::Url;

use crate::api::error::ApiError;
use crate::api::types::{Dog, MatchResponse, SearchQuery, SearchResponse};
use crate::config::Config;

/// Fixed timeout for every outbound request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Retry policy for transient failures.
///
/// The delay doubles on each attempt, seeded at `base_delay`: with the
/// defaults, retries fire after 2s, 4s and 8s. The attempt counter lives on
/// the stack of each request, so concurrent requests never share retry state.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
  pub max_retries: u32,
  pub base_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_retries: 3,
      base_delay: Duration::from_secs(1),
    }
  }
}

impl RetryPolicy {
  /// Backoff before the given attempt (1-based).
  fn delay(&self, attempt: u32) -> Duration {
    self.base_delay * 2u32.saturating_pow(attempt)
  }
}

/// Client for the rehoming service API.
///
/// Credentials are cookie-based: `/auth/login` sets a session cookie which
/// the underlying cookie store replays on every subsequent call.
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base_url: Url,
  retry: RetryPolicy,
}

impl ApiClient {
  pub fn new(config: &Config) -> Result<Self> {
    let base_url = Url::parse(&config.api.base_url)
      .map_err(|e| eyre!("Invalid API base URL {}: {}", config.api.base_url, e))?;

    let http = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .cookie_store(true)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      http,
      base_url,
      retry: RetryPolicy::default(),
    })
  }

  /// Override the retry policy (tests use this to avoid multi-second sleeps).
  pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
    self.retry = retry;
    self
  }

  /// Authenticate and establish the session cookie.
  pub async fn login(&self, name: &str, email: &str) -> Result<(), ApiError> {
    let request = self
      .http
      .post(self.url("/auth/login")?)
      .json(&serde_json::json!({ "name": name, "email": email }))
      .build()
      .map_err(build_error)?;

    self.send(request).await?;
    Ok(())
  }

  /// End the session server-side.
  pub async fn logout(&self) -> Result<(), ApiError> {
    let request = self
      .http
      .post(self.url("/auth/logout")?)
      .build()
      .map_err(build_error)?;

    self.send(request).await?;
    Ok(())
  }

  /// List all breed names known to the service.
  pub async fn breeds(&self) -> Result<Vec<String>, ApiError> {
    let request = self
      .http
      .get(self.url("/dogs/breeds")?)
      .build()
      .map_err(build_error)?;

    let response = self.send(request).await?;
    response
      .json()
      .await
      .map_err(|e| ApiError::malformed(&e.to_string()))
  }

  /// Search for dogs, returning ordered identifiers and the total count.
  pub async fn search_dogs(&self, query: &SearchQuery) -> Result<SearchResponse, ApiError> {
    let request = self
      .http
      .get(self.url("/dogs/search")?)
      .query(&query.to_pairs())
      .build()
      .map_err(build_error)?;

    let response = self.send(request).await?;
    response
      .json()
      .await
      .map_err(|e| ApiError::malformed(&e.to_string()))
  }

  /// Bulk-fetch full records for the given identifiers.
  ///
  /// An empty list short-circuits locally without a network call.
  pub async fn fetch_dogs(&self, ids: &[String]) -> Result<Vec<Dog>, ApiError> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let request = self
      .http
      .post(self.url("/dogs")?)
      .json(&ids)
      .build()
      .map_err(build_error)?;

    let response = self.send(request).await?;
    response
      .json()
      .await
      .map_err(|e| ApiError::malformed(&e.to_string()))
  }

  /// Submit favorite identifiers and receive the generated match.
  ///
  /// An empty list short-circuits locally without a network call.
  pub async fn generate_match(&self, ids: &[String]) -> Result<Option<String>, ApiError> {
    if ids.is_empty() {
      return Ok(None);
    }

    let request = self
      .http
      .post(self.url("/dogs/match")?)
      .json(&ids)
      .build()
      .map_err(build_error)?;

    let response = self.send(request).await?;
    let matched: MatchResponse = response
      .json()
      .await
      .map_err(|e| ApiError::malformed(&e.to_string()))?;

    Ok(Some(matched.id))
  }

  fn url(&self, path: &str) -> Result<Url, ApiError> {
    self.base_url.join(path).map_err(|_| ApiError {
      message: format!("Invalid request URL: {}", path),
      status: 0,
      body: None,
    })
  }

  /// Execute a request, retrying transient failures with exponential backoff.
  ///
  /// Transient means the server was unreachable (including the 10s timeout)
  /// or answered with a 5xx. Each retry replays a clone of the same request.
  async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response, ApiError> {
    let mut attempt = 0u32;

    loop {
      let current = match request.try_clone() {
        Some(r) => r,
        None => return Err(ApiError::malformed("request body cannot be replayed")),
      };

      match self.http.execute(current).await {
        Ok(response) => {
          let status = response.status();
          if status.is_success() {
            return Ok(response);
          }

          if status.as_u16() >= 500 && attempt < self.retry.max_retries {
            attempt += 1;
            tracing::warn!(
              status = status.as_u16(),
              attempt,
              "server error, retrying after backoff"
            );
            tokio::time::sleep(self.retry.delay(attempt)).await;
            continue;
          }

          return Err(normalize_response(response).await);
        }
        Err(err) => {
          if attempt < self.retry.max_retries {
            attempt += 1;
            tracing::warn!(error = %err, attempt, "network error, retrying after backoff");
            tokio::time::sleep(self.retry.delay(attempt)).await;
            continue;
          }

          return Err(ApiError::connectivity());
        }
      }
    }
  }
}

/// Reduce an error response to the normalized shape, capturing the body
/// when the server sent a readable one.
async fn normalize_response(response: reqwest::Response) -> ApiError {
  let status = response.status().as_u16();
  let body = response.json::<serde_json::Value>().await.ok();
  ApiError::http(status, body)
}

fn build_error(err: reqwest::Error) -> ApiError {
  ApiError {
    message: err.to_string(),
    status: 0,
    body: None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ApiConfig;

  fn unreachable_client(retry: RetryPolicy) -> ApiClient {
    let config = Config {
      api: ApiConfig {
        // Discard port; connections are refused immediately.
        base_url: "http://127.0.0.1:9".to_string(),
      },
      ..Config::default()
    };
    ApiClient::new(&config).unwrap().with_retry_policy(retry)
  }

  #[test]
  fn test_backoff_doubles_from_base() {
    let retry = RetryPolicy::default();
    assert_eq!(retry.delay(1), Duration::from_secs(2));
    assert_eq!(retry.delay(2), Duration::from_secs(4));
    assert_eq!(retry.delay(3), Duration::from_secs(8));
  }

  #[tokio::test]
  async fn test_empty_fetch_short_circuits() {
    let client = unreachable_client(RetryPolicy::default());
    // No network call happens, so the unreachable host never matters.
    let dogs = client.fetch_dogs(&[]).await.unwrap();
    assert!(dogs.is_empty());
  }

  #[tokio::test]
  async fn test_empty_match_short_circuits() {
    let client = unreachable_client(RetryPolicy::default());
    let matched = client.generate_match(&[]).await.unwrap();
    assert_eq!(matched, None);
  }

  #[tokio::test]
  async fn test_unreachable_host_surfaces_connectivity_error() {
    let retry = RetryPolicy {
      max_retries: 1,
      base_delay: Duration::from_millis(1),
    };
    let client = unreachable_client(retry);

    let err = client.breeds().await.unwrap_err();
    assert_eq!(err.status, 0);
    assert!(err.is_transient());
  }
}
