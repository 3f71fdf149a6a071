//! Normalized API error shape.
//!
//! Every failure leaving the client boundary is reduced to the same
//! serializable form: a message, the HTTP status (0 for connectivity
//! failures), and the response body when one was readable. Keeping the
//! error serde-representable means it can live inside persisted state
//! without ever holding an opaque transport object.

use serde::{Deserialize, Serialize};

/// A failure from the rehoming service, normalized at the client boundary.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
  pub message: String,
  /// HTTP status code, or 0 when the server was never reached.
  pub status: u16,
  /// Response body if the server sent one.
  pub body: Option<serde_json::Value>,
}

impl ApiError {
  /// The server was unreachable (DNS, refused connection, timeout).
  pub fn connectivity() -> Self {
    Self {
      message: "Unable to connect to the server. Please check your internet connection."
        .to_string(),
      status: 0,
      body: None,
    }
  }

  /// An HTTP error response with its status and whatever body it carried.
  pub fn http(status: u16, body: Option<serde_json::Value>) -> Self {
    Self {
      message: format!("Request failed with status code {}", status),
      status,
      body,
    }
  }

  /// A response arrived but its payload did not match the expected shape.
  pub fn malformed(detail: &str) -> Self {
    Self {
      message: format!("Malformed response: {}", detail),
      status: 0,
      body: None,
    }
  }

  /// The session is no longer valid; the caller must re-authenticate.
  pub fn is_auth_expired(&self) -> bool {
    self.status == 401
  }

  /// Transient failures are eligible for retry: connectivity errors and
  /// 5xx-class responses.
  pub fn is_transient(&self) -> bool {
    self.status == 0 || self.status >= 500
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_connectivity_is_transient() {
    let err = ApiError::connectivity();
    assert_eq!(err.status, 0);
    assert!(err.is_transient());
    assert!(!err.is_auth_expired());
  }

  #[test]
  fn test_5xx_is_transient() {
    assert!(ApiError::http(500, None).is_transient());
    assert!(ApiError::http(503, None).is_transient());
  }

  #[test]
  fn test_401_is_auth_expired_not_transient() {
    let err = ApiError::http(401, None);
    assert!(err.is_auth_expired());
    assert!(!err.is_transient());
  }

  #[test]
  fn test_4xx_is_permanent() {
    let err = ApiError::http(404, None);
    assert!(!err.is_transient());
    assert!(!err.is_auth_expired());
  }

  #[test]
  fn test_error_round_trips_through_serde() {
    let err = ApiError::http(503, Some(serde_json::json!({"detail": "down"})));
    let json = serde_json::to_string(&err).unwrap();
    let back: ApiError = serde_json::from_str(&json).unwrap();
    assert_eq!(back.status, 503);
    assert_eq!(back.message, err.message);
    assert_eq!(back.body, err.body);
  }
}
