//! Client-side text filtering.
//!
//! The free-text term never reaches the network: it narrows the already
//! hydrated page by substring match, and keystrokes are coalesced through a
//! debouncer so the filter runs once per quiet period rather than per key.

use std::time::{Duration, Instant};

use crate::api::types::Dog;

/// Quiet period before a term edit is applied.
pub const TEXT_FILTER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Filter dogs whose name or breed contains the term, case-insensitively.
///
/// An empty or whitespace-only term returns the list unchanged.
pub fn filter_by_term(dogs: &[Dog], term: &str) -> Vec<Dog> {
  let term = term.trim().to_lowercase();
  if term.is_empty() {
    return dogs.to_vec();
  }

  dogs
    .iter()
    .filter(|dog| {
      dog.name.to_lowercase().contains(&term) || dog.breed.to_lowercase().contains(&term)
    })
    .cloned()
    .collect()
}

/// Timer-based coalescing for rapid input: each submission cancels and
/// reschedules the pending one, and `poll` releases the latest value once
/// the quiet period has elapsed.
#[derive(Debug)]
pub struct Debouncer {
  delay: Duration,
  pending: Option<(String, Instant)>,
}

impl Debouncer {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: None,
    }
  }

  /// Schedule a value, replacing any pending one.
  pub fn submit(&mut self, value: String) {
    self.pending = Some((value, Instant::now()));
  }

  /// Release the pending value if its quiet period has elapsed.
  pub fn poll(&mut self) -> Option<String> {
    match &self.pending {
      Some((_, submitted_at)) if submitted_at.elapsed() >= self.delay => {
        self.pending.take().map(|(value, _)| value)
      }
      _ => None,
    }
  }

  /// Release the pending value immediately (e.g. on Enter).
  pub fn flush(&mut self) -> Option<String> {
    self.pending.take().map(|(value, _)| value)
  }
}

impl Default for Debouncer {
  fn default() -> Self {
    Self::new(TEXT_FILTER_DEBOUNCE)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dog(name: &str, breed: &str) -> Dog {
    Dog {
      id: name.to_lowercase(),
      name: name.to_string(),
      breed: breed.to_string(),
      age: 3,
      zip_code: "10001".to_string(),
      img: "https://img/1".to_string(),
    }
  }

  #[test]
  fn test_filter_matches_name_or_breed() {
    let dogs = vec![dog("Labrador", "Labrador"), dog("Poodle", "Poodle")];
    let filtered = filter_by_term(&dogs, "lab");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Labrador");

    let dogs = vec![dog("Rex", "Golden Retriever"), dog("Max", "Poodle")];
    let filtered = filter_by_term(&dogs, "RETRIEVER");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Rex");
  }

  #[test]
  fn test_whitespace_term_is_unfiltered() {
    let dogs = vec![dog("Rex", "Poodle"), dog("Max", "Beagle")];
    assert_eq!(filter_by_term(&dogs, "").len(), 2);
    assert_eq!(filter_by_term(&dogs, "   ").len(), 2);
  }

  #[test]
  fn test_no_match_yields_empty() {
    let dogs = vec![dog("Rex", "Poodle")];
    assert!(filter_by_term(&dogs, "husky").is_empty());
  }

  #[tokio::test]
  async fn test_debouncer_coalesces_rapid_input() {
    let mut debouncer = Debouncer::new(Duration::from_millis(50));

    debouncer.submit("l".to_string());
    debouncer.submit("la".to_string());
    debouncer.submit("lab".to_string());
    assert_eq!(debouncer.poll(), None);

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(debouncer.poll(), Some("lab".to_string()));
    // Released exactly once
    assert_eq!(debouncer.poll(), None);
  }

  #[tokio::test]
  async fn test_flush_releases_immediately() {
    let mut debouncer = Debouncer::new(Duration::from_secs(60));
    debouncer.submit("lab".to_string());
    assert_eq!(debouncer.flush(), Some("lab".to_string()));
    assert_eq!(debouncer.flush(), None);
  }
}
