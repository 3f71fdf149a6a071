use serde::{Deserialize, Serialize};

/// A dog record as returned by the rehoming service.
///
/// Records are immutable once fetched; identity is the `id` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dog {
  pub id: String,
  pub name: String,
  pub breed: String,
  pub age: u32,
  pub zip_code: String,
  pub img: String,
}

impl PartialEq for Dog {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Dog {}

/// Authenticated identity, persisted across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub name: String,
  pub email: String,
}

/// Parameters for GET /dogs/search.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
  pub breeds: Vec<String>,
  pub age_min: u32,
  pub age_max: u32,
  pub sort: String,
  pub size: u32,
  pub from: u32,
}

impl SearchQuery {
  /// Flatten into query pairs; breeds repeat as multiple `breeds` params.
  pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs: Vec<(&'static str, String)> = self
      .breeds
      .iter()
      .map(|b| ("breeds", b.clone()))
      .collect();
    pairs.push(("ageMin", self.age_min.to_string()));
    pairs.push(("ageMax", self.age_max.to_string()));
    pairs.push(("sort", self.sort.clone()));
    pairs.push(("size", self.size.to_string()));
    pairs.push(("from", self.from.to_string()));
    pairs
  }
}

/// Response of GET /dogs/search: ordered identifiers plus the total count,
/// never full records.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
  pub result_ids: Vec<String>,
  pub total: u32,
}

/// Response of POST /dogs/match.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchResponse {
  #[serde(rename = "match")]
  pub id: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_search_query_pairs_repeat_breeds() {
    let query = SearchQuery {
      breeds: vec!["Poodle".to_string(), "Beagle".to_string()],
      age_min: 2,
      age_max: 5,
      sort: "breed:asc".to_string(),
      size: 20,
      from: 20,
    };

    let pairs = query.to_pairs();
    let breeds: Vec<_> = pairs.iter().filter(|(k, _)| *k == "breeds").collect();
    assert_eq!(breeds.len(), 2);
    assert!(pairs.contains(&("from", "20".to_string())));
    assert!(pairs.contains(&("sort", "breed:asc".to_string())));
  }

  #[test]
  fn test_dog_equality_is_by_id() {
    let a = Dog {
      id: "d1".to_string(),
      name: "Rex".to_string(),
      breed: "Poodle".to_string(),
      age: 3,
      zip_code: "10001".to_string(),
      img: "https://img/1".to_string(),
    };
    let mut b = a.clone();
    b.name = "Max".to_string();
    assert_eq!(a, b);
  }

  #[test]
  fn test_search_response_wire_format() {
    let json = r#"{"resultIds":["a","b"],"total":2}"#;
    let response: SearchResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.result_ids, vec!["a", "b"]);
    assert_eq!(response.total, 2);
  }
}
