//! Search filter state and cache-key derivation.

use std::fmt;

use crate::api::types::SearchQuery;

/// Upper bound of the age slider.
pub const MAX_AGE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
  Breed,
  Age,
  Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
  Asc,
  Desc,
}

/// Sort specification, rendered on the wire as `field:direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
  pub field: SortField,
  pub dir: SortDir,
}

/// The six selectable sort orders, in cycle order.
pub const SORT_OPTIONS: &[(SortSpec, &str)] = &[
  (
    SortSpec {
      field: SortField::Breed,
      dir: SortDir::Asc,
    },
    "Breed (A-Z)",
  ),
  (
    SortSpec {
      field: SortField::Breed,
      dir: SortDir::Desc,
    },
    "Breed (Z-A)",
  ),
  (
    SortSpec {
      field: SortField::Age,
      dir: SortDir::Asc,
    },
    "Age (Youngest First)",
  ),
  (
    SortSpec {
      field: SortField::Age,
      dir: SortDir::Desc,
    },
    "Age (Oldest First)",
  ),
  (
    SortSpec {
      field: SortField::Name,
      dir: SortDir::Asc,
    },
    "Name (A-Z)",
  ),
  (
    SortSpec {
      field: SortField::Name,
      dir: SortDir::Desc,
    },
    "Name (Z-A)",
  ),
];

impl Default for SortSpec {
  fn default() -> Self {
    SORT_OPTIONS[0].0
  }
}

impl fmt::Display for SortSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let field = match self.field {
      SortField::Breed => "breed",
      SortField::Age => "age",
      SortField::Name => "name",
    };
    let dir = match self.dir {
      SortDir::Asc => "asc",
      SortDir::Desc => "desc",
    };
    write!(f, "{}:{}", field, dir)
  }
}

impl SortSpec {
  /// Human label for the option list.
  pub fn label(&self) -> &'static str {
    SORT_OPTIONS
      .iter()
      .find(|(spec, _)| spec == self)
      .map(|(_, label)| *label)
      .unwrap_or("Breed (A-Z)")
  }

  /// Advance to the next option, wrapping around.
  pub fn cycle(&self, direction: i32) -> Self {
    let current = SORT_OPTIONS
      .iter()
      .position(|(spec, _)| spec == self)
      .unwrap_or(0);
    let len = SORT_OPTIONS.len() as i32;
    let next = (current as i32 + direction).rem_euclid(len) as usize;
    SORT_OPTIONS[next].0
  }
}

/// Active search filters plus the current page.
///
/// The free-text term is deliberately not part of this state: it is applied
/// client-side after hydration and must never influence the cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
  /// Selected breeds in selection order; empty means all breeds.
  pub breeds: Vec<String>,
  pub age_min: u32,
  pub age_max: u32,
  pub sort: SortSpec,
  /// 1-based page number.
  pub page: u32,
}

impl Default for FilterState {
  fn default() -> Self {
    Self {
      breeds: Vec::new(),
      age_min: 0,
      age_max: MAX_AGE,
      sort: SortSpec::default(),
      page: 1,
    }
  }
}

impl FilterState {
  /// Derive the cache key for this filter/page combination.
  ///
  /// The key is a pure function of (breeds, age range, sort, page) and is
  /// shared with any other invocation of the same combination regardless of
  /// the active text term.
  pub fn cache_key(&self) -> String {
    format!(
      "{}-{},{}-{}-{}",
      self.breeds.join(","),
      self.age_min,
      self.age_max,
      self.sort,
      self.page
    )
  }

  /// Build the wire query for this state.
  pub fn to_query(&self, page_size: u32) -> SearchQuery {
    SearchQuery {
      breeds: self.breeds.clone(),
      age_min: self.age_min,
      age_max: self.age_max,
      sort: self.sort.to_string(),
      size: page_size,
      from: (self.page - 1) * page_size,
    }
  }

  /// Add or remove a breed from the selection.
  pub fn toggle_breed(&mut self, breed: &str) {
    if let Some(pos) = self.breeds.iter().position(|b| b == breed) {
      self.breeds.remove(pos);
    } else {
      self.breeds.push(breed.to_string());
    }
  }

  /// Set the lower age bound, pushing the upper bound up if needed so that
  /// `age_min <= age_max` holds even under independent edits.
  pub fn set_age_min(&mut self, value: u32) {
    let value = value.min(MAX_AGE);
    self.age_min = value;
    self.age_max = self.age_max.max(value);
  }

  /// Set the upper age bound, pulling the lower bound down if needed.
  pub fn set_age_max(&mut self, value: u32) {
    let value = value.min(MAX_AGE);
    self.age_max = value;
    self.age_min = self.age_min.min(value);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_cache_key_matches_expected_shape() {
    let filters = FilterState {
      breeds: vec!["Poodle".to_string()],
      age_min: 2,
      age_max: 5,
      sort: SortSpec::default(),
      page: 1,
    };
    assert_eq!(filters.cache_key(), "Poodle-2,5-breed:asc-1");
  }

  #[test]
  fn test_cache_key_is_deterministic() {
    let filters = FilterState::default();
    assert_eq!(filters.cache_key(), filters.cache_key());
    assert_eq!(filters.cache_key(), "-0,20-breed:asc-1");
  }

  #[test]
  fn test_cache_key_changes_with_page() {
    let mut filters = FilterState::default();
    let first = filters.cache_key();
    filters.page = 2;
    assert_ne!(first, filters.cache_key());
  }

  #[test]
  fn test_age_min_pushes_max_up() {
    let mut filters = FilterState::default();
    filters.set_age_max(5);
    filters.set_age_min(8);
    assert_eq!(filters.age_min, 8);
    assert_eq!(filters.age_max, 8);
  }

  #[test]
  fn test_age_max_pulls_min_down() {
    let mut filters = FilterState::default();
    filters.set_age_min(10);
    filters.set_age_max(4);
    assert_eq!(filters.age_min, 4);
    assert_eq!(filters.age_max, 4);
  }

  #[test]
  fn test_toggle_breed_keeps_selection_order() {
    let mut filters = FilterState::default();
    filters.toggle_breed("Poodle");
    filters.toggle_breed("Beagle");
    assert_eq!(filters.breeds, vec!["Poodle", "Beagle"]);

    filters.toggle_breed("Poodle");
    assert_eq!(filters.breeds, vec!["Beagle"]);
  }

  #[test]
  fn test_sort_cycle_wraps() {
    let mut sort = SortSpec::default();
    for _ in 0..SORT_OPTIONS.len() {
      sort = sort.cycle(1);
    }
    assert_eq!(sort, SortSpec::default());

    assert_eq!(SortSpec::default().cycle(-1), SORT_OPTIONS[5].0);
  }

  #[test]
  fn test_to_query_offsets_by_page() {
    let mut filters = FilterState::default();
    filters.page = 3;
    let query = filters.to_query(20);
    assert_eq!(query.from, 40);
    assert_eq!(query.size, 20);
  }
}
