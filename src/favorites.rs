//! The favorites list: pure, idempotent set mutations over full dog
//! records, insertion-ordered for display. Persistence is the caller's
//! concern; nothing here touches the network.

use crate::api::types::Dog;

#[derive(Debug, Clone, Default)]
pub struct Favorites {
  dogs: Vec<Dog>,
}

impl Favorites {
  pub fn new(dogs: Vec<Dog>) -> Self {
    Self { dogs }
  }

  pub fn dogs(&self) -> &[Dog] {
    &self.dogs
  }

  pub fn len(&self) -> usize {
    self.dogs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.dogs.is_empty()
  }

  pub fn contains(&self, id: &str) -> bool {
    self.dogs.iter().any(|dog| dog.id == id)
  }

  pub fn find(&self, id: &str) -> Option<&Dog> {
    self.dogs.iter().find(|dog| dog.id == id)
  }

  /// Identifiers in display order, for the match call.
  pub fn ids(&self) -> Vec<String> {
    self.dogs.iter().map(|dog| dog.id.clone()).collect()
  }

  /// Add a dog. Adding an already-present id is a no-op: one entry per
  /// identifier, ever. Returns whether the list changed.
  pub fn add(&mut self, dog: Dog) -> bool {
    if self.contains(&dog.id) {
      return false;
    }
    self.dogs.push(dog);
    true
  }

  /// Remove by identifier. Returns whether the list changed.
  pub fn remove(&mut self, id: &str) -> bool {
    let before = self.dogs.len();
    self.dogs.retain(|dog| dog.id != id);
    self.dogs.len() != before
  }

  /// Flip favorite status for a card. Returns true when the dog is now a
  /// favorite.
  pub fn toggle(&mut self, dog: &Dog) -> bool {
    if self.remove(&dog.id) {
      false
    } else {
      self.dogs.push(dog.clone());
      true
    }
  }

  pub fn clear(&mut self) {
    self.dogs.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn dog(id: &str) -> Dog {
    Dog {
      id: id.to_string(),
      name: format!("dog-{}", id),
      breed: "Poodle".to_string(),
      age: 3,
      zip_code: "10001".to_string(),
      img: "https://img/1".to_string(),
    }
  }

  #[test]
  fn test_add_is_idempotent_by_id() {
    let mut favorites = Favorites::default();
    assert!(favorites.add(dog("a")));
    assert!(!favorites.add(dog("a")));
    assert_eq!(favorites.len(), 1);
  }

  #[test]
  fn test_insertion_order_is_preserved() {
    let mut favorites = Favorites::default();
    favorites.add(dog("c"));
    favorites.add(dog("a"));
    favorites.add(dog("b"));
    assert_eq!(favorites.ids(), vec!["c", "a", "b"]);
  }

  #[test]
  fn test_remove_by_id() {
    let mut favorites = Favorites::new(vec![dog("a"), dog("b")]);
    assert!(favorites.remove("a"));
    assert!(!favorites.remove("a"));
    assert_eq!(favorites.ids(), vec!["b"]);
  }

  #[test]
  fn test_toggle_flips_status() {
    let mut favorites = Favorites::default();
    let rex = dog("a");
    assert!(favorites.toggle(&rex));
    assert!(favorites.contains("a"));
    assert!(!favorites.toggle(&rex));
    assert!(favorites.is_empty());
  }

  #[test]
  fn test_clear() {
    let mut favorites = Favorites::new(vec![dog("a"), dog("b")]);
    favorites.clear();
    assert!(favorites.is_empty());
  }
}
