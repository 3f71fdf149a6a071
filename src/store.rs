//! Persisted application state.
//!
//! Exactly three slices survive restarts: the session identity, the
//! favorites list, and the search cache. Each mutation atomically replaces
//! its slice; reads always see the last committed state. Everything stored
//! here is a plain serde structure, never a live handle.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::types::{Dog, User};

/// One cached search page: the hydrated records for a single cache key,
/// the total reported by the search step, and when the entry was created.
#[derive(Debug, Clone)]
pub struct CachedPage {
  pub dogs: Vec<Dog>,
  pub total: u32,
  pub cached_at: DateTime<Utc>,
}

/// Schema for the three persisted slices.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS session (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    name TEXT NOT NULL,
    email TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS favorites (
    dog_id TEXT PRIMARY KEY,
    data BLOB NOT NULL,
    position INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS search_cache (
    cache_key TEXT PRIMARY KEY,
    dogs BLOB NOT NULL,
    total INTEGER NOT NULL,
    cached_at TEXT NOT NULL
);
"#;

/// SQLite-backed store for the persisted slices.
#[derive(Clone)]
pub struct StateStore {
  conn: Arc<Mutex<Connection>>,
}

impl StateStore {
  /// Open or create the store at the default location.
  pub fn open() -> Result<Self> {
    let path = Self::default_path()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create data directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open state database at {}: {}", path.display(), e))?;

    Self::from_connection(conn)
  }

  /// In-memory store for tests.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;
    Self::from_connection(conn)
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(SCHEMA)
      .map_err(|e| eyre!("Failed to run state migrations: {}", e))?;

    Ok(Self {
      conn: Arc::new(Mutex::new(conn)),
    })
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("pawmatch").join("state.db"))
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))
  }

  // --- session slice ---

  pub fn load_session(&self) -> Result<Option<User>> {
    let conn = self.lock()?;

    let mut stmt = conn
      .prepare("SELECT name, email FROM session WHERE id = 1")
      .map_err(|e| eyre!("Failed to prepare session query: {}", e))?;

    let user = stmt
      .query_row([], |row| {
        Ok(User {
          name: row.get(0)?,
          email: row.get(1)?,
        })
      })
      .ok();

    Ok(user)
  }

  pub fn save_session(&self, user: Option<&User>) -> Result<()> {
    let conn = self.lock()?;

    match user {
      Some(user) => {
        conn
          .execute(
            "INSERT OR REPLACE INTO session (id, name, email) VALUES (1, ?, ?)",
            params![user.name, user.email],
          )
          .map_err(|e| eyre!("Failed to save session: {}", e))?;
      }
      None => {
        conn
          .execute("DELETE FROM session", [])
          .map_err(|e| eyre!("Failed to clear session: {}", e))?;
      }
    }

    Ok(())
  }

  // --- favorites slice ---

  pub fn load_favorites(&self) -> Result<Vec<Dog>> {
    let conn = self.lock()?;

    let mut stmt = conn
      .prepare("SELECT data FROM favorites ORDER BY position")
      .map_err(|e| eyre!("Failed to prepare favorites query: {}", e))?;

    let dogs: Vec<Dog> = stmt
      .query_map([], |row| {
        let data: Vec<u8> = row.get(0)?;
        Ok(data)
      })
      .map_err(|e| eyre!("Failed to query favorites: {}", e))?
      .filter_map(|r| r.ok())
      .filter_map(|data| serde_json::from_slice(&data).ok())
      .collect();

    Ok(dogs)
  }

  /// Replace the favorites slice with the given list, preserving its order.
  pub fn save_favorites(&self, dogs: &[Dog]) -> Result<()> {
    let conn = self.lock()?;

    conn
      .execute("BEGIN TRANSACTION", [])
      .map_err(|e| eyre!("Failed to begin transaction: {}", e))?;

    conn
      .execute("DELETE FROM favorites", [])
      .map_err(|e| eyre!("Failed to clear favorites: {}", e))?;

    for (position, dog) in dogs.iter().enumerate() {
      let data =
        serde_json::to_vec(dog).map_err(|e| eyre!("Failed to serialize favorite: {}", e))?;
      conn
        .execute(
          "INSERT OR REPLACE INTO favorites (dog_id, data, position) VALUES (?, ?, ?)",
          params![dog.id, data, position as i64],
        )
        .map_err(|e| eyre!("Failed to store favorite: {}", e))?;
    }

    conn
      .execute("COMMIT", [])
      .map_err(|e| eyre!("Failed to commit transaction: {}", e))?;

    Ok(())
  }

  // --- search cache slice ---

  pub fn get_page(&self, key: &str) -> Result<Option<CachedPage>> {
    let conn = self.lock()?;

    let mut stmt = conn
      .prepare("SELECT dogs, total, cached_at FROM search_cache WHERE cache_key = ?")
      .map_err(|e| eyre!("Failed to prepare cache query: {}", e))?;

    let row: Option<(Vec<u8>, u32, String)> = stmt
      .query_row(params![key], |row| {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
      })
      .ok();

    match row {
      Some((data, total, cached_at)) => {
        let dogs: Vec<Dog> = serde_json::from_slice(&data)
          .map_err(|e| eyre!("Failed to deserialize cached page: {}", e))?;
        let cached_at = DateTime::parse_from_rfc3339(&cached_at)
          .map_err(|e| eyre!("Failed to parse cache timestamp '{}': {}", cached_at, e))?
          .with_timezone(&Utc);

        Ok(Some(CachedPage {
          dogs,
          total,
          cached_at,
        }))
      }
      None => Ok(None),
    }
  }

  /// Store a page under its key, overwriting any prior entry.
  pub fn put_page(&self, key: &str, page: &CachedPage) -> Result<()> {
    let conn = self.lock()?;

    let data =
      serde_json::to_vec(&page.dogs).map_err(|e| eyre!("Failed to serialize page: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO search_cache (cache_key, dogs, total, cached_at) VALUES (?, ?, ?, ?)",
        params![key, data, page.total, page.cached_at.to_rfc3339()],
      )
      .map_err(|e| eyre!("Failed to store page: {}", e))?;

    Ok(())
  }

  /// Drop every cached page.
  pub fn clear_pages(&self) -> Result<()> {
    let conn = self.lock()?;

    conn
      .execute("DELETE FROM search_cache", [])
      .map_err(|e| eyre!("Failed to clear search cache: {}", e))?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

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

  #[test]
  fn test_session_round_trip() {
    let store = StateStore::open_in_memory().unwrap();
    assert!(store.load_session().unwrap().is_none());

    let user = User {
      name: "Ada".to_string(),
      email: "ada@example.com".to_string(),
    };
    store.save_session(Some(&user)).unwrap();

    let loaded = store.load_session().unwrap().unwrap();
    assert_eq!(loaded.name, "Ada");
    assert_eq!(loaded.email, "ada@example.com");

    store.save_session(None).unwrap();
    assert!(store.load_session().unwrap().is_none());
  }

  #[test]
  fn test_favorites_preserve_order() {
    let store = StateStore::open_in_memory().unwrap();
    let dogs = vec![dog("b", "Bella"), dog("a", "Ace"), dog("c", "Cleo")];
    store.save_favorites(&dogs).unwrap();

    let loaded = store.load_favorites().unwrap();
    let ids: Vec<_> = loaded.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);
  }

  #[test]
  fn test_page_overwrites_prior_entry() {
    let store = StateStore::open_in_memory().unwrap();

    let first = CachedPage {
      dogs: vec![dog("a", "Ace")],
      total: 1,
      cached_at: Utc::now(),
    };
    store.put_page("key", &first).unwrap();

    let second = CachedPage {
      dogs: vec![dog("b", "Bella"), dog("c", "Cleo")],
      total: 2,
      cached_at: Utc::now(),
    };
    store.put_page("key", &second).unwrap();

    let loaded = store.get_page("key").unwrap().unwrap();
    assert_eq!(loaded.total, 2);
    assert_eq!(loaded.dogs.len(), 2);
  }

  #[test]
  fn test_clear_pages() {
    let store = StateStore::open_in_memory().unwrap();
    let page = CachedPage {
      dogs: vec![dog("a", "Ace")],
      total: 1,
      cached_at: Utc::now(),
    };
    store.put_page("key", &page).unwrap();
    store.clear_pages().unwrap();
    assert!(store.get_page("key").unwrap().is_none());
  }
}
