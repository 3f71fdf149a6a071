use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default remote service consumed by the client.
pub const DEFAULT_BASE_URL: &str = "https://frontend-take-home-service.fetch.com";

/// Number of dogs requested per search page.
const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  /// Results per page for the search view
  #[serde(default = "default_page_size")]
  pub page_size: u32,
  /// Custom title for the header (defaults to the API host if not set)
  pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  #[serde(default = "default_base_url")]
  pub base_url: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api: ApiConfig::default(),
      page_size: DEFAULT_PAGE_SIZE,
      title: None,
    }
  }
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
    }
  }
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
  DEFAULT_PAGE_SIZE
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./pawmatch.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/pawmatch/config.yaml
  ///
  /// Unlike credentialed clients there is nothing mandatory in the file, so
  /// a missing config falls back to defaults.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("pawmatch.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("pawmatch").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Header title: configured value or the API host.
  pub fn display_title(&self) -> String {
    if let Some(title) = &self.title {
      return title.clone();
    }

    url::Url::parse(&self.api.base_url)
      .ok()
      .and_then(|u| u.host_str().map(String::from))
      .unwrap_or_else(|| self.api.base_url.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.page_size, 20);
  }

  #[test]
  fn test_partial_yaml_fills_defaults() {
    let config: Config = serde_yaml::from_str("title: Pups\n").unwrap();
    assert_eq!(config.title.as_deref(), Some("Pups"));
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.page_size, 20);
  }

  #[test]
  fn test_display_title_falls_back_to_host() {
    let config = Config::default();
    assert_eq!(
      config.display_title(),
      "frontend-take-home-service.fetch.com"
    );
  }
}
