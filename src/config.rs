use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::legiscan::client::{DEFAULT_API_URL, DEFAULT_STATE};
use crate::social::{JsonFileStore, DEFAULT_BIOGRAPHY_URL};

/// Environment variable holding the LegiScan API key.
pub const API_KEY_ENV: &str = "LEGISCAN_API_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// LegiScan API key. Usually supplied through the environment instead.
  pub api_key: Option<String>,
  /// USPS abbreviation used to scope list, search and bill lookups
  pub default_state: String,
  pub api_url: String,
  /// Base URL of Vote Smart candidate biographies
  pub biography_url: String,
  /// Social media cache location (defaults to the user data directory)
  pub cache_file: Option<PathBuf>,
  /// Write logs here instead of stderr
  pub log_file: Option<PathBuf>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api_key: None,
      default_state: DEFAULT_STATE.to_string(),
      api_url: DEFAULT_API_URL.to_string(),
      biography_url: DEFAULT_BIOGRAPHY_URL.to_string(),
      cache_file: None,
      log_file: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./legiscan.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/legiscan/config.yaml
  ///
  /// Without a config file the defaults are used.
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
    let local = PathBuf::from("legiscan.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("legiscan").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    // An empty document deserializes as unit, not as an empty map
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Resolve the API key: explicit value, then the config file, then
  /// `LEGISCAN_API_KEY`.
  pub fn api_key(&self, explicit: Option<&str>) -> Result<String> {
    self.api_key_with(explicit, |name| std::env::var(name).ok())
  }

  /// Same as [`Config::api_key`] with an injectable environment lookup.
  pub fn api_key_with<F>(&self, explicit: Option<&str>, env: F) -> Result<String>
  where
    F: Fn(&str) -> Option<String>,
  {
    explicit
      .map(str::to_string)
      .or_else(|| self.api_key.clone())
      .or_else(|| env(API_KEY_ENV))
      .map(|key| key.trim().to_string())
      .filter(|key| !key.is_empty())
      .ok_or_else(|| {
        eyre!(
          "LegiScan API key not found. Pass --api-key, set api_key in the config file, or set {}.",
          API_KEY_ENV
        )
      })
  }

  /// Location of the social media cache file.
  pub fn cache_path(&self) -> Result<PathBuf> {
    self
      .cache_file
      .clone()
      .or_else(JsonFileStore::default_path)
      .ok_or_else(|| eyre!("Could not determine data directory for the social media cache"))
  }
}
