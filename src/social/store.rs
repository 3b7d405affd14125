//! Storage for resolved social media records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::legiscan::error::{LegiScanError, Result};

use super::types::SocialMediaRecord;

/// Trait for social media record storage backends.
///
/// Entries are keyed by LegiScan person id. Writes are whole-store: `save`
/// persists every entry, not just the ones changed since the last save.
pub trait SocialMediaStore {
  fn get(&self, person_id: &str) -> Option<&SocialMediaRecord>;

  fn insert(&mut self, person_id: &str, record: SocialMediaRecord);

  fn save(&self) -> Result<()>;
}

/// Store that only lives for the process. Used when the file cache is disabled.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: BTreeMap<String, SocialMediaRecord>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl SocialMediaStore for MemoryStore {
  fn get(&self, person_id: &str) -> Option<&SocialMediaRecord> {
    self.entries.get(person_id)
  }

  fn insert(&mut self, person_id: &str, record: SocialMediaRecord) {
    self.entries.insert(person_id.to_string(), record);
  }

  fn save(&self) -> Result<()> {
    Ok(())
  }
}

/// Store backed by a single JSON document mapping person id to record.
///
/// The file is read once when the store is opened and rewritten in full on
/// every save. There is no locking: concurrent writers overwrite each other.
#[derive(Debug)]
pub struct JsonFileStore {
  path: PathBuf,
  entries: BTreeMap<String, SocialMediaRecord>,
}

impl JsonFileStore {
  /// Load the store from `path`. A missing file yields an empty store.
  pub fn load(path: &Path) -> Result<Self> {
    let entries = if path.exists() {
      debug!(path = %path.display(), "Reading social media cache");
      let contents = std::fs::read_to_string(path).map_err(|source| LegiScanError::Cache {
        path: path.to_path_buf(),
        source,
      })?;
      serde_json::from_str(&contents)?
    } else {
      BTreeMap::new()
    };

    Ok(Self {
      path: path.to_path_buf(),
      entries,
    })
  }

  /// Default cache location under the user data directory.
  pub fn default_path() -> Option<PathBuf> {
    dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .map(|dir| dir.join("legiscan").join("social_media_cache.json"))
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl SocialMediaStore for JsonFileStore {
  fn get(&self, person_id: &str) -> Option<&SocialMediaRecord> {
    self.entries.get(person_id)
  }

  fn insert(&mut self, person_id: &str, record: SocialMediaRecord) {
    self.entries.insert(person_id.to_string(), record);
  }

  fn save(&self) -> Result<()> {
    let cache_err = |source| LegiScanError::Cache {
      path: self.path.clone(),
      source,
    };

    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent).map_err(cache_err)?;
    }

    let data = serde_json::to_vec_pretty(&self.entries)?;
    std::fs::write(&self.path, data).map_err(cache_err)?;
    info!(path = %self.path.display(), entries = self.entries.len(), "Wrote social media cache");

    Ok(())
  }
}
