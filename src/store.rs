//! Persistence collaborator: a small key/value store for presentation order,
//! the last selected target, and boolean options.
//!
//! The session core consumes this only through `SettingsStore`. The on-disk
//! implementation degrades to defaults on any I/O or parse failure; a broken
//! state file never takes the panel down.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistError;

/// Option key: restore the last selected target at startup.
pub const OPT_REMEMBER_LAST: &str = "remember_last_selection";

pub trait SettingsStore {
    fn order(&self) -> Vec<String>;
    fn save_order(&mut self, order: &[String]);
    fn last_selected(&self) -> Option<String>;
    fn save_last_selected(&mut self, id: &str);
    fn bool_option(&self, name: &str) -> bool;
    fn set_bool_option(&mut self, name: &str, value: bool);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    order: Vec<String>,
    #[serde(default)]
    last_selected: Option<String>,
    #[serde(default)]
    options: BTreeMap<String, bool>,
}

/// File-backed store; every mutation writes through immediately.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: StoreData,
}

impl JsonStore {
    /// Open the store at `path`, falling back to an empty state when the
    /// file is absent or unreadable.
    pub fn open(path: &Path) -> Self {
        let data = match Self::read(path) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(error = %err, "state file unusable, starting empty");
                StoreData::default()
            }
        };
        Self {
            path: path.to_path_buf(),
            data,
        }
    }

    fn read(path: &Path) -> Result<StoreData, PersistError> {
        if !path.exists() {
            return Ok(StoreData::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| PersistError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| PersistError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn flush(&self) {
        let result = serde_json::to_string_pretty(&self.data)
            .map_err(|err| err.to_string())
            .and_then(|raw| fs::write(&self.path, raw).map_err(|err| err.to_string()));
        if let Err(err) = result {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to persist state");
        }
    }
}

impl SettingsStore for JsonStore {
    fn order(&self) -> Vec<String> {
        self.data.order.clone()
    }

    fn save_order(&mut self, order: &[String]) {
        self.data.order = order.to_vec();
        self.flush();
    }

    fn last_selected(&self) -> Option<String> {
        self.data.last_selected.clone()
    }

    fn save_last_selected(&mut self, id: &str) {
        self.data.last_selected = Some(id.to_string());
        self.flush();
    }

    fn bool_option(&self, name: &str) -> bool {
        self.data.options.get(name).copied().unwrap_or(false)
    }

    fn set_bool_option(&mut self, name: &str, value: bool) {
        self.data.options.insert(name.to_string(), value);
        self.flush();
    }
}

/// In-memory store used by tests and as the fallback when no state directory
/// is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: StoreData,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn order(&self) -> Vec<String> {
        self.data.order.clone()
    }

    fn save_order(&mut self, order: &[String]) {
        self.data.order = order.to_vec();
    }

    fn last_selected(&self) -> Option<String> {
        self.data.last_selected.clone()
    }

    fn save_last_selected(&mut self, id: &str) {
        self.data.last_selected = Some(id.to_string());
    }

    fn bool_option(&self, name: &str) -> bool {
        self.data.options.get(name).copied().unwrap_or(false)
    }

    fn set_bool_option(&mut self, name: &str, value: bool) {
        self.data.options.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        {
            let mut store = JsonStore::open(&path);
            store.save_order(&["b".to_string(), "a".to_string()]);
            store.save_last_selected("a");
            store.set_bool_option(OPT_REMEMBER_LAST, true);
        }
        let store = JsonStore::open(&path);
        assert_eq!(store.order(), vec!["b".to_string(), "a".to_string()]);
        assert_eq!(store.last_selected().as_deref(), Some("a"));
        assert!(store.bool_option(OPT_REMEMBER_LAST));
        assert!(!store.bool_option("unknown_option"));
    }

    #[test]
    fn corrupt_state_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonStore::open(&path);
        assert!(store.order().is_empty());
        assert!(store.last_selected().is_none());
    }

    #[test]
    fn memory_store_behaves_like_trait() {
        let mut store = MemoryStore::new();
        assert!(store.order().is_empty());
        store.save_order(&["x".to_string()]);
        store.save_last_selected("x");
        assert_eq!(store.order(), vec!["x".to_string()]);
        assert_eq!(store.last_selected().as_deref(), Some("x"));
    }
}
